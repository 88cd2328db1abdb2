use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfoError {
    #[error(transparent)]
    Runtime(#[from] scorep_runtime::ScorepError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
