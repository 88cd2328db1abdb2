//! Typed error values and the formatted-diagnostic + abort pathway used by
//! every fallible entry point.
//!
//! The hot event path stays infallible: it funnels unrecoverable conditions
//! through [`ErrorReporter::abort`] instead of returning a `Result`.
//! Everything else (config parsing, filter parsing, arena exhaustion)
//! returns `Result<T, ScorepError>`.

use std::fmt;
use std::panic::Location;

use thiserror::Error;

const PACKAGE_NAME: &str = "SCOREP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Deprecated,
    Abort,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Warning => "WARNING",
            Severity::Deprecated => "DEPRECATED",
            Severity::Abort => "ABORT",
        };
        f.write_str(s)
    }
}

/// The closed set of failure kinds fallible core APIs can return.
/// `Success` is deliberately not a variant here — callers express success
/// as `Ok(_)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ErrorCode {
    #[error("memory allocation failed")]
    MemAllocFailed,
    #[error("index out of bounds")]
    IndexOutOfBounds,
    #[error("end of buffer")]
    EndOfBuffer,
    #[error("invalid")]
    Invalid,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("invalid size given")]
    InvalidSizeGiven,
    #[error("could not open file")]
    FileCanNotOpen,
    #[error("file interaction failed")]
    FileInteraction,
    #[error("missing separator while parsing")]
    ParseNoSeparator,
    #[error("unknown type")]
    UnknownType,
}

#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct ScorepError {
    pub code: ErrorCode,
    pub message: String,
}

impl ScorepError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ScorepError {
            code,
            message: message.into(),
        }
    }
}

/// Writes the user-visible diagnostic format to stderr and to the `log`
/// crate, and terminates the process for `Severity::Abort`.
///
/// Signal-context paths must never call this directly — they set a flag
/// (`crate::phase::Gate::signal_context_error`) that the next non-signal
/// entry checks instead.
pub struct ErrorReporter;

impl ErrorReporter {
    #[track_caller]
    pub fn report(severity: Severity, code: ErrorCode, description: &str) {
        let location = Location::caller();
        let line = format!(
            "[{}] {}:{} {}: {} ({})",
            PACKAGE_NAME,
            location.file(),
            location.line(),
            severity,
            description,
            code
        );
        eprintln!("{line}");
        match severity {
            Severity::Warning => log::warn!("{description} ({code})"),
            Severity::Deprecated => log::warn!("deprecated: {description}"),
            Severity::Abort => log::error!("{description} ({code})"),
        }
        if severity == Severity::Abort {
            eprintln!("[{PACKAGE_NAME}] Please report this error along with the steps to reproduce it.");
            eprintln!("[{PACKAGE_NAME}] Preserving core dump, if enabled, for post-mortem analysis.");
            std::process::abort();
        }
    }

    #[track_caller]
    pub fn warn(code: ErrorCode, description: &str) {
        Self::report(Severity::Warning, code, description);
    }
}
