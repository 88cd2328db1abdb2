use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "scorep-info",
    version,
    about = "Inspects a Score-P-style measurement core: system tree and configuration variables."
)]
pub struct Opt {
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Print the system tree, one node class per line, leaf-first to root.
    SystemTree,

    /// Dump every registered configuration variable with its current value.
    ConfigVars {
        /// Emit machine-readable JSON instead of `NAME=value` lines.
        #[arg(long)]
        json: bool,
    },
}
