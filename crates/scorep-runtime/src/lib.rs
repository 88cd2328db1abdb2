//! Process-local measurement core: the re-entrancy/phase gate, arenas,
//! locations and task stacks, the substrate dispatch fan-out, filtering,
//! configuration, clock synchronization and the top-level lifecycle that
//! ties them together. Cross-process definition unification itself lives in
//! `scorep-defs`, shared with the `scorep-info` inspection CLI.

pub mod arena;
pub mod callsite;
pub mod clock_sync;
pub mod config;
pub mod env;
pub mod error;
pub mod filter;
pub mod glob;
pub mod ipc;
pub mod jenkins;
pub mod lifecycle;
pub mod location;
pub mod phase;
pub mod substrate;
pub mod system_tree;
pub mod task;

pub use error::{ErrorCode, ErrorReporter, ScorepError, Severity};
pub use lifecycle::Measurement;
pub use phase::{Gate, Phase};
