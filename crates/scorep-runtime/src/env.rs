//! Registration of the `SCOREP_`-prefixed environment variables and their
//! default values.

use crate::arena::{DEFAULT_DEF_CHUNK_BYTES, DEFAULT_EVENT_CHUNK_BYTES};
use crate::config::{ConfigRegistry, Vocabulary};

fn debug_module_vocabulary() -> Vocabulary {
    Vocabulary::new([
        ("core", 1 << 0),
        ("mpi", 1 << 1),
        ("user", 1 << 2),
        ("profile", 1 << 3),
        ("tracing", 1 << 4),
    ])
}

/// Builds a registry pre-populated with every `SCOREP_`-prefixed
/// configuration variable, at its documented or (where undocumented)
/// reasonable default, ready for [`ConfigRegistry::load_from_env`].
pub fn default_registry() -> ConfigRegistry {
    let mut reg = ConfigRegistry::new();
    reg.register_bool("SCOREP_ENABLE_TRACING", "enable the trace substrate", false);
    reg.register_bool("SCOREP_ENABLE_PROFILING", "enable the profile substrate", true);
    reg.register_path(
        "SCOREP_FILTERING_FILE",
        "filter configuration file",
        "scorep.filter",
    );
    reg.register_path(
        "SCOREP_EXPERIMENT_DIRECTORY",
        "output root directory",
        "scorep-measurement",
    );
    reg.register_size(
        "SCOREP_TOTAL_MEMORY",
        "arena budget per process, in bytes",
        (DEFAULT_EVENT_CHUNK_BYTES as u64) * 16,
    );
    reg.register_size(
        "SCOREP_PAGE_SIZE",
        "arena page size, in bytes",
        DEFAULT_DEF_CHUNK_BYTES as u64,
    );
    reg.register_bitset(
        "SCOREP_VERBOSE",
        "modules to emit verbose diagnostics for",
        debug_module_vocabulary(),
        0,
    );
    reg.register_bitset(
        "SCOREP_DEBUG",
        "modules to emit debug diagnostics for",
        debug_module_vocabulary(),
        0,
    );
    reg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigValue;

    #[test]
    fn default_registry_has_documented_defaults() {
        let reg = default_registry();
        assert_eq!(
            reg.get("SCOREP_ENABLE_PROFILING"),
            Some(&ConfigValue::Bool(true))
        );
        assert_eq!(
            reg.get("SCOREP_ENABLE_TRACING"),
            Some(&ConfigValue::Bool(false))
        );
    }
}
