use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::value::{parse_bool, parse_number, parse_path, parse_size, ConfigType, ConfigValue, Vocabulary};
use crate::error::{ErrorCode, ScorepError};

pub struct ConfigVar {
    pub name: String,
    pub description: String,
    pub var_type: ConfigType,
    pub vocabulary: Option<Vocabulary>,
    pub value: ConfigValue,
}

/// Typed, named configuration variables discovered and parsed from the
/// environment. Registration order is preserved (backed by `indexmap`) so
/// `scorep-info config-vars` and the `scorep.cfg` dump are deterministic.
#[derive(Default)]
pub struct ConfigRegistry {
    vars: IndexMap<String, ConfigVar>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: &str, description: &str, value: ConfigValue, vocabulary: Option<Vocabulary>) {
        let var_type = value.type_of();
        self.vars.insert(
            name.to_string(),
            ConfigVar {
                name: name.to_string(),
                description: description.to_string(),
                var_type,
                vocabulary,
                value,
            },
        );
    }

    pub fn register_bool(&mut self, name: &str, description: &str, default: bool) {
        self.register(name, description, ConfigValue::Bool(default), None);
    }

    pub fn register_number(&mut self, name: &str, description: &str, default: u64) {
        self.register(name, description, ConfigValue::Number(default), None);
    }

    pub fn register_size(&mut self, name: &str, description: &str, default: u64) {
        self.register(name, description, ConfigValue::Size(default), None);
    }

    pub fn register_string(&mut self, name: &str, description: &str, default: &str) {
        self.register(name, description, ConfigValue::String(default.to_string()), None);
    }

    pub fn register_path(&mut self, name: &str, description: &str, default: &str) {
        self.register(name, description, ConfigValue::Path(parse_path(default)), None);
    }

    pub fn register_bitset(&mut self, name: &str, description: &str, vocabulary: Vocabulary, default: u64) {
        self.register(name, description, ConfigValue::Bitset(default), Some(vocabulary));
    }

    pub fn register_optionset(&mut self, name: &str, description: &str, vocabulary: Vocabulary, default: &str) {
        self.register(
            name,
            description,
            ConfigValue::OptionSet(default.to_string()),
            Some(vocabulary),
        );
    }

    /// Parses `raw` according to the variable's registered type and, only
    /// if parsing succeeds for the whole string, replaces the current
    /// value. On error the previous value is left untouched.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), ScorepError> {
        let var = self
            .vars
            .get_mut(name)
            .ok_or_else(|| ScorepError::new(crate::error::ErrorCode::Invalid, format!("unknown config variable: {name}")))?;
        let new_value = match var.var_type {
            ConfigType::Bool => ConfigValue::Bool(parse_bool(raw)),
            ConfigType::Number => ConfigValue::Number(parse_number(raw)?),
            ConfigType::Size => ConfigValue::Size(parse_size(raw)?),
            ConfigType::String => ConfigValue::String(raw.to_string()),
            ConfigType::Path => ConfigValue::Path(parse_path(raw)),
            ConfigType::Bitset => {
                let vocab = var.vocabulary.as_ref().expect("bitset variable missing vocabulary");
                ConfigValue::Bitset(vocab.parse_bitset(raw)?)
            }
            ConfigType::OptionSet => {
                let vocab = var.vocabulary.as_ref().expect("optionset variable missing vocabulary");
                ConfigValue::OptionSet(vocab.parse_optionset(raw)?)
            }
        };
        var.value = new_value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.vars.get(name).map(|v| &v.value)
    }

    /// Reads every registered variable from the process environment under
    /// its own name, skipping variables that aren't set. Logs and skips
    /// (rather than aborting) on a per-variable parse failure so one bad
    /// override doesn't block unrelated ones; callers that need config
    /// parsing to fail loudly should check `set`'s `Result` directly
    /// instead.
    pub fn load_from_env(&mut self) {
        let names: Vec<String> = self.vars.keys().cloned().collect();
        for name in names {
            if let Ok(raw) = std::env::var(&name) {
                if let Err(err) = self.set(&name, &raw) {
                    log::warn!("ignoring {name}={raw:?}: {err}");
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigVar> {
        self.vars.values()
    }

    /// The resolved configuration as a JSON-serializable snapshot, in
    /// registration order, for `scorep-info config-vars --json` and for
    /// [`ConfigRegistry::write_resolved_config`].
    pub fn to_json(&self) -> Vec<ResolvedConfigVar<'_>> {
        self.vars
            .values()
            .map(|v| ResolvedConfigVar {
                name: &v.name,
                description: &v.description,
                var_type: v.var_type,
                value: &v.value,
            })
            .collect()
    }

    /// Writes the resolved configuration to `path` as pretty-printed JSON
    /// (the `scorep.cfg` dump): one record per registered variable, in
    /// registration order.
    pub fn write_resolved_config(&self, path: &Path) -> Result<(), ScorepError> {
        let json = serde_json::to_string_pretty(&self.to_json())
            .map_err(|err| ScorepError::new(ErrorCode::FileInteraction, format!("serializing resolved config: {err}")))?;
        std::fs::write(path, json)
            .map_err(|err| ScorepError::new(ErrorCode::FileCanNotOpen, format!("writing {}: {err}", path.display())))
    }
}

/// One registered variable's current, resolved value — the unit serialized
/// by [`ConfigRegistry::to_json`].
#[derive(Serialize)]
pub struct ResolvedConfigVar<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[serde(rename = "type")]
    pub var_type: ConfigType,
    pub value: &'a ConfigValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_order_is_iteration_order() {
        let mut reg = ConfigRegistry::new();
        reg.register_bool("SCOREP_ENABLE_TRACING", "enable tracing", false);
        reg.register_bool("SCOREP_ENABLE_PROFILING", "enable profiling", true);
        let names: Vec<&str> = reg.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["SCOREP_ENABLE_TRACING", "SCOREP_ENABLE_PROFILING"]);
    }

    #[test]
    fn failed_parse_leaves_previous_value_in_place() {
        let mut reg = ConfigRegistry::new();
        reg.register_number("SCOREP_TOTAL_MEMORY", "memory budget", 10);
        assert!(reg.set("SCOREP_TOTAL_MEMORY", "not a number").is_err());
        assert_eq!(reg.get("SCOREP_TOTAL_MEMORY"), Some(&ConfigValue::Number(10)));
    }

    #[test]
    fn resolved_config_serializes_in_registration_order() {
        let mut reg = ConfigRegistry::new();
        reg.register_bool("SCOREP_ENABLE_TRACING", "enable tracing", true);
        reg.register_number("SCOREP_TOTAL_MEMORY", "memory budget", 42);
        let json = serde_json::to_value(reg.to_json()).unwrap();
        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["name"], "SCOREP_ENABLE_TRACING");
        assert_eq!(array[0]["type"], "bool");
        assert_eq!(array[0]["value"], true);
        assert_eq!(array[1]["value"], 42);
    }

    #[test]
    fn write_resolved_config_writes_pretty_json_to_disk() {
        let mut reg = ConfigRegistry::new();
        reg.register_string("SCOREP_EXPERIMENT_DIRECTORY", "output directory", "scorep-measurement");
        let path = std::env::temp_dir().join("scorep-runtime-test-write-resolved-config.json");
        reg.write_resolved_config(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("SCOREP_EXPERIMENT_DIRECTORY"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn bitset_variable_round_trips_through_the_registry() {
        let mut reg = ConfigRegistry::new();
        let vocab = Vocabulary::new([("alpha", 1), ("beta", 2), ("gamma", 4), ("mu", 8), ("all", 15)]);
        reg.register_bitset("SCOREP_DEBUG", "debug modules", vocab, 0);
        reg.set("SCOREP_DEBUG", "all,~alpha").unwrap();
        assert_eq!(reg.get("SCOREP_DEBUG"), Some(&ConfigValue::Bitset(14)));
        assert!(reg.set("SCOREP_DEBUG", "nein").is_err());
        assert_eq!(reg.get("SCOREP_DEBUG"), Some(&ConfigValue::Bitset(14)));
    }
}
