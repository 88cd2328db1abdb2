use std::path::PathBuf;

use serde::ser::{Serialize, Serializer};

use crate::error::{ErrorCode, ScorepError};

/// The closed set of config variable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigType {
    Bool,
    Number,
    Size,
    String,
    Path,
    Bitset,
    OptionSet,
}

impl ConfigType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigType::Bool => "bool",
            ConfigType::Number => "number",
            ConfigType::Size => "size",
            ConfigType::String => "string",
            ConfigType::Path => "path",
            ConfigType::Bitset => "bitset",
            ConfigType::OptionSet => "optionset",
        }
    }
}

impl Serialize for ConfigType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Number(u64),
    Size(u64),
    String(String),
    Path(PathBuf),
    Bitset(u64),
    OptionSet(String),
}

impl ConfigValue {
    pub fn type_of(&self) -> ConfigType {
        match self {
            ConfigValue::Bool(_) => ConfigType::Bool,
            ConfigValue::Number(_) => ConfigType::Number,
            ConfigValue::Size(_) => ConfigType::Size,
            ConfigValue::String(_) => ConfigType::String,
            ConfigValue::Path(_) => ConfigType::Path,
            ConfigValue::Bitset(_) => ConfigType::Bitset,
            ConfigValue::OptionSet(_) => ConfigType::OptionSet,
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Bool(b) => serializer.serialize_bool(*b),
            ConfigValue::Number(n) => serializer.serialize_u64(*n),
            ConfigValue::Size(n) => serializer.serialize_u64(*n),
            ConfigValue::String(s) => serializer.serialize_str(s),
            ConfigValue::Path(p) => serializer.serialize_str(&p.to_string_lossy()),
            ConfigValue::Bitset(b) => serializer.serialize_u64(*b),
            ConfigValue::OptionSet(s) => serializer.serialize_str(s),
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Size(n) => write!(f, "{n}"),
            ConfigValue::String(s) => write!(f, "{s}"),
            ConfigValue::Path(p) => write!(f, "{}", p.display()),
            ConfigValue::Bitset(b) => write!(f, "{b:#x}"),
            ConfigValue::OptionSet(s) => write!(f, "{s}"),
        }
    }
}

/// `BOOL`: `true`/`yes`/`on`/`1`/any other non-zero integer parse as `true`;
/// `false`/`no`/`off`/`0` and anything else parse as `false` — the type
/// never rejects a string outright.
pub fn parse_bool(raw: &str) -> bool {
    let lower = raw.trim().to_ascii_lowercase();
    match lower.as_str() {
        "true" | "yes" | "on" => true,
        "false" | "no" | "off" => false,
        _ => lower.parse::<i64>().map(|n| n != 0).unwrap_or(false),
    }
}

pub fn parse_number(raw: &str) -> Result<u64, ScorepError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ScorepError::new(ErrorCode::InvalidArgument, format!("not a number: {raw}")))
}

/// `SIZE`: an unsigned integer with an optional `K`/`M`/`G` suffix
/// (case-insensitive), each a power of 1024.
pub fn parse_size(raw: &str) -> Result<u64, ScorepError> {
    let trimmed = raw.trim();
    let (digits, multiplier) = match trimmed.chars().last() {
        Some(c) if c.eq_ignore_ascii_case(&'k') => (&trimmed[..trimmed.len() - 1], 1024u64),
        Some(c) if c.eq_ignore_ascii_case(&'m') => (&trimmed[..trimmed.len() - 1], 1024 * 1024),
        Some(c) if c.eq_ignore_ascii_case(&'g') => {
            (&trimmed[..trimmed.len() - 1], 1024 * 1024 * 1024)
        }
        _ => (trimmed, 1),
    };
    let base: u64 = digits
        .trim()
        .parse()
        .map_err(|_| ScorepError::new(ErrorCode::InvalidSizeGiven, format!("not a size: {raw}")))?;
    base.checked_mul(multiplier)
        .ok_or_else(|| ScorepError::new(ErrorCode::InvalidSizeGiven, format!("size overflow: {raw}")))
}

/// `PATH`: a string with a leading `~` expanded to `$HOME`.
pub fn parse_path(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix('~') {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(raw)
}

/// A closed vocabulary for `BITSET`/`OPTIONSET` variables: name (matched
/// case-insensitively) to bit value.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<(String, u64)>,
}

impl Vocabulary {
    pub fn new(entries: impl IntoIterator<Item = (&'static str, u64)>) -> Self {
        Vocabulary {
            entries: entries
                .into_iter()
                .map(|(name, bits)| (name.to_ascii_lowercase(), bits))
                .collect(),
        }
    }

    fn lookup(&self, name: &str) -> Option<u64> {
        let lower = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, bits)| *bits)
            .or_else(|| match lower.as_str() {
                "all" => Some(self.entries.iter().fold(0u64, |acc, (_, bits)| acc | bits)),
                "none" => Some(0),
                _ => None,
            })
    }

    /// Splits on comma/semicolon/colon/space, applies each `name` or
    /// `~name` token against a fresh accumulator seeded at zero. The whole
    /// string must parse for any of it to take effect.
    pub fn parse_bitset(&self, raw: &str) -> Result<u64, ScorepError> {
        let mut value = 0u64;
        for token in raw.split([',', ';', ':', ' ']) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let (clear, name) = match token.strip_prefix('~') {
                Some(rest) => (true, rest),
                None => (false, token),
            };
            let bits = self.lookup(name).ok_or_else(|| {
                ScorepError::new(ErrorCode::UnknownType, format!("unknown bitset entry: {name}"))
            })?;
            if clear {
                value &= !bits;
            } else {
                value |= bits;
            }
        }
        Ok(value)
    }

    /// `OPTIONSET`: exactly one entry from the vocabulary.
    pub fn parse_optionset(&self, raw: &str) -> Result<String, ScorepError> {
        let trimmed = raw.trim();
        if self.lookup(trimmed).is_some() {
            Ok(trimmed.to_ascii_lowercase())
        } else {
            Err(ScorepError::new(
                ErrorCode::UnknownType,
                format!("unknown option: {trimmed}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new([("alpha", 1), ("beta", 2), ("gamma", 4), ("mu", 8), ("all", 15)])
    }

    #[test]
    fn bitset_scenarios() {
        let v = vocab();
        assert_eq!(v.parse_bitset("").unwrap(), 0);
        assert_eq!(v.parse_bitset("alpha,beta").unwrap(), 3);
        assert_eq!(v.parse_bitset("all,~alpha").unwrap(), 14);
        assert_eq!(v.parse_bitset("alpha,~alpha").unwrap(), 0);
        assert!(v.parse_bitset("nein").is_err());
    }

    #[test]
    fn bool_parsing_defaults_unknown_tokens_to_false() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("ON"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("garbage"));
    }

    #[test]
    fn size_parsing_applies_1024_based_suffixes() {
        assert_eq!(parse_size("512").unwrap(), 512);
        assert_eq!(parse_size("4M").unwrap(), 4 * 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("2k").unwrap(), 2048);
    }
}
