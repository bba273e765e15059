//! Normalized key/value arguments.
//!
//! Commands and the config file both describe option fragments as flat
//! key/value pairs. Keys are normalized to kebab-case so `includeTables`,
//! `include_tables` and `include-tables` all name the same option.

use crate::error::{LensError, Result};

/// Ordered list of normalized key/value pairs. Later pairs win on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionArgs {
    pairs: Vec<(String, String)>,
}

impl OptionArgs {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an argument list, normalizing every key.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (normalize_key(k.as_ref()), v.into()))
                .collect(),
        }
    }

    /// Appends a pair.
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((normalize_key(key), value.into()));
    }

    /// Appends a boolean flag (`--flag` is shorthand for `flag=true`).
    pub fn push_flag(&mut self, key: &str) {
        self.push(key, "true");
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the last value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if `key` was given at all.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Parses a boolean value. Accepts true/false, yes/no, on/off, 1/0.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.get(key).map(|v| parse_bool(key, v)).transpose()
    }

    /// Parses an unsigned integer value.
    pub fn get_u32(&self, key: &str) -> Result<Option<u32>> {
        self.get(key)
            .map(|v| {
                v.trim()
                    .parse::<u32>()
                    .map_err(|e| LensError::option(key, format!("'{v}' is not a number: {e}")))
            })
            .transpose()
    }

    /// Fails with an option validation error on the first key not in `known`.
    pub fn ensure_known(&self, known: &[&str]) -> Result<()> {
        match self.pairs.iter().find(|(k, _)| !known.contains(&k.as_str())) {
            Some((key, _)) => Err(LensError::option(
                key.clone(),
                format!("unknown option; expected one of: {}", known.join(", ")),
            )),
            None => Ok(()),
        }
    }

    /// Returns only the pairs whose key is in `keys`.
    pub fn subset(&self, keys: &[&str]) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Returns the pairs whose key is not in `keys`.
    pub fn without(&self, keys: &[&str]) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .cloned()
                .collect(),
        }
    }
}

/// Normalizes a key to kebab-case: `includeTables` and `include_tables`
/// both become `include-tables`. Leading dashes are dropped.
pub fn normalize_key(key: &str) -> String {
    let key = key.trim().trim_start_matches('-');
    let mut normalized = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;

    for c in key.chars() {
        if c == '_' || c == ' ' {
            normalized.push('-');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                normalized.push('-');
            }
            normalized.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            normalized.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    normalized
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(LensError::option(
            key,
            format!("'{other}' is not a boolean (use true or false)"),
        )),
    }
}
