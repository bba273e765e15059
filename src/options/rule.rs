//! Regular-expression inclusion rules.

use crate::error::{LensError, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// A compiled regular expression that must match a whole name.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source`, anchored at both ends. `key` names the option for errors.
    pub fn new(key: &str, source: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{source})$"))
            .map_err(|e| LensError::option(key, format!("invalid pattern '{source}': {e}")))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Decides whether a fully-qualified object name is included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionRule {
    /// Every name is included.
    #[default]
    IncludeAll,
    /// No name is included.
    ExcludeAll,
    /// Included iff `include` matches (absent = everything) and `exclude` does not.
    Patterns {
        include: Option<Pattern>,
        exclude: Option<Pattern>,
    },
}

impl InclusionRule {
    /// Builds a rule from raw include/exclude patterns.
    ///
    /// Each side is `(option key, pattern)`; the key is reported if the
    /// pattern does not compile.
    pub fn from_patterns(include: Option<(&str, &str)>, exclude: Option<(&str, &str)>) -> Result<Self> {
        let include = include.map(|(key, src)| Pattern::new(key, src)).transpose()?;
        let exclude = exclude
            .filter(|(_, src)| !src.is_empty())
            .map(|(key, src)| Pattern::new(key, src))
            .transpose()?;

        Ok(match (include, exclude) {
            (None, None) => Self::IncludeAll,
            (include, exclude) => Self::Patterns { include, exclude },
        })
    }

    /// Returns true if `name` passes the rule.
    pub fn test(&self, name: &str) -> bool {
        match self {
            Self::IncludeAll => true,
            Self::ExcludeAll => false,
            Self::Patterns { include, exclude } => {
                include.as_ref().map_or(true, |p| p.is_match(name))
                    && !exclude.as_ref().is_some_and(|p| p.is_match(name))
            }
        }
    }

    pub fn is_include_all(&self) -> bool {
        matches!(self, Self::IncludeAll)
    }
}

impl fmt::Display for InclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncludeAll => write!(f, "all"),
            Self::ExcludeAll => write!(f, "none"),
            Self::Patterns { include, exclude } => {
                write!(
                    f,
                    "include /{}/",
                    include.as_ref().map_or(".*", |p| p.as_str())
                )?;
                if let Some(exclude) = exclude {
                    write!(f, " exclude /{}/", exclude.as_str())?;
                }
                Ok(())
            }
        }
    }
}
