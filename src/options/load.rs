//! Load options: how much metadata a crawl keeps.

use super::args::OptionArgs;
use super::{later, pick};
use crate::error::{LensError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named depth policy for a crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoLevel {
    /// Object names and types only; no columns, parameters or data types.
    Minimum,
    /// Columns, keys and parameters; no definitions.
    #[default]
    Standard,
    /// Everything the data source offers, including definitions.
    Maximum,
    /// Everything, left to the crawler's own configuration.
    Custom,
}

impl InfoLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimum => "minimum",
            Self::Standard => "standard",
            Self::Maximum => "maximum",
            Self::Custom => "custom",
        }
    }

    /// Returns true if columns, keys and routine parameters are kept.
    pub fn retrieves_details(&self) -> bool {
        !matches!(self, Self::Minimum)
    }

    /// Returns true if view and routine definitions are kept.
    pub fn retrieves_definitions(&self) -> bool {
        matches!(self, Self::Maximum | Self::Custom)
    }
}

impl fmt::Display for InfoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InfoLevel {
    type Err = LensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "minimum" | "min" => Ok(Self::Minimum),
            "standard" => Ok(Self::Standard),
            "maximum" | "max" => Ok(Self::Maximum),
            "custom" => Ok(Self::Custom),
            other => Err(LensError::option(
                "info-level",
                format!("'{other}' is not one of minimum, standard, maximum, custom"),
            )),
        }
    }
}

/// Crawl depth plus optional extras.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadOptions {
    info_level: InfoLevel,
    weak_associations: bool,
    load_row_counts: bool,
}

impl LoadOptions {
    pub fn info_level(&self) -> InfoLevel {
        self.info_level
    }

    /// Returns true if inferred column relationships are computed.
    pub fn weak_associations(&self) -> bool {
        self.weak_associations
    }

    pub fn load_row_counts(&self) -> bool {
        self.load_row_counts
    }

    pub fn compose(&self, fragment: &LoadFragment) -> Self {
        Self {
            info_level: pick(&fragment.info_level, &self.info_level),
            weak_associations: pick(&fragment.weak_associations, &self.weak_associations),
            load_row_counts: pick(&fragment.load_row_counts, &self.load_row_counts),
        }
    }
}

/// Partial load options supplied by one `load` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadFragment {
    pub info_level: Option<InfoLevel>,
    pub weak_associations: Option<bool>,
    pub load_row_counts: Option<bool>,
}

impl LoadFragment {
    pub const KEYS: &'static [&'static str] =
        &["info-level", "weak-associations", "load-row-counts"];

    pub fn from_args(args: &OptionArgs) -> Result<Self> {
        Ok(Self {
            info_level: args
                .get("info-level")
                .map(str::parse::<InfoLevel>)
                .transpose()?,
            weak_associations: args.get_bool("weak-associations")?,
            load_row_counts: args.get_bool("load-row-counts")?,
        })
    }

    pub fn overlay(&self, later_fragment: &Self) -> Self {
        Self {
            info_level: later(&self.info_level, &later_fragment.info_level),
            weak_associations: later(&self.weak_associations, &later_fragment.weak_associations),
            load_row_counts: later(&self.load_row_counts, &later_fragment.load_row_counts),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
