//! Filter options: how far to follow foreign keys around grep matches.

use super::args::OptionArgs;
use super::{later, pick};
use crate::error::Result;
use serde::Serialize;

/// Foreign key hops to add around the tables selected by grep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    parent_table_depth: u32,
    child_table_depth: u32,
}

impl FilterOptions {
    /// Hops followed from a table to the tables it references.
    pub fn parent_table_depth(&self) -> u32 {
        self.parent_table_depth
    }

    /// Hops followed from a table to the tables that reference it.
    pub fn child_table_depth(&self) -> u32 {
        self.child_table_depth
    }

    pub fn compose(&self, fragment: &FilterFragment) -> Self {
        Self {
            parent_table_depth: pick(&fragment.parent_table_depth, &self.parent_table_depth),
            child_table_depth: pick(&fragment.child_table_depth, &self.child_table_depth),
        }
    }
}

/// Partial filter options supplied by one `filter` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterFragment {
    pub parent_table_depth: Option<u32>,
    pub child_table_depth: Option<u32>,
}

impl FilterFragment {
    pub const KEYS: &'static [&'static str] = &["parents", "children"];

    pub fn from_args(args: &OptionArgs) -> Result<Self> {
        Ok(Self {
            parent_table_depth: args.get_u32("parents")?,
            child_table_depth: args.get_u32("children")?,
        })
    }

    pub fn overlay(&self, later_fragment: &Self) -> Self {
        Self {
            parent_table_depth: later(&self.parent_table_depth, &later_fragment.parent_table_depth),
            child_table_depth: later(&self.child_table_depth, &later_fragment.child_table_depth),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
