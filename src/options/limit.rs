//! Limit options: which objects a crawl retrieves, per category.

use super::args::OptionArgs;
use super::rule::InclusionRule;
use super::{later, pick};
use crate::error::Result;
use serde::Serialize;

/// Object categories that carry their own inclusion rule.
const CATEGORIES: [&str; 6] = [
    "schemas",
    "tables",
    "routines",
    "columns",
    "synonyms",
    "sequences",
];

/// Inclusion rules per object category. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitOptions {
    schemas: InclusionRule,
    tables: InclusionRule,
    routines: InclusionRule,
    columns: InclusionRule,
    synonyms: InclusionRule,
    sequences: InclusionRule,
    table_types: Vec<String>,
}

impl Default for LimitOptions {
    fn default() -> Self {
        Self {
            schemas: InclusionRule::IncludeAll,
            tables: InclusionRule::IncludeAll,
            routines: InclusionRule::IncludeAll,
            columns: InclusionRule::IncludeAll,
            synonyms: InclusionRule::ExcludeAll,
            sequences: InclusionRule::ExcludeAll,
            table_types: Vec::new(),
        }
    }
}

impl LimitOptions {
    pub fn schemas(&self) -> &InclusionRule {
        &self.schemas
    }

    pub fn tables(&self) -> &InclusionRule {
        &self.tables
    }

    pub fn routines(&self) -> &InclusionRule {
        &self.routines
    }

    pub fn columns(&self) -> &InclusionRule {
        &self.columns
    }

    pub fn synonyms(&self) -> &InclusionRule {
        &self.synonyms
    }

    pub fn sequences(&self) -> &InclusionRule {
        &self.sequences
    }

    /// Table types to retrieve. Empty means every type.
    pub fn table_types(&self) -> &[String] {
        &self.table_types
    }

    /// Returns true if tables of `table_type` are retrieved.
    pub fn includes_table_type(&self, table_type: &str) -> bool {
        self.table_types.is_empty()
            || self
                .table_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(table_type))
    }

    /// Returns a copy with every field present in `fragment` replaced.
    pub fn compose(&self, fragment: &LimitFragment) -> Self {
        Self {
            schemas: pick(&fragment.schemas, &self.schemas),
            tables: pick(&fragment.tables, &self.tables),
            routines: pick(&fragment.routines, &self.routines),
            columns: pick(&fragment.columns, &self.columns),
            synonyms: pick(&fragment.synonyms, &self.synonyms),
            sequences: pick(&fragment.sequences, &self.sequences),
            table_types: pick(&fragment.table_types, &self.table_types),
        }
    }
}

/// Partial limit options supplied by one `limit` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LimitFragment {
    pub schemas: Option<InclusionRule>,
    pub tables: Option<InclusionRule>,
    pub routines: Option<InclusionRule>,
    pub columns: Option<InclusionRule>,
    pub synonyms: Option<InclusionRule>,
    pub sequences: Option<InclusionRule>,
    pub table_types: Option<Vec<String>>,
}

impl LimitFragment {
    pub const KEYS: &'static [&'static str] = &[
        "include-schemas",
        "exclude-schemas",
        "include-tables",
        "exclude-tables",
        "include-routines",
        "exclude-routines",
        "include-columns",
        "exclude-columns",
        "include-synonyms",
        "exclude-synonyms",
        "include-sequences",
        "exclude-sequences",
        "table-types",
    ];

    /// Builds a fragment from normalized arguments, compiling every pattern.
    ///
    /// Keys outside [`Self::KEYS`] are ignored; callers that must reject them
    /// check with [`OptionArgs::ensure_known`] first.
    pub fn from_args(args: &OptionArgs) -> Result<Self> {
        let [schemas, tables, routines, columns, synonyms, sequences] =
            CATEGORIES.map(|category| category_rule(args, category));

        Ok(Self {
            schemas: schemas?,
            tables: tables?,
            routines: routines?,
            columns: columns?,
            synonyms: synonyms?,
            sequences: sequences?,
            table_types: args.get("table-types").map(|v| {
                v.split(',')
                    .map(|t| t.trim().to_uppercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            }),
        })
    }

    /// Returns a fragment with `later`'s explicit fields over this one's.
    pub fn overlay(&self, later_fragment: &Self) -> Self {
        Self {
            schemas: later(&self.schemas, &later_fragment.schemas),
            tables: later(&self.tables, &later_fragment.tables),
            routines: later(&self.routines, &later_fragment.routines),
            columns: later(&self.columns, &later_fragment.columns),
            synonyms: later(&self.synonyms, &later_fragment.synonyms),
            sequences: later(&self.sequences, &later_fragment.sequences),
            table_types: later(&self.table_types, &later_fragment.table_types),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Builds the rule for one category if either of its keys was given.
fn category_rule(args: &OptionArgs, category: &str) -> Result<Option<InclusionRule>> {
    let include_key = format!("include-{category}");
    let exclude_key = format!("exclude-{category}");
    let include = args.get(&include_key);
    let exclude = args.get(&exclude_key);

    if include.is_none() && exclude.is_none() {
        return Ok(None);
    }

    InclusionRule::from_patterns(
        include.map(|src| (include_key.as_str(), src)),
        exclude.map(|src| (exclude_key.as_str(), src)),
    )
    .map(Some)
}
