//! Grep options: match inside retrieved objects rather than on their names.

use super::args::OptionArgs;
use super::rule::InclusionRule;
use super::{later, pick};
use crate::error::Result;
use serde::Serialize;

/// Rules applied to columns, routine parameters and definitions.
///
/// A table survives grep if any of its columns passes the column rule or its
/// definition/remarks pass the definition rule. `invert_match` flips the
/// verdict; `only_matching` drops related tables that did not match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrepOptions {
    columns: InclusionRule,
    parameters: InclusionRule,
    definitions: InclusionRule,
    invert_match: bool,
    only_matching: bool,
}

impl GrepOptions {
    pub fn columns(&self) -> &InclusionRule {
        &self.columns
    }

    pub fn parameters(&self) -> &InclusionRule {
        &self.parameters
    }

    pub fn definitions(&self) -> &InclusionRule {
        &self.definitions
    }

    pub fn invert_match(&self) -> bool {
        self.invert_match
    }

    pub fn only_matching(&self) -> bool {
        self.only_matching
    }

    /// Returns true if any grep rule is set; otherwise every object passes.
    pub fn is_active(&self) -> bool {
        !(self.columns.is_include_all()
            && self.parameters.is_include_all()
            && self.definitions.is_include_all())
    }

    /// Returns a copy with every field present in `fragment` replaced.
    pub fn compose(&self, fragment: &GrepFragment) -> Self {
        Self {
            columns: pick(&fragment.columns, &self.columns),
            parameters: pick(&fragment.parameters, &self.parameters),
            definitions: pick(&fragment.definitions, &self.definitions),
            invert_match: pick(&fragment.invert_match, &self.invert_match),
            only_matching: pick(&fragment.only_matching, &self.only_matching),
        }
    }
}

/// Partial grep options supplied by one `grep` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrepFragment {
    pub columns: Option<InclusionRule>,
    pub parameters: Option<InclusionRule>,
    pub definitions: Option<InclusionRule>,
    pub invert_match: Option<bool>,
    pub only_matching: Option<bool>,
}

impl GrepFragment {
    pub const KEYS: &'static [&'static str] = &[
        "include-grepped-columns",
        "exclude-grepped-columns",
        "include-grepped-parameters",
        "exclude-grepped-parameters",
        "include-grepped-definitions",
        "exclude-grepped-definitions",
        "invert-match",
        "only-matching",
    ];

    /// Builds a fragment from normalized arguments, compiling every pattern.
    pub fn from_args(args: &OptionArgs) -> Result<Self> {
        Ok(Self {
            columns: grep_rule(args, "columns")?,
            parameters: grep_rule(args, "parameters")?,
            definitions: grep_rule(args, "definitions")?,
            invert_match: args.get_bool("invert-match")?,
            only_matching: args.get_bool("only-matching")?,
        })
    }

    /// Returns a fragment with `later`'s explicit fields over this one's.
    pub fn overlay(&self, later_fragment: &Self) -> Self {
        Self {
            columns: later(&self.columns, &later_fragment.columns),
            parameters: later(&self.parameters, &later_fragment.parameters),
            definitions: later(&self.definitions, &later_fragment.definitions),
            invert_match: later(&self.invert_match, &later_fragment.invert_match),
            only_matching: later(&self.only_matching, &later_fragment.only_matching),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn grep_rule(args: &OptionArgs, target: &str) -> Result<Option<InclusionRule>> {
    let include_key = format!("include-grepped-{target}");
    let exclude_key = format!("exclude-grepped-{target}");
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

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(pairs: &[(&str, &str)]) -> GrepFragment {
        GrepFragment::from_args(&OptionArgs::from_pairs(pairs.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_is_inactive() {
        assert!(!GrepOptions::default().is_active());
    }

    #[test]
    fn test_compose_sets_rule_and_flag() {
        let options = GrepOptions::default().compose(&fragment(&[
            ("includeGreppedColumns", ".*REGIONS.*"),
            ("onlyMatching", "true"),
        ]));

        assert!(options.is_active());
        assert!(options.only_matching());
        assert!(!options.invert_match());
        assert!(options.columns().test("PUBLIC.REGIONS.ID"));
    }

    #[test]
    fn test_overlay_matches_stepwise_composition() {
        let a = fragment(&[("include-grepped-columns", ".*ID"), ("invert-match", "true")]);
        let b = fragment(&[("invert-match", "false"), ("only-matching", "true")]);
        let base = GrepOptions::default();

        assert_eq!(base.compose(&a).compose(&b), base.compose(&a.overlay(&b)));
        let composed = base.compose(&a).compose(&b);
        assert!(!composed.invert_match());
        assert!(composed.only_matching());
        assert!(composed.columns().test("X.Y.ID"));
    }

    #[test]
    fn test_absent_flag_keeps_base() {
        let base = GrepOptions::default().compose(&fragment(&[("only-matching", "true")]));
        let composed = base.compose(&fragment(&[("include-grepped-definitions", ".*TODO.*")]));
        assert!(composed.only_matching());
    }
}
