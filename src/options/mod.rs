//! Crawl and output options.
//!
//! Option values are immutable. Commands supply *fragments* (one `Option`
//! per field) and the session composes them onto its current options; a field
//! present in a fragment replaces the base value wholesale.

mod args;
mod filter;
mod grep;
mod limit;
mod load;
mod output;
mod rule;

pub use args::{normalize_key, OptionArgs};
pub use filter::{FilterFragment, FilterOptions};
pub use grep::{GrepFragment, GrepOptions};
pub use limit::{LimitFragment, LimitOptions};
pub use load::{InfoLevel, LoadFragment, LoadOptions};
pub use output::{Destination, OutputFragment, OutputOptions, ReportOptions, DEFAULT_FORMAT};
pub use rule::{InclusionRule, Pattern};

use crate::error::Result;
use serde::Serialize;

/// Takes the fragment's value if present, otherwise the base value.
pub(crate) fn pick<T: Clone>(fragment: &Option<T>, base: &T) -> T {
    fragment.as_ref().unwrap_or(base).clone()
}

/// Takes the later fragment's value if present, otherwise the earlier one.
pub(crate) fn later<T: Clone>(earlier: &Option<T>, later: &Option<T>) -> Option<T> {
    later.as_ref().or(earlier.as_ref()).cloned()
}

/// Everything the crawler needs to know: limit, grep, filter and load options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlOptions {
    limit: LimitOptions,
    grep: GrepOptions,
    filter: FilterOptions,
    load: LoadOptions,
}

impl CrawlOptions {
    pub fn limit(&self) -> &LimitOptions {
        &self.limit
    }

    pub fn grep(&self) -> &GrepOptions {
        &self.grep
    }

    pub fn filter(&self) -> &FilterOptions {
        &self.filter
    }

    pub fn load(&self) -> &LoadOptions {
        &self.load
    }

    pub fn with_limit_options(&self, limit: LimitOptions) -> Self {
        Self {
            limit,
            ..self.clone()
        }
    }

    pub fn with_grep_options(&self, grep: GrepOptions) -> Self {
        Self {
            grep,
            ..self.clone()
        }
    }

    pub fn with_filter_options(&self, filter: FilterOptions) -> Self {
        Self {
            filter,
            ..self.clone()
        }
    }

    pub fn with_load_options(&self, load: LoadOptions) -> Self {
        Self {
            load,
            ..self.clone()
        }
    }

    /// Returns new options with `fragment` composed onto the matching part.
    pub fn compose(&self, fragment: &OptionsFragment) -> Self {
        match fragment {
            OptionsFragment::Limit(f) => self.with_limit_options(self.limit.compose(f)),
            OptionsFragment::Grep(f) => self.with_grep_options(self.grep.compose(f)),
            OptionsFragment::Filter(f) => self.with_filter_options(self.filter.compose(f)),
            OptionsFragment::Load(f) => self.with_load_options(self.load.compose(f)),
        }
    }
}

/// A fragment produced by one `limit`, `grep`, `filter` or `load` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsFragment {
    Limit(LimitFragment),
    Grep(GrepFragment),
    Filter(FilterFragment),
    Load(LoadFragment),
}

/// Every explicit fragment a session has received, overlaid in order.
///
/// Applying the overlay to a base is the same as composing each fragment onto
/// that base in arrival order, which lets a new base (from a config file) slide
/// underneath commands that were already issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsOverlay {
    limit: LimitFragment,
    grep: GrepFragment,
    filter: FilterFragment,
    load: LoadFragment,
}

impl OptionsOverlay {
    /// Keys understood by any fragment kind.
    pub fn keys() -> impl Iterator<Item = &'static str> {
        LimitFragment::KEYS
            .iter()
            .chain(GrepFragment::KEYS)
            .chain(FilterFragment::KEYS)
            .chain(LoadFragment::KEYS)
            .copied()
    }

    /// Builds an overlay from a flat key/value mapping, ignoring unknown keys.
    pub fn from_args(args: &OptionArgs) -> Result<Self> {
        Ok(Self {
            limit: LimitFragment::from_args(args)?,
            grep: GrepFragment::from_args(args)?,
            filter: FilterFragment::from_args(args)?,
            load: LoadFragment::from_args(args)?,
        })
    }

    /// Returns a new overlay with `fragment` on top.
    pub fn push(&self, fragment: &OptionsFragment) -> Self {
        let mut next = self.clone();
        match fragment {
            OptionsFragment::Limit(f) => next.limit = self.limit.overlay(f),
            OptionsFragment::Grep(f) => next.grep = self.grep.overlay(f),
            OptionsFragment::Filter(f) => next.filter = self.filter.overlay(f),
            OptionsFragment::Load(f) => next.load = self.load.overlay(f),
        }
        next
    }

    /// Composes every part of the overlay onto `base`.
    pub fn apply_to(&self, base: &CrawlOptions) -> CrawlOptions {
        base.compose(&OptionsFragment::Limit(self.limit.clone()))
            .compose(&OptionsFragment::Grep(self.grep.clone()))
            .compose(&OptionsFragment::Filter(self.filter.clone()))
            .compose(&OptionsFragment::Load(self.load.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.limit.is_empty() && self.grep.is_empty() && self.filter.is_empty() && self.load.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> OptionArgs {
        OptionArgs::from_pairs(pairs.iter().copied())
    }

    fn limit(pairs: &[(&str, &str)]) -> OptionsFragment {
        OptionsFragment::Limit(LimitFragment::from_args(&args(pairs)).unwrap())
    }

    fn grep(pairs: &[(&str, &str)]) -> OptionsFragment {
        OptionsFragment::Grep(GrepFragment::from_args(&args(pairs)).unwrap())
    }

    fn load(pairs: &[(&str, &str)]) -> OptionsFragment {
        OptionsFragment::Load(LoadFragment::from_args(&args(pairs)).unwrap())
    }

    #[test]
    fn test_compose_never_mutates_base() {
        let base = CrawlOptions::default();
        let composed = base.compose(&limit(&[("include-tables", ".*BOOKS")]));
        assert_eq!(base, CrawlOptions::default());
        assert_ne!(composed, base);
        assert_eq!(composed.grep(), base.grep());
        assert_eq!(composed.load(), base.load());
    }

    #[test]
    fn test_fold_equals_overlay() {
        let fragments = [
            limit(&[("include-tables", ".*BOOKS"), ("include-sequences", ".*")]),
            grep(&[("include-grepped-columns", ".*ID")]),
            load(&[("info-level", "maximum")]),
            limit(&[("include-tables", ".*AUTHORS")]),
            grep(&[("only-matching", "true")]),
            load(&[("load-row-counts", "true")]),
        ];
        let base = CrawlOptions::default();

        let folded = fragments.iter().fold(base.clone(), |acc, f| acc.compose(f));
        let overlay = fragments
            .iter()
            .fold(OptionsOverlay::default(), |acc, f| acc.push(f));

        assert_eq!(folded, overlay.apply_to(&base));
        assert!(folded.limit().tables().test("PUBLIC.AUTHORS"));
        assert!(!folded.limit().tables().test("PUBLIC.BOOKS"));
        assert!(folded.limit().sequences().test("PUBLIC.SEQ"));
        assert!(folded.grep().only_matching());
        assert_eq!(folded.load().info_level(), InfoLevel::Maximum);
    }

    #[test]
    fn test_overlay_slides_over_new_base() {
        let base = CrawlOptions::default().compose(&load(&[("info-level", "minimum")]));
        let overlay = OptionsOverlay::default().push(&limit(&[("include-tables", ".*BOOKS")]));

        let applied = overlay.apply_to(&base);
        assert_eq!(applied.load().info_level(), InfoLevel::Minimum);
        assert!(!applied.limit().tables().test("PUBLIC.AUTHORS"));
    }

    #[test]
    fn test_overlay_from_args_routes_keys() {
        let overlay = OptionsOverlay::from_args(&args(&[
            ("include-tables", ".*BOOKS"),
            ("parents", "1"),
            ("weak-associations", "true"),
            ("no-info", "true"),
        ]))
        .unwrap();

        let applied = overlay.apply_to(&CrawlOptions::default());
        assert!(!applied.limit().tables().test("PUBLIC.AUTHORS"));
        assert_eq!(applied.filter().parent_table_depth(), 1);
        assert!(applied.load().weak_associations());
    }
}
