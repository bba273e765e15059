//! Applies crawl options to a full catalog.
//!
//! In-process crawlers (offline snapshots, the mock) hold a complete catalog
//! and narrow it here, the way a live crawler narrows its metadata queries.

use super::schema::{Catalog, DatabaseObject, Routine, Table, WeakAssociation};
use crate::options::{CrawlOptions, GrepOptions};
use std::collections::BTreeSet;

/// Returns the part of `catalog` selected by `options`.
pub fn apply_options(catalog: &Catalog, options: &CrawlOptions) -> Catalog {
    let limit = options.limit();
    let load = options.load();
    let info_level = load.info_level();

    // Limit: names and table types.
    let mut tables: Vec<Table> = catalog
        .tables
        .iter()
        .filter(|t| {
            limit.schemas().test(&t.schema)
                && limit.tables().test(&t.full_name())
                && limit.includes_table_type(&t.table_type)
        })
        .cloned()
        .map(|mut table| {
            let full_name = table.full_name();
            table
                .columns
                .retain(|c| limit.columns().test(&format!("{full_name}.{}", c.name)));
            table
        })
        .collect();

    // Grep and filter depth, computed before details are stripped so that
    // definitions and columns can still be matched.
    tables = grep_tables(tables, options);

    for table in &mut tables {
        if !info_level.retrieves_details() {
            table.columns.clear();
            table.primary_key.clear();
            table.foreign_keys.clear();
            table.indexes.clear();
        }
        if !info_level.retrieves_definitions() {
            table.definition = None;
        }
        if !load.load_row_counts() {
            table.row_count = None;
        }
        table.weak_associations.clear();
    }

    if load.weak_associations() && info_level.retrieves_details() {
        let associations: Vec<Vec<WeakAssociation>> =
            tables.iter().map(|t| infer_weak_associations(t, &tables)).collect();
        for (table, found) in tables.iter_mut().zip(associations) {
            table.weak_associations = found;
        }
    }

    let routines = catalog
        .routines
        .iter()
        .filter(|r| limit.schemas().test(&r.schema) && limit.routines().test(&r.full_name()))
        .filter(|r| routine_passes_grep(r, options.grep()))
        .cloned()
        .map(|mut routine| {
            if !info_level.retrieves_details() {
                routine.parameters.clear();
            }
            if !info_level.retrieves_definitions() {
                routine.definition = None;
            }
            routine
        })
        .collect();

    let synonyms = catalog
        .synonyms
        .iter()
        .filter(|s| limit.schemas().test(&s.schema) && limit.synonyms().test(&s.full_name()))
        .cloned()
        .collect();

    let sequences = catalog
        .sequences
        .iter()
        .filter(|s| limit.schemas().test(&s.schema) && limit.sequences().test(&s.full_name()))
        .cloned()
        .collect();

    let column_data_types = if info_level.retrieves_details() {
        catalog.column_data_types.clone()
    } else {
        Vec::new()
    };

    Catalog {
        crawl_info: catalog.crawl_info.clone(),
        column_data_types,
        tables,
        routines,
        synonyms,
        sequences,
    }
}

/// Keeps grep matches plus related tables within the configured depth.
fn grep_tables(tables: Vec<Table>, options: &CrawlOptions) -> Vec<Table> {
    let grep = options.grep();
    if grep.columns().is_include_all() && grep.definitions().is_include_all() {
        return tables;
    }

    let mut keep: BTreeSet<String> = tables
        .iter()
        .filter(|t| table_matches_grep(t, grep) != grep.invert_match())
        .map(|t| t.full_name())
        .collect();

    if !grep.only_matching() {
        let filter = options.filter();
        let matched = keep.clone();
        keep.extend(related(&tables, &matched, filter.parent_table_depth(), Direction::Parents));
        keep.extend(related(&tables, &matched, filter.child_table_depth(), Direction::Children));
    }

    let mut kept: Vec<Table> = tables
        .into_iter()
        .filter(|t| keep.contains(&t.full_name()))
        .collect();

    if grep.only_matching() {
        for table in &mut kept {
            table
                .foreign_keys
                .retain(|fk| keep.contains(&fk.referenced_table));
        }
    }

    kept
}

fn table_matches_grep(table: &Table, grep: &GrepOptions) -> bool {
    let column_match = !grep.columns().is_include_all()
        && table
            .columns
            .iter()
            .any(|c| grep.columns().test(&table.column_full_name(&c.name)));

    let definition_match = !grep.definitions().is_include_all()
        && [table.definition.as_deref(), table.remarks.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| grep.definitions().test(text));

    column_match || definition_match
}

fn routine_passes_grep(routine: &Routine, grep: &GrepOptions) -> bool {
    if grep.parameters().is_include_all() && grep.definitions().is_include_all() {
        return true;
    }

    let parameter_match = !grep.parameters().is_include_all()
        && routine
            .parameters
            .iter()
            .any(|p| grep.parameters().test(&format!("{}.{}", routine.full_name(), p.name)));

    let definition_match = !grep.definitions().is_include_all()
        && [routine.definition.as_deref(), routine.remarks.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| grep.definitions().test(text));

    (parameter_match || definition_match) != grep.invert_match()
}

#[derive(Clone, Copy)]
enum Direction {
    Parents,
    Children,
}

/// Tables reachable from `start` within `depth` foreign key hops.
fn related(tables: &[Table], start: &BTreeSet<String>, depth: u32, direction: Direction) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut frontier = start.clone();

    for _ in 0..depth {
        let next: BTreeSet<String> = tables
            .iter()
            .flat_map(|t| {
                t.foreign_keys
                    .iter()
                    .map(move |fk| (t.full_name(), fk.referenced_table.clone()))
            })
            .filter_map(|(child, parent)| match direction {
                Direction::Parents if frontier.contains(&child) => Some(parent),
                Direction::Children if frontier.contains(&parent) => Some(child),
                _ => None,
            })
            .filter(|name| !start.contains(name) && !found.contains(name))
            .collect();

        if next.is_empty() {
            break;
        }
        found.extend(next.iter().cloned());
        frontier = next;
    }

    found
}

/// Infers `<TABLE>_ID` / `<TABLE>ID` columns that point at a table's
/// single-column primary key without a declared foreign key.
fn infer_weak_associations(table: &Table, tables: &[Table]) -> Vec<WeakAssociation> {
    let declared: BTreeSet<&str> = table
        .foreign_keys
        .iter()
        .flat_map(|fk| fk.columns.iter().map(String::as_str))
        .collect();

    table
        .columns
        .iter()
        .filter(|c| !declared.contains(c.name.as_str()) && !table.primary_key.contains(&c.name))
        .filter_map(|column| {
            let upper = column.name.to_uppercase();
            let stem = upper
                .strip_suffix("_ID")
                .or_else(|| upper.strip_suffix("ID"))
                .filter(|s| !s.is_empty())?;

            tables
                .iter()
                .filter(|other| other.full_name() != table.full_name())
                .find(|other| {
                    let name = other.name.to_uppercase();
                    (name == stem || name == format!("{stem}S")) && other.primary_key.len() == 1
                })
                .map(|other| WeakAssociation {
                    column: column.name.clone(),
                    referenced_table: other.full_name(),
                    referenced_column: other.primary_key[0].clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::sample_catalog;
    use crate::options::{
        FilterFragment, GrepFragment, LimitFragment, LoadFragment, OptionArgs, OptionsFragment,
    };

    fn options(fragments: &[OptionsFragment]) -> CrawlOptions {
        fragments
            .iter()
            .fold(CrawlOptions::default(), |acc, f| acc.compose(f))
    }

    fn args(pairs: &[(&str, &str)]) -> OptionArgs {
        OptionArgs::from_pairs(pairs.iter().copied())
    }

    fn table_names(catalog: &Catalog) -> Vec<String> {
        catalog.tables.iter().map(|t| t.full_name()).collect()
    }

    #[test]
    fn test_default_options_keep_tables_but_not_sequences() {
        let catalog = apply_options(&sample_catalog(), &CrawlOptions::default());
        assert_eq!(catalog.tables.len(), sample_catalog().tables.len());
        assert!(catalog.sequences.is_empty());
        assert!(catalog.synonyms.is_empty());
    }

    #[test]
    fn test_limit_tables() {
        let opts = options(&[OptionsFragment::Limit(
            LimitFragment::from_args(&args(&[("include-tables", ".*BOOKS")])).unwrap(),
        )]);
        let catalog = apply_options(&sample_catalog(), &opts);
        assert_eq!(table_names(&catalog), vec!["PUBLIC.BOOKS.BOOKS"]);
    }

    #[test]
    fn test_grep_columns_with_and_without_only_matching() {
        let grep = |only: &str| {
            options(&[
                OptionsFragment::Grep(
                    GrepFragment::from_args(&args(&[
                        ("include-grepped-columns", ".*\\.SALES\\.REGION_ID"),
                        ("only-matching", only),
                    ]))
                    .unwrap(),
                ),
                OptionsFragment::Filter(
                    FilterFragment::from_args(&args(&[("parents", "1")])).unwrap(),
                ),
            ])
        };

        let related = apply_options(&sample_catalog(), &grep("false"));
        let mut names = table_names(&related);
        names.sort();
        assert_eq!(
            names,
            vec!["PUBLIC.PUBLISHER_SALES.REGIONS", "PUBLIC.PUBLISHER_SALES.SALES"]
        );

        let only = apply_options(&sample_catalog(), &grep("true"));
        assert_eq!(table_names(&only), vec!["PUBLIC.PUBLISHER_SALES.SALES"]);
        assert!(only.tables[0].foreign_keys.is_empty());
    }

    #[test]
    fn test_grep_invert_match() {
        let opts = options(&[OptionsFragment::Grep(
            GrepFragment::from_args(&args(&[
                ("include-grepped-columns", ".*\\.ID"),
                ("invert-match", "true"),
            ]))
            .unwrap(),
        )]);
        let catalog = apply_options(&sample_catalog(), &opts);
        assert!(catalog.tables.iter().all(|t| t.column("ID").is_none()));
        assert!(!catalog.tables.is_empty());
    }

    #[test]
    fn test_minimum_info_level_strips_details() {
        let opts = options(&[OptionsFragment::Load(
            LoadFragment::from_args(&args(&[("info-level", "minimum")])).unwrap(),
        )]);
        let catalog = apply_options(&sample_catalog(), &opts);
        assert!(catalog.tables.iter().all(|t| t.columns.is_empty()));
        assert!(catalog.column_data_types.is_empty());
        assert!(catalog.routines.iter().all(|r| r.parameters.is_empty()));
    }

    #[test]
    fn test_row_counts_only_when_requested() {
        let without = apply_options(&sample_catalog(), &CrawlOptions::default());
        assert!(without.tables.iter().all(|t| t.row_count.is_none()));

        let opts = options(&[OptionsFragment::Load(
            LoadFragment::from_args(&args(&[("load-row-counts", "true")])).unwrap(),
        )]);
        let with = apply_options(&sample_catalog(), &opts);
        assert!(with.tables.iter().any(|t| t.row_count.is_some()));
    }

    #[test]
    fn test_weak_associations_inferred() {
        let opts = options(&[OptionsFragment::Load(
            LoadFragment::from_args(&args(&[("weak-associations", "true")])).unwrap(),
        )]);
        let catalog = apply_options(&sample_catalog(), &opts);
        let books = catalog.table("PUBLIC.BOOKS.BOOKS").unwrap();
        assert!(books
            .weak_associations
            .iter()
            .any(|w| w.column == "PUBLISHER_ID"
                && w.referenced_table == "PUBLIC.BOOKS.PUBLISHERS"));
    }
}
