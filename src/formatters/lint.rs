//! Schema lint report.
//!
//! Table linters run as tables are visited; the collected findings are
//! written as a JSON report when traversal ends.

use super::sink::OutputSink;
use crate::catalog::{CrawlInfo, DatabaseObject, ForeignKey, Table};
use crate::error::{LensError, Result};
use crate::options::{OutputOptions, ReportOptions};
use crate::traversal::{CatalogHandler, CatalogObject};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One finding against one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lint {
    pub id: &'static str,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct TableLints {
    table: String,
    lints: Vec<Lint>,
}

#[derive(Debug, Default, Serialize)]
struct LintSummary {
    tables_checked: usize,
    total: usize,
    high: usize,
    medium: usize,
    low: usize,
}

#[derive(Debug, Default, Serialize)]
struct LintReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crawl_info: Option<CrawlInfo>,
    summary: LintSummary,
    tables: Vec<TableLints>,
}

/// Runs every table linter over `table`.
///
/// Key and column linters need column detail; a table crawled without it is
/// only checked for remarks.
pub fn lint_table(table: &Table) -> Vec<Lint> {
    let mut lints = Vec::new();

    if !table.has_remarks() {
        lints.push(Lint {
            id: "no-remarks",
            severity: Severity::Low,
            message: "Table has no remarks".to_string(),
        });
    }

    if table.is_view() || table.columns.is_empty() {
        return lints;
    }

    if table.primary_key.is_empty() {
        lints.push(Lint {
            id: "no-primary-key",
            severity: Severity::High,
            message: "Table has no primary key".to_string(),
        });
    }

    if table.columns.len() == 1 {
        lints.push(Lint {
            id: "single-column",
            severity: Severity::Low,
            message: "Table has only one column".to_string(),
        });
    }

    if !table.columns.is_empty() && table.columns.iter().all(|c| c.nullable) {
        lints.push(Lint {
            id: "all-columns-nullable",
            severity: Severity::Medium,
            message: "Every column allows NULL".to_string(),
        });
    }

    for fk in &table.foreign_keys {
        if !is_indexed(table, fk) {
            lints.push(Lint {
                id: "foreign-key-without-index",
                severity: Severity::Medium,
                message: format!(
                    "Foreign key {}({}) has no covering index",
                    fk.name.as_deref().unwrap_or(""),
                    fk.columns.join(", ")
                ),
            });
        }
    }

    lints
}

/// A foreign key is covered when its columns lead an index or the primary key.
fn is_indexed(table: &Table, fk: &ForeignKey) -> bool {
    let leads = |columns: &[String]| columns.starts_with(&fk.columns);
    leads(table.primary_key.as_slice())
        || table
            .indexes
            .iter()
            .any(|index| leads(index.columns.as_slice()))
}

pub struct LintFormatter {
    sink: OutputSink,
    report: ReportOptions,
    lint_report: LintReport,
}

impl LintFormatter {
    pub fn new(sink: OutputSink, output: &OutputOptions, report: ReportOptions) -> Self {
        Self {
            sink,
            report,
            lint_report: LintReport {
                title: output.title().map(String::from),
                ..Default::default()
            },
        }
    }
}

impl CatalogHandler for LintFormatter {
    fn handle_crawl_info(&mut self, info: &CrawlInfo) -> Result<()> {
        if self.report.shows_system_info() {
            self.lint_report.crawl_info = Some(info.clone());
        }
        Ok(())
    }

    fn handle(&mut self, object: CatalogObject<'_>) -> Result<()> {
        let CatalogObject::Table(table) = object else {
            return Ok(());
        };

        let lints = lint_table(table);
        let summary = &mut self.lint_report.summary;
        summary.tables_checked += 1;
        for lint in &lints {
            summary.total += 1;
            match lint.severity {
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }

        if !lints.is_empty() {
            self.lint_report.tables.push(TableLints {
                table: table.full_name(),
                lints,
            });
        }
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.lint_report)
            .map_err(|e| LensError::internal(format!("Cannot serialize lint report: {e}")))?;
        self.sink.write_line(&json)?;
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{apply_options, sample_catalog, Column};
    use crate::options::{CrawlOptions, LoadFragment, OptionArgs, OptionsFragment};
    use crate::traversal::CatalogTraverser;

    fn ids(lints: &[Lint]) -> Vec<&'static str> {
        lints.iter().map(|l| l.id).collect()
    }

    fn table<'a>(catalog: &'a crate::catalog::Catalog, name: &str) -> &'a Table {
        catalog.tables.iter().find(|t| t.name == name).unwrap()
    }

    #[test]
    fn test_clean_table_has_no_lints() {
        let catalog = sample_catalog();
        assert!(lint_table(table(&catalog, "AUTHORS")).is_empty());
    }

    #[test]
    fn test_link_table_lints() {
        let catalog = sample_catalog();
        assert_eq!(
            ids(&lint_table(table(&catalog, "BOOKAUTHORS"))),
            vec!["no-primary-key", "foreign-key-without-index"]
        );
    }

    #[test]
    fn test_views_only_checked_for_remarks() {
        let catalog = sample_catalog();
        assert_eq!(ids(&lint_table(table(&catalog, "AUTHORSLIST"))), vec!["no-remarks"]);
    }

    #[test]
    fn test_minimum_info_level_skips_key_linters() {
        let options = CrawlOptions::default().compose(&OptionsFragment::Load(
            LoadFragment::from_args(&OptionArgs::from_pairs([("info-level", "minimum")])).unwrap(),
        ));
        let catalog = apply_options(&sample_catalog(), &options);

        assert!(lint_table(table(&catalog, "AUTHORS")).is_empty());
        assert!(ids(&lint_table(table(&catalog, "BOOKAUTHORS")))
            .iter()
            .all(|id| *id == "no-remarks"));
    }

    #[test]
    fn test_single_nullable_column() {
        let mut t = Table::new("PUBLIC.X", "NOTES");
        t.remarks = Some("Free text".to_string());
        t.primary_key = vec![];
        t.columns = vec![Column {
            nullable: true,
            ..Column::new("TEXT", "VARCHAR")
        }];
        assert_eq!(
            ids(&lint_table(&t)),
            vec!["no-primary-key", "single-column", "all-columns-nullable"]
        );
    }

    #[test]
    fn test_report_summary() {
        let catalog = sample_catalog();
        let (sink, buffer) = OutputSink::memory();
        let report = ReportOptions {
            no_info: true,
            ..Default::default()
        };
        let mut formatter = LintFormatter::new(sink, &OutputOptions::default(), report);
        CatalogTraverser::new(&catalog).traverse(&mut formatter).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&buffer.contents()).unwrap();
        assert!(parsed.get("crawl_info").is_none());
        assert_eq!(parsed["summary"]["tables_checked"], 7);
        assert_eq!(parsed["summary"]["high"], 2);
        assert_eq!(parsed["tables"][0]["table"], "PUBLIC.BOOKS.AUTHORSLIST");
    }
}
