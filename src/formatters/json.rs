//! JSON document output.

use super::sink::OutputSink;
use crate::catalog::{ColumnDataType, CrawlInfo, Routine, Sequence, Synonym, Table};
use crate::error::{LensError, Result};
use crate::options::{OutputOptions, ReportOptions};
use crate::traversal::{CatalogHandler, CatalogObject};
use serde::Serialize;

/// The document written at the end of traversal.
#[derive(Debug, Default, Serialize)]
struct JsonDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crawl_info: Option<CrawlInfo>,
    column_data_types: Vec<ColumnDataType>,
    tables: Vec<Table>,
    routines: Vec<Routine>,
    synonyms: Vec<Synonym>,
    sequences: Vec<Sequence>,
}

/// Collects the catalog and writes it as one pretty-printed JSON document.
pub struct JsonFormatter {
    sink: OutputSink,
    report: ReportOptions,
    document: JsonDocument,
}

impl JsonFormatter {
    pub fn new(sink: OutputSink, output: &OutputOptions, report: ReportOptions) -> Self {
        Self {
            sink,
            report,
            document: JsonDocument {
                title: output.title().map(String::from),
                ..Default::default()
            },
        }
    }
}

impl CatalogHandler for JsonFormatter {
    fn handle_crawl_info(&mut self, info: &CrawlInfo) -> Result<()> {
        if self.report.shows_system_info() {
            self.document.crawl_info = Some(info.clone());
        }
        Ok(())
    }

    fn handle(&mut self, object: CatalogObject<'_>) -> Result<()> {
        let hide = self.report.hide_remarks;
        match object {
            CatalogObject::ColumnDataType(t) => self.document.column_data_types.push(t.clone()),
            CatalogObject::Table(t) => {
                let mut table = t.clone();
                if hide {
                    table.remarks = None;
                    table.columns.iter_mut().for_each(|c| c.remarks = None);
                }
                self.document.tables.push(table);
            }
            CatalogObject::Routine(r) => {
                let mut routine = r.clone();
                if hide {
                    routine.remarks = None;
                }
                self.document.routines.push(routine);
            }
            CatalogObject::Synonym(s) => self.document.synonyms.push(s.clone()),
            CatalogObject::Sequence(s) => self.document.sequences.push(s.clone()),
        }
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.document)
            .map_err(|e| LensError::internal(format!("Cannot serialize catalog: {e}")))?;
        self.sink.write_line(&json)?;
        self.sink.flush()
    }
}
