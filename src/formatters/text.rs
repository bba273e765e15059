//! Plain text report.

use super::sink::OutputSink;
use crate::catalog::{CrawlInfo, DatabaseObject, Routine, Sequence, Synonym, Table};
use crate::error::Result;
use crate::options::{OutputOptions, ReportOptions};
use crate::traversal::{CatalogHandler, CatalogObject, Category};

pub const DOCUMENT_START: &str = "----- begin schemalens report -----";
pub const DOCUMENT_END: &str = "----- end schemalens report -----";

/// Writes a human-readable listing of the catalog.
pub struct TextFormatter {
    sink: OutputSink,
    title: Option<String>,
    report: ReportOptions,
}

impl TextFormatter {
    pub fn new(sink: OutputSink, output: &OutputOptions, report: ReportOptions) -> Self {
        Self {
            sink,
            title: output.title().map(String::from),
            report,
        }
    }

    fn heading(&mut self, heading: &str) -> Result<()> {
        self.sink.blank_line()?;
        self.sink.write_line(heading)?;
        self.sink.write_line(&"=".repeat(heading.len()))
    }

    fn display_name(&self, object: &dyn DatabaseObject) -> String {
        if self.report.unqualified_names {
            object.name().to_string()
        } else {
            object.full_name()
        }
    }

    fn remarks(&mut self, remarks: Option<&str>) -> Result<()> {
        if self.report.hide_remarks {
            return Ok(());
        }
        match remarks.map(str::trim).filter(|r| !r.is_empty()) {
            Some(remarks) => self.sink.write_line(&format!("  -- {remarks}")),
            None => Ok(()),
        }
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        self.remarks(table.remarks.as_deref())?;
        if !self.report.show_columns {
            return Ok(());
        }

        for (ordinal, column) in table.columns.iter().enumerate() {
            let nullable = if column.nullable { "" } else { "  not null" };
            let key = if table.primary_key.contains(&column.name) {
                "  primary key"
            } else {
                ""
            };
            let line = if self.report.show_ordinal_numbers {
                format!("  {}. {}  {}{nullable}{key}", ordinal + 1, column.name, column.data_type)
            } else {
                format!("  {}  {}{nullable}{key}", column.name, column.data_type)
            };
            self.sink.write_line(&line)?;
        }

        for fk in &table.foreign_keys {
            let target = format!("{} ({})", fk.referenced_table, fk.referenced_columns.join(", "));
            let line = match (&fk.name, self.report.no_foreign_key_names) {
                (Some(name), false) => format!("  {name}: ({}) -> {target}", fk.columns.join(", ")),
                _ => format!("  ({}) -> {target}", fk.columns.join(", ")),
            };
            self.sink.write_line(&line)?;
        }

        for weak in &table.weak_associations {
            self.sink.write_line(&format!(
                "  ({}) ~> {} ({})",
                weak.column, weak.referenced_table, weak.referenced_column
            ))?;
        }

        if let Some(rows) = table.row_count {
            self.sink.write_line(&format!("  {rows} rows"))?;
        }
        Ok(())
    }

    fn routine(&mut self, routine: &Routine) -> Result<()> {
        self.remarks(routine.remarks.as_deref())?;
        if !self.report.show_columns {
            return Ok(());
        }
        for parameter in &routine.parameters {
            self.sink.write_line(&format!(
                "  {}  {}  {}",
                parameter.name,
                parameter.data_type,
                parameter.mode.to_lowercase()
            ))?;
        }
        if !routine.return_type.is_empty() {
            self.sink
                .write_line(&format!("  returns {}", routine.return_type))?;
        }
        Ok(())
    }

    fn synonym(&mut self, synonym: &Synonym) -> Result<()> {
        self.sink
            .write_line(&format!("  for {}", synonym.referenced_object))?;
        self.remarks(synonym.remarks.as_deref())
    }

    fn sequence(&mut self, sequence: &Sequence) -> Result<()> {
        let mut line = format!("  increment {}", sequence.increment);
        if let Some(minimum) = sequence.minimum {
            line.push_str(&format!(", minimum {minimum}"));
        }
        if let Some(maximum) = sequence.maximum {
            line.push_str(&format!(", maximum {maximum}"));
        }
        if sequence.cycle {
            line.push_str(", cycle");
        }
        self.sink.write_line(&line)?;
        self.remarks(sequence.remarks.as_deref())
    }
}

impl CatalogHandler for TextFormatter {
    fn begin(&mut self) -> Result<()> {
        self.sink.write_line(DOCUMENT_START)?;
        if let Some(title) = self.title.clone() {
            self.sink.blank_line()?;
            self.sink.write_line(&title)?;
        }
        Ok(())
    }

    fn handle_crawl_info(&mut self, info: &CrawlInfo) -> Result<()> {
        if !self.report.shows_system_info() {
            return Ok(());
        }

        self.heading("System Information")?;
        if !self.report.no_crawler_info {
            self.sink
                .write_line(&format!("generated by      {}", info.crawler_version))?;
            self.sink
                .write_line(&format!("generated on      {}", info.crawl_timestamp))?;
        }
        if self.report.show_database_info {
            self.sink.write_line(&format!(
                "database product  {} {}",
                info.database_product, info.database_version
            ))?;
        }
        if self.report.show_driver_info {
            self.sink
                .write_line(&format!("driver            {}", info.driver_version))?;
        }
        Ok(())
    }

    fn handle_start(&mut self, category: Category) -> Result<()> {
        self.heading(category.title())
    }

    fn handle(&mut self, object: CatalogObject<'_>) -> Result<()> {
        let name = self.display_name(object.as_database_object());
        if object.category() != Category::ColumnDataTypes {
            self.sink.blank_line()?;
        }
        self.sink
            .write_line(&format!("{name}  [{}]", object.type_label()))?;

        match object {
            CatalogObject::ColumnDataType(_) => Ok(()),
            CatalogObject::Table(table) => self.table(table),
            CatalogObject::Routine(routine) => self.routine(routine),
            CatalogObject::Synonym(synonym) => self.synonym(synonym),
            CatalogObject::Sequence(sequence) => self.sequence(sequence),
        }
    }

    fn end(&mut self) -> Result<()> {
        self.sink.blank_line()?;
        self.sink.write_line(DOCUMENT_END)?;
        self.sink.flush()
    }

    fn suppress_empty_sections(&self) -> bool {
        self.report.suppress_empty_sections
    }
}
