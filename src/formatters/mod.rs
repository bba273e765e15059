//! Output formatters.
//!
//! A formatter is a [`CatalogHandler`] that renders into an [`OutputSink`].
//! The [`FormatterRegistry`] maps format tokens (and their aliases) to
//! factories. Factories only take ownership of the already-opened sink; all
//! writing happens during traversal.

mod dot;
mod json;
mod lint;
mod sink;
mod text;

pub use dot::DotFormatter;
pub use json::JsonFormatter;
pub use lint::{lint_table, Lint, LintFormatter, Severity};
pub use sink::{OutputSink, SharedBuffer};
pub use text::{TextFormatter, DOCUMENT_END, DOCUMENT_START};

use crate::error::{LensError, Result};
use crate::options::{OutputOptions, ReportOptions};
use crate::traversal::CatalogHandler;

/// Builds a formatter around an open sink.
pub type FormatterFactory = fn(OutputSink, &OutputOptions, ReportOptions) -> Box<dyn CatalogHandler>;

/// A registered output format.
#[derive(Clone, Copy)]
pub struct FormatterEntry {
    pub token: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub factory: FormatterFactory,
}

impl FormatterEntry {
    fn matches(&self, token: &str) -> bool {
        self.token.eq_ignore_ascii_case(token)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(token))
    }
}

fn text_factory(sink: OutputSink, output: &OutputOptions, report: ReportOptions) -> Box<dyn CatalogHandler> {
    Box::new(TextFormatter::new(sink, output, report))
}

fn json_factory(sink: OutputSink, output: &OutputOptions, report: ReportOptions) -> Box<dyn CatalogHandler> {
    Box::new(JsonFormatter::new(sink, output, report))
}

fn dot_factory(sink: OutputSink, output: &OutputOptions, report: ReportOptions) -> Box<dyn CatalogHandler> {
    Box::new(DotFormatter::new(sink, output, report))
}

fn lint_factory(sink: OutputSink, output: &OutputOptions, report: ReportOptions) -> Box<dyn CatalogHandler> {
    Box::new(LintFormatter::new(sink, output, report))
}

/// Built-in output formats.
pub const BUILTIN_FORMATTERS: &[FormatterEntry] = &[
    FormatterEntry {
        token: "text",
        aliases: &["list"],
        description: "Plain text listing of the catalog",
        factory: text_factory,
    },
    FormatterEntry {
        token: "json",
        aliases: &[],
        description: "Catalog as a single JSON document",
        factory: json_factory,
    },
    FormatterEntry {
        token: "dot",
        aliases: &["diagram", "scdot"],
        description: "Graphviz DOT source for a schema diagram",
        factory: dot_factory,
    },
    FormatterEntry {
        token: "lint",
        aliases: &["lint-json"],
        description: "Schema design lints as a JSON report",
        factory: lint_factory,
    },
];

/// Format tokens mapped to formatter factories.
#[derive(Clone)]
pub struct FormatterRegistry {
    entries: Vec<FormatterEntry>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self {
            entries: BUILTIN_FORMATTERS.to_vec(),
        }
    }
}

impl FormatterRegistry {
    /// Adds a format, replacing any entry with the same token.
    pub fn register(mut self, entry: FormatterEntry) -> Self {
        self.entries.retain(|e| e.token != entry.token);
        self.entries.push(entry);
        self
    }

    /// Finds the entry for `token` (case-insensitive, aliases included).
    pub fn resolve(&self, token: &str) -> Result<&FormatterEntry> {
        let token = token.trim();
        self.entries
            .iter()
            .find(|e| e.matches(token))
            .ok_or_else(|| LensError::UnsupportedFormat(token.to_string()))
    }

    /// Resolves `output`'s format and builds the formatter around `sink`.
    pub fn create(
        &self,
        sink: OutputSink,
        output: &OutputOptions,
        report: ReportOptions,
    ) -> Result<Box<dyn CatalogHandler>> {
        let entry = self.resolve(output.format())?;
        Ok((entry.factory)(sink, output, report))
    }

    pub fn entries(&self) -> &[FormatterEntry] {
        &self.entries
    }
}
