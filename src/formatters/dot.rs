//! Graphviz DOT diagram source.
//!
//! One node per table with an HTML-like label listing its columns, one edge
//! per foreign key, and dashed edges for weak associations. Edges are written
//! after all table nodes, and only when both ends were written.

use super::sink::OutputSink;
use crate::catalog::{CrawlInfo, DatabaseObject, Table};
use crate::error::Result;
use crate::options::{OutputOptions, ReportOptions};
use crate::traversal::{CatalogHandler, CatalogObject, Category};
use std::collections::BTreeSet;

struct Edge {
    from: String,
    to: String,
    label: Option<String>,
    weak: bool,
}

pub struct DotFormatter {
    sink: OutputSink,
    title: Option<String>,
    report: ReportOptions,
    nodes: BTreeSet<String>,
    edges: Vec<Edge>,
}

impl DotFormatter {
    pub fn new(sink: OutputSink, output: &OutputOptions, report: ReportOptions) -> Self {
        Self {
            sink,
            title: output.title().map(String::from),
            report,
            nodes: BTreeSet::new(),
            edges: Vec::new(),
        }
    }

    fn table_node(&mut self, table: &Table) -> Result<()> {
        let full_name = table.full_name();
        let heading = if self.report.unqualified_names {
            table.name.clone()
        } else {
            full_name.clone()
        };

        let mut label = String::from(
            "<table border=\"1\" cellborder=\"0\" cellspacing=\"0\" cellpadding=\"2\">",
        );
        label.push_str(&format!(
            "<tr><td bgcolor=\"#f2e6c2\" align=\"left\"><b>{}</b></td><td bgcolor=\"#f2e6c2\" align=\"right\">[{}]</td></tr>",
            escape_html(&heading),
            escape_html(&table.table_type.to_lowercase())
        ));
        if let Some(remarks) = table.remarks().map(str::trim).filter(|r| !r.is_empty()) {
            if !self.report.hide_remarks {
                label.push_str(&format!(
                    "<tr><td colspan=\"2\" align=\"left\"><i>{}</i></td></tr>",
                    escape_html(remarks)
                ));
            }
        }
        for (ordinal, column) in table.columns.iter().enumerate() {
            let mut name = if table.primary_key.contains(&column.name) {
                format!("<b>{}</b>", escape_html(&column.name))
            } else {
                escape_html(&column.name)
            };
            if self.report.show_ordinal_numbers {
                name = format!("{}. {name}", ordinal + 1);
            }
            label.push_str(&format!(
                "<tr><td align=\"left\">{name}</td><td align=\"left\">{}</td></tr>",
                escape_html(&column.data_type)
            ));
        }
        if let Some(rows) = table.row_count {
            label.push_str(&format!(
                "<tr><td colspan=\"2\" align=\"right\">{rows} rows</td></tr>"
            ));
        }
        label.push_str("</table>");

        self.sink
            .write_line(&format!("  {} [label=<{label}>];", quote(&full_name)))?;
        self.nodes.insert(full_name.clone());

        for fk in &table.foreign_keys {
            let label = if self.report.no_foreign_key_names {
                None
            } else {
                fk.name.clone()
            };
            self.edges.push(Edge {
                from: full_name.clone(),
                to: fk.referenced_table.clone(),
                label,
                weak: false,
            });
        }
        for weak in &table.weak_associations {
            self.edges.push(Edge {
                from: full_name.clone(),
                to: weak.referenced_table.clone(),
                label: None,
                weak: true,
            });
        }
        Ok(())
    }

    fn write_edges(&mut self) -> Result<()> {
        let edges = std::mem::take(&mut self.edges);
        for edge in edges {
            if !self.nodes.contains(&edge.to) {
                tracing::trace!("Skipping edge to {}: table not in diagram", edge.to);
                continue;
            }
            let mut attributes = Vec::new();
            if let Some(label) = &edge.label {
                attributes.push(format!("label={}", quote(label)));
            }
            if edge.weak {
                attributes.push("style=dashed".to_string());
            }
            let attributes = if attributes.is_empty() {
                String::new()
            } else {
                format!(" [{}]", attributes.join(", "))
            };
            self.sink.write_line(&format!(
                "  {} -> {}{attributes};",
                quote(&edge.from),
                quote(&edge.to)
            ))?;
        }
        Ok(())
    }
}

impl CatalogHandler for DotFormatter {
    fn begin(&mut self) -> Result<()> {
        self.sink.write_line("digraph \"catalog\" {")?;
        let mut graph = vec!["rankdir=\"RL\"".to_string()];
        if let Some(title) = &self.title {
            graph.push(format!("label={}", quote(title)));
            graph.push("labelloc=\"t\"".to_string());
        }
        self.sink
            .write_line(&format!("  graph [{}];", graph.join(", ")))?;
        self.sink
            .write_line("  node [shape=none, fontname=\"Helvetica\", fontsize=10];")?;
        self.sink
            .write_line("  edge [fontname=\"Helvetica\", fontsize=8];")
    }

    fn handle_crawl_info(&mut self, info: &CrawlInfo) -> Result<()> {
        if self.report.shows_system_info() && !self.report.no_crawler_info {
            self.sink.write_line(&format!(
                "  // generated by {} on {}",
                single_line(&info.crawler_version),
                single_line(&info.crawl_timestamp)
            ))?;
        }
        Ok(())
    }

    fn handle(&mut self, object: CatalogObject<'_>) -> Result<()> {
        match object {
            CatalogObject::Table(table) => self.table_node(table),
            _ => Ok(()),
        }
    }

    fn handle_end(&mut self, category: Category) -> Result<()> {
        if category == Category::Tables {
            self.write_edges()?;
        }
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        // Edges are still pending if the tables section was suppressed
        self.write_edges()?;
        self.sink.write_line("}")?;
        self.sink.flush()
    }
}

/// Quotes a DOT identifier.
fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Folds line breaks into spaces so text fits in a `//` comment.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
