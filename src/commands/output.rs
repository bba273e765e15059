//! Transport-agnostic command output types.
//!
//! Handlers describe what to show; the shell decides how to print it.

use std::fmt;

/// Output from a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Nothing to report (the command wrote its own output).
    Silent,

    /// Informational message (success, status, etc.).
    Info(String),

    /// Structured table data for display.
    Table {
        /// Column headers.
        headers: Vec<String>,
        /// Row data (each row is a vector of cell values).
        rows: Vec<Vec<String>>,
    },

    /// Application control action.
    Control(ControlAction),
}

/// Control actions that affect the shell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// End the session.
    Exit,
}

impl CommandOutput {
    /// Creates an info message.
    pub fn info(msg: impl Into<String>) -> Self {
        Self::Info(msg.into())
    }

    /// Creates a table output.
    pub fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self::Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// Creates an exit control action.
    pub fn exit() -> Self {
        Self::Control(ControlAction::Exit)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Control(ControlAction::Exit))
    }
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent | Self::Control(_) => Ok(()),
            Self::Info(msg) => write!(f, "{msg}"),
            Self::Table { headers, rows } => {
                let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
                for row in rows {
                    for (i, cell) in row.iter().enumerate() {
                        if let Some(width) = widths.get_mut(i) {
                            *width = (*width).max(cell.len());
                        }
                    }
                }

                let line = |cells: &[String]| -> String {
                    cells
                        .iter()
                        .zip(widths.iter())
                        .map(|(cell, &width)| format!("{cell:<width$}"))
                        .collect::<Vec<_>>()
                        .join("  ")
                        .trim_end()
                        .to_string()
                };

                writeln!(f, "{}", line(headers.as_slice()))?;
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                write!(f, "{}", line(rule.as_slice()))?;
                for row in rows {
                    write!(f, "\n{}", line(row.as_slice()))?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_output() {
        let output = CommandOutput::info("Connected");
        assert_eq!(output.to_string(), "Connected");
    }

    #[test]
    fn test_table_output_aligns_columns() {
        let output = CommandOutput::table(
            &["server", "description"],
            vec![
                vec!["offline".to_string(), "Snapshot".to_string()],
                vec!["mock".to_string(), "Sample".to_string()],
            ],
        );
        assert_eq!(
            output.to_string(),
            "server   description\n-------  -----------\noffline  Snapshot\nmock     Sample"
        );
    }

    #[test]
    fn test_control_actions_print_nothing() {
        assert!(CommandOutput::exit().is_exit());
        assert_eq!(CommandOutput::exit().to_string(), "");
        assert_eq!(CommandOutput::Silent.to_string(), "");
    }
}
