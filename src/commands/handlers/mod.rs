//! Command handlers for schemalens.
//!
//! Each handler reads the current session from a [`CommandContext`] and
//! returns a [`CommandResult`]. Handlers never change the session in place; a
//! handler that changes state returns the complete next session, which the
//! dispatcher commits.

pub mod connection;
pub mod execute;
pub mod options;
pub mod system;

use super::output::CommandOutput;
use crate::catalog::ConnectorRegistry;
use crate::formatters::FormatterRegistry;
use crate::logging::LogHandle;
use crate::session::Session;

/// Context provided to command handlers.
pub struct CommandContext<'a> {
    /// Session as it was before the command.
    pub session: &'a Session,
    /// Connectors available to `connect`.
    pub connectors: &'a ConnectorRegistry,
    /// Output formats available to `execute`.
    pub formatters: &'a FormatterRegistry,
    pub log: &'a LogHandle,
}

/// Result of executing a command.
#[derive(Debug)]
pub struct CommandResult {
    /// Next session, or None if the command leaves the session as it was.
    pub session: Option<Session>,
    pub output: CommandOutput,
}

impl CommandResult {
    /// A result that leaves the session unchanged.
    pub fn output(output: CommandOutput) -> Self {
        Self {
            session: None,
            output,
        }
    }

    /// A result that replaces the session.
    pub fn with_session(session: Session, output: CommandOutput) -> Self {
        Self {
            session: Some(session),
            output,
        }
    }

    /// An info message that leaves the session unchanged.
    pub fn info(msg: impl Into<String>) -> Self {
        Self::output(CommandOutput::info(msg))
    }
}
