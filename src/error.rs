//! Error types for schemalens.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for schemalens operations.
#[derive(Error, Debug)]
pub enum LensError {
    /// Command issued in a session state that does not allow it.
    #[error("Precondition error: {command}: {reason}")]
    Precondition { command: String, reason: String },

    /// Malformed option value (bad regular expression, unknown key, bad number).
    #[error("Invalid option '{option}': {message}")]
    OptionValidation { option: String, message: String },

    /// Keyword not in the command vocabulary.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Output format token with no registered formatter.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Failure reported by the catalog crawler, passed through unchanged.
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Output destination could not be opened or written.
    #[error("Cannot write to {destination}: {source}")]
    SinkWrite {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    /// Connection could not be established (unknown server, bad URL, unreadable snapshot).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LensError {
    /// Creates a precondition error for the given command.
    pub fn precondition(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Precondition {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Creates an option validation error naming the offending option.
    pub fn option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OptionValidation {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Creates a crawl error with the given message.
    pub fn crawl(msg: impl Into<String>) -> Self {
        Self::Crawl(msg.into())
    }

    /// Creates a sink write error for the given destination.
    pub fn sink(destination: impl Into<String>, source: std::io::Error) -> Self {
        Self::SinkWrite {
            destination: destination.into(),
            source,
        }
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Precondition { .. } => "Precondition Error",
            Self::OptionValidation { .. } => "Option Validation Error",
            Self::UnknownCommand(_) => "Unknown Command Error",
            Self::UnsupportedFormat(_) => "Unsupported Format Error",
            Self::Crawl(_) => "Crawl Error",
            Self::SinkWrite { .. } => "Sink Write Error",
            Self::Connection(_) => "Connection Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the process exit code used when this error ends a one-shot run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Precondition { .. } | Self::UnknownCommand(_) => 2,
            Self::OptionValidation { .. } | Self::UnsupportedFormat(_) | Self::Config(_) => 3,
            Self::Crawl(_) | Self::Connection(_) => 4,
            Self::SinkWrite { .. } => 5,
            Self::Internal(_) => 1,
        }
    }
}

/// Result type alias using LensError.
pub type Result<T> = std::result::Result<T, LensError>;
