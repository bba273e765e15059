//! Command-line argument parsing for schemalens.

use clap::Parser;
use std::path::PathBuf;

/// Interactive shell for documenting database schemas.
#[derive(Parser, Debug)]
#[command(name = "schemalens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Register the in-memory sample catalog as `server=mock`
    #[arg(long)]
    pub mock_db: bool,

    /// Command to run instead of starting the interactive shell (repeatable)
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Path to a file of commands, one per line (use "-" for stdin)
    #[arg(long, value_name = "PATH", conflicts_with = "commands")]
    pub script: Option<String>,

    /// Log filter, e.g. "debug" or "schema_lens=trace" (overrides the config file)
    #[arg(long, value_name = "LEVEL", env = "SCHEMALENS_LOG")]
    pub log_level: Option<String>,

    /// Write logs to the log file instead of stderr
    #[arg(long)]
    pub log_to_file: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns true if commands come from `--command` or `--script`.
    pub fn is_batch(&self) -> bool {
        !self.commands.is_empty() || self.script.is_some()
    }
}
