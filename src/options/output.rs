//! Output options: where a report goes and how it looks.

use super::args::OptionArgs;
use super::{later, pick};
use crate::error::Result;
use std::fmt;
use std::path::PathBuf;

/// Default output format token.
pub const DEFAULT_FORMAT: &str = "text";

/// Where formatted output is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Destination {
    #[default]
    Stdout,
    File(PathBuf),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Output format token, destination and title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    format: String,
    destination: Destination,
    title: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            destination: Destination::Stdout,
            title: None,
        }
    }
}

impl OutputOptions {
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn compose(&self, fragment: &OutputFragment) -> Self {
        Self {
            format: pick(&fragment.format, &self.format),
            destination: pick(&fragment.destination, &self.destination),
            title: later(&self.title, &fragment.title),
        }
    }
}

/// Partial output options supplied by one `execute` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFragment {
    pub format: Option<String>,
    pub destination: Option<Destination>,
    pub title: Option<String>,
}

impl OutputFragment {
    pub const KEYS: &'static [&'static str] = &["format", "output-file", "title"];

    /// Returns a fragment holding every field set in `next`, falling back to
    /// this one's.
    pub fn overlay(&self, next: &OutputFragment) -> Self {
        Self {
            format: later(&self.format, &next.format),
            destination: later(&self.destination, &next.destination),
            title: later(&self.title, &next.title),
        }
    }

    /// `output-file=-` and `output-file=stdout` select standard output.
    pub fn from_args(args: &OptionArgs) -> Self {
        Self {
            format: args.get("format").map(|f| f.trim().to_lowercase()),
            destination: args.get("output-file").map(|path| match path.trim() {
                "" | "-" | "stdout" => Destination::Stdout,
                path => Destination::File(PathBuf::from(path)),
            }),
            title: args.get("title").map(String::from),
        }
    }
}

/// Formatter switches.
///
/// Read first from the session's auxiliary config, then from the arguments
/// of the `execute` command, so explicit arguments win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub no_info: bool,
    pub no_crawler_info: bool,
    pub show_database_info: bool,
    pub show_driver_info: bool,
    pub hide_remarks: bool,
    pub suppress_empty_sections: bool,
    pub show_columns: bool,
    pub unqualified_names: bool,
    pub no_foreign_key_names: bool,
    pub show_ordinal_numbers: bool,
}

impl ReportOptions {
    pub const KEYS: &'static [&'static str] = &[
        "no-info",
        "no-crawler-info",
        "show-database-info",
        "show-driver-info",
        "hide-remarks",
        "suppress-empty-sections",
        "show-columns",
        "unqualified-names",
        "no-foreign-key-names",
        "show-ordinal-numbers",
    ];

    /// Returns a copy with every switch named in `args` replaced.
    pub fn with_args(&self, args: &OptionArgs) -> Result<Self> {
        let flag = |key: &str, current: bool| -> Result<bool> {
            Ok(args.get_bool(key)?.unwrap_or(current))
        };

        Ok(Self {
            no_info: flag("no-info", self.no_info)?,
            no_crawler_info: flag("no-crawler-info", self.no_crawler_info)?,
            show_database_info: flag("show-database-info", self.show_database_info)?,
            show_driver_info: flag("show-driver-info", self.show_driver_info)?,
            hide_remarks: flag("hide-remarks", self.hide_remarks)?,
            suppress_empty_sections: flag("suppress-empty-sections", self.suppress_empty_sections)?,
            show_columns: flag("show-columns", self.show_columns)?,
            unqualified_names: flag("unqualified-names", self.unqualified_names)?,
            no_foreign_key_names: flag("no-foreign-key-names", self.no_foreign_key_names)?,
            show_ordinal_numbers: flag("show-ordinal-numbers", self.show_ordinal_numbers)?,
        })
    }

    /// Returns true if the "System Information" section is written at all.
    pub fn shows_system_info(&self) -> bool {
        !(self.no_info
            || (self.no_crawler_info && !self.show_database_info && !self.show_driver_info))
    }
}
