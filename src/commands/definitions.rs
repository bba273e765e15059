//! Command definitions for declarative command metadata.
//!
//! Each command declares the session state it requires, which drives both the
//! dispatcher's precondition check and the help output.

use crate::session::SessionState;

/// Session state a command may be issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Any,
    Connected,
    Disconnected,
}

impl Requirement {
    /// Returns true if a session in `state` satisfies this requirement.
    pub fn allows(&self, state: SessionState) -> bool {
        match self {
            Self::Any => true,
            Self::Connected => state == SessionState::Connected,
            Self::Disconnected => state == SessionState::Disconnected,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Definition of a command.
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// Primary command name.
    pub name: &'static str,
    /// Alternative names for the command.
    pub aliases: &'static [&'static str],
    /// Short description shown in help.
    pub description: &'static str,
    /// Detailed usage information.
    pub usage: &'static str,
    pub requires: Requirement,
    /// Category for grouping in help.
    pub category: CommandCategory,
}

/// Category for grouping commands in help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCategory {
    Connection,
    Options,
    Output,
    Shell,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 4] = [
        CommandCategory::Connection,
        CommandCategory::Options,
        CommandCategory::Output,
        CommandCategory::Shell,
    ];

    /// Returns the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Connection => "Connection commands",
            Self::Options => "Crawl options",
            Self::Output => "Output",
            Self::Shell => "Shell commands",
        }
    }
}

/// All command definitions.
pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "connect",
        aliases: &[],
        description: "Connect to a data source",
        usage: "connect [<name>|<url>] [server=<server>] [url=<url>] [database=<db>] [host=<host>] [port=<port>] [user=<user>] [password=<password>]",
        requires: Requirement::Disconnected,
        category: CommandCategory::Connection,
    },
    CommandDef {
        name: "disconnect",
        aliases: &[],
        description: "Close the current connection",
        usage: "disconnect",
        requires: Requirement::Connected,
        category: CommandCategory::Connection,
    },
    CommandDef {
        name: "available-servers",
        aliases: &["servers"],
        description: "List the servers connect can use",
        usage: "available-servers",
        requires: Requirement::Any,
        category: CommandCategory::Connection,
    },
    CommandDef {
        name: "limit",
        aliases: &[],
        description: "Limit which objects are crawled",
        usage: "limit [include-|exclude-]<schemas|tables|routines|columns|synonyms|sequences>=<regex> [table-types=TABLE,VIEW]",
        requires: Requirement::Any,
        category: CommandCategory::Options,
    },
    CommandDef {
        name: "grep",
        aliases: &[],
        description: "Keep tables and routines whose columns, parameters or definitions match",
        usage: "grep [include-|exclude-]grepped-<columns|parameters|definitions>=<regex> [--invert-match] [--only-matching]",
        requires: Requirement::Any,
        category: CommandCategory::Options,
    },
    CommandDef {
        name: "filter",
        aliases: &[],
        description: "Add related tables around grep matches",
        usage: "filter [parents=<n>] [children=<n>]",
        requires: Requirement::Any,
        category: CommandCategory::Options,
    },
    CommandDef {
        name: "load",
        aliases: &[],
        description: "Choose how much metadata is retrieved",
        usage: "load [info-level=minimum|standard|maximum|custom] [--weak-associations] [--load-row-counts]",
        requires: Requirement::Any,
        category: CommandCategory::Options,
    },
    CommandDef {
        name: "sweep",
        aliases: &[],
        description: "Reset limit, grep, filter and load options to their defaults",
        usage: "sweep",
        requires: Requirement::Any,
        category: CommandCategory::Options,
    },
    CommandDef {
        name: "config-file",
        aliases: &["config"],
        description: "Load option defaults and named connections from a TOML file",
        usage: "config-file [<path>]",
        requires: Requirement::Any,
        category: CommandCategory::Options,
    },
    CommandDef {
        name: "execute",
        aliases: &["run"],
        description: "Crawl the catalog and write a report",
        usage: "execute [<format>] [format=text|json|dot|lint] [output-file=<path>] [title=<title>] [--no-info] [--show-columns] ...",
        requires: Requirement::Connected,
        category: CommandCategory::Output,
    },
    CommandDef {
        name: "log",
        aliases: &[],
        description: "Show or change the log level",
        usage: "log [<level>|level=<level>]",
        requires: Requirement::Any,
        category: CommandCategory::Shell,
    },
    CommandDef {
        name: "system",
        aliases: &[],
        description: "Show version, connection and option details",
        usage: "system",
        requires: Requirement::Any,
        category: CommandCategory::Shell,
    },
    CommandDef {
        name: "available-commands",
        aliases: &["commands"],
        description: "List all commands",
        usage: "available-commands",
        requires: Requirement::Any,
        category: CommandCategory::Shell,
    },
    CommandDef {
        name: "help",
        aliases: &["?"],
        description: "Show help for all commands or one command",
        usage: "help [<command>]",
        requires: Requirement::Any,
        category: CommandCategory::Shell,
    },
    CommandDef {
        name: "exit",
        aliases: &["quit"],
        description: "Close the connection and leave the shell",
        usage: "exit",
        requires: Requirement::Any,
        category: CommandCategory::Shell,
    },
];

/// Finds a command by name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandDef> {
    COMMANDS
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Returns commands in a specific category.
pub fn commands_in_category(category: CommandCategory) -> impl Iterator<Item = &'static CommandDef> {
    COMMANDS.iter().filter(move |cmd| cmd.category == category)
}
