//! Command parsing and routing for schemalens.
//!
//! Parses a command line into a structured [`Command`]. Option fragments are
//! built (and their regular expressions compiled) here, so a command that
//! reaches the dispatcher is already valid.

use super::definitions::{find_command, CommandDef};
use super::tokenizer::{parse_args, ParsedArgs};
use crate::config::ConnectionConfig;
use crate::error::{LensError, Result};
use crate::options::{
    normalize_key, FilterFragment, GrepFragment, LimitFragment, LoadFragment, OptionArgs,
    OptionsFragment, OutputFragment, ReportOptions,
};
use std::path::PathBuf;

/// Arguments for the connect command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectArgs {
    /// Named connection from the config file, or a connection URL.
    pub target: Option<String>,
    /// Explicit connection keys.
    pub args: OptionArgs,
}

/// Arguments for the execute command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteArgs {
    pub output: OutputFragment,
    /// Formatter switches given on this command.
    pub report: OptionArgs,
}

/// Parsed command with arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect(ConnectArgs),
    Disconnect,
    Filter(FilterFragment),
    Grep(GrepFragment),
    Limit(LimitFragment),
    Load(LoadFragment),
    Execute(ExecuteArgs),
    /// Show (None) or change the log level.
    Log(Option<String>),
    /// Load a config file; None means the default location.
    ConfigFile(Option<PathBuf>),
    Sweep,
    System,
    AvailableCommands,
    AvailableServers,
    Exit,
    Help(Option<String>),
}

impl Command {
    /// Canonical command name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Disconnect => "disconnect",
            Self::Filter(_) => "filter",
            Self::Grep(_) => "grep",
            Self::Limit(_) => "limit",
            Self::Load(_) => "load",
            Self::Execute(_) => "execute",
            Self::Log(_) => "log",
            Self::ConfigFile(_) => "config-file",
            Self::Sweep => "sweep",
            Self::System => "system",
            Self::AvailableCommands => "available-commands",
            Self::AvailableServers => "available-servers",
            Self::Exit => "exit",
            Self::Help(_) => "help",
        }
    }

    /// The definition this command was parsed from.
    pub fn definition(&self) -> Result<&'static CommandDef> {
        find_command(self.name())
            .ok_or_else(|| LensError::internal(format!("No definition for '{}'", self.name())))
    }

    /// The option fragment carried by limit/grep/filter/load commands.
    pub fn fragment(&self) -> Option<OptionsFragment> {
        match self {
            Self::Limit(f) => Some(OptionsFragment::Limit(f.clone())),
            Self::Grep(f) => Some(OptionsFragment::Grep(f.clone())),
            Self::Filter(f) => Some(OptionsFragment::Filter(f.clone())),
            Self::Load(f) => Some(OptionsFragment::Load(f.clone())),
            _ => None,
        }
    }
}

/// Command router for parsing user input.
pub struct CommandRouter;

impl CommandRouter {
    /// Parses one command line.
    ///
    /// Keywords are case-insensitive. A keyword that matches nothing in
    /// lower case is normalized like an option key, so `availableCommands`
    /// and `available-commands` are the same command.
    pub fn parse(input: &str) -> Result<Command> {
        let input = input.trim();
        let (keyword, rest) = match input.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (input, ""),
        };

        let def = find_command(&keyword.to_ascii_lowercase())
            .or_else(|| find_command(&normalize_key(keyword)))
            .ok_or_else(|| LensError::UnknownCommand(keyword.to_string()))?;
        let parsed = parse_args(rest)?;

        match def.name {
            "connect" => parse_connect(parsed),
            "disconnect" => no_args(def, parsed, Command::Disconnect),
            "limit" => {
                let args = fragment_args(def, parsed, LimitFragment::KEYS)?;
                Ok(Command::Limit(LimitFragment::from_args(&args)?))
            }
            "grep" => {
                let args = fragment_args(def, parsed, GrepFragment::KEYS)?;
                Ok(Command::Grep(GrepFragment::from_args(&args)?))
            }
            "filter" => {
                let args = fragment_args(def, parsed, FilterFragment::KEYS)?;
                Ok(Command::Filter(FilterFragment::from_args(&args)?))
            }
            "load" => {
                let args = fragment_args(def, parsed, LoadFragment::KEYS)?;
                Ok(Command::Load(LoadFragment::from_args(&args)?))
            }
            "execute" => parse_execute(parsed),
            "log" => parse_log(def, parsed),
            "config-file" => parse_config_file(def, parsed),
            "sweep" => no_args(def, parsed, Command::Sweep),
            "system" => no_args(def, parsed, Command::System),
            "available-commands" => no_args(def, parsed, Command::AvailableCommands),
            "available-servers" => no_args(def, parsed, Command::AvailableServers),
            "exit" => no_args(def, parsed, Command::Exit),
            "help" => Ok(Command::Help(
                parsed.words.first().map(|w| normalize_key(w)),
            )),
            _ => Err(LensError::UnknownCommand(keyword.to_string())),
        }
    }
}

fn no_args(def: &CommandDef, parsed: ParsedArgs, command: Command) -> Result<Command> {
    match (parsed.words.first(), parsed.args.iter().next()) {
        (Some(word), _) => Err(unexpected(def, word)),
        (None, Some((key, _))) => Err(LensError::option(
            key,
            format!("{} takes no arguments", def.name),
        )),
        (None, None) => Ok(command),
    }
}

fn unexpected(def: &CommandDef, word: &str) -> LensError {
    LensError::option(
        word,
        format!("unexpected argument to {}; usage: {}", def.name, def.usage),
    )
}

/// Fragment commands take only `key=value` arguments from `keys`.
fn fragment_args(def: &CommandDef, parsed: ParsedArgs, keys: &[&str]) -> Result<OptionArgs> {
    if let Some(word) = parsed.words.first() {
        return Err(unexpected(def, word));
    }
    parsed.args.ensure_known(keys)?;
    Ok(parsed.args)
}

fn parse_connect(parsed: ParsedArgs) -> Result<Command> {
    parsed.args.ensure_known(ConnectionConfig::KEYS)?;
    let mut words = parsed.words.into_iter();
    let target = words.next();
    if let Some(extra) = words.next() {
        return Err(LensError::option(
            extra,
            "connect takes at most one connection name or URL",
        ));
    }
    Ok(Command::Connect(ConnectArgs {
        target,
        args: parsed.args,
    }))
}

fn parse_execute(parsed: ParsedArgs) -> Result<Command> {
    let mut args = parsed.args;
    let known: Vec<&str> = OutputFragment::KEYS
        .iter()
        .chain(ReportOptions::KEYS)
        .copied()
        .collect();
    args.ensure_known(&known)?;

    // `execute json` is shorthand for `execute format=json`
    let mut words = parsed.words.into_iter();
    if let Some(format) = words.next() {
        if args.contains("format") {
            return Err(LensError::option(format, "format given twice"));
        }
        args.push("format", format);
    }
    if let Some(extra) = words.next() {
        return Err(LensError::option(extra, "execute takes at most one format"));
    }

    let report = args.subset(ReportOptions::KEYS);
    ReportOptions::default().with_args(&report)?;

    Ok(Command::Execute(ExecuteArgs {
        output: OutputFragment::from_args(&args),
        report,
    }))
}

fn parse_log(def: &CommandDef, parsed: ParsedArgs) -> Result<Command> {
    parsed.args.ensure_known(&["level"])?;
    let level = match (parsed.words.as_slice(), parsed.args.get("level")) {
        ([], level) => level.map(String::from),
        ([word], None) => Some(word.clone()),
        (words, _) => return Err(unexpected(def, &words[words.len() - 1])),
    };
    Ok(Command::Log(level))
}

fn parse_config_file(def: &CommandDef, parsed: ParsedArgs) -> Result<Command> {
    parsed.args.ensure_known(&["path"])?;
    let path = match (parsed.words.as_slice(), parsed.args.get("path")) {
        ([], path) => path.map(PathBuf::from),
        ([word], None) => Some(PathBuf::from(word)),
        (words, _) => return Err(unexpected(def, &words[words.len() - 1])),
    };
    Ok(Command::ConfigFile(path))
}
