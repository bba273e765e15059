//! Shell command handlers (log, system, available-commands, help, exit).

use super::connection::close_connection;
use super::{CommandContext, CommandResult};
use crate::commands::definitions::{find_command, COMMANDS};
use crate::commands::help::{command_help, general_help};
use crate::commands::output::CommandOutput;
use crate::error::{LensError, Result};

/// Handle log: show the level, or change it.
pub fn handle_log(ctx: &CommandContext<'_>, level: Option<&str>) -> Result<CommandResult> {
    match level {
        None => Ok(CommandResult::info(format!(
            "Log level: {}",
            ctx.session.log_level()
        ))),
        Some(level) => {
            ctx.log.set_level(level)?;
            Ok(CommandResult::with_session(
                ctx.session.with_log_level(level),
                CommandOutput::info(format!("Log level set to {level}")),
            ))
        }
    }
}

/// Handle system: version, platform, connection and option summary.
pub fn handle_system(ctx: &CommandContext<'_>) -> Result<CommandResult> {
    let session = ctx.session;
    let options = serde_json::to_string_pretty(session.current_options())
        .map_err(|e| LensError::internal(format!("Cannot serialize options: {e}")))?;
    let output = session.output_options();

    let mut text = format!(
        "schemalens {}\nPlatform: {}/{}\nState: {}\n",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
        session.state()
    );
    if let Some(connection) = session.current_connection() {
        text.push_str(&format!(
            "Connection: {} ({})\n",
            connection.config().display_string(),
            connection.describe()
        ));
    }
    text.push_str(&format!(
        "Config file: {}\nLog level: {}\nOutput: {} -> {}",
        session
            .config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string()),
        session.log_level(),
        output.format(),
        output.destination()
    ));
    if let Some(title) = output.title() {
        text.push_str(&format!(" ({title})"));
    }
    text.push_str("\nCrawl options:\n");
    text.push_str(&options);

    Ok(CommandResult::info(text))
}

/// Handle available-commands: list the command vocabulary.
pub fn handle_available_commands() -> CommandResult {
    let rows = COMMANDS
        .iter()
        .map(|cmd| {
            vec![
                cmd.name.to_string(),
                cmd.aliases.join(", "),
                cmd.requires.label().to_string(),
                cmd.description.to_string(),
            ]
        })
        .collect();
    CommandResult::output(CommandOutput::table(
        &["command", "aliases", "requires", "description"],
        rows,
    ))
}

/// Handle help, for all commands or one.
pub fn handle_help(topic: Option<&str>) -> Result<CommandResult> {
    match topic {
        None => Ok(CommandResult::info(general_help())),
        Some(name) => {
            let cmd = find_command(name).ok_or_else(|| LensError::UnknownCommand(name.to_string()))?;
            Ok(CommandResult::info(command_help(cmd)))
        }
    }
}

/// Handle exit: close the crawler if connected and end the session.
pub async fn handle_exit(ctx: &CommandContext<'_>) -> CommandResult {
    match ctx.session.current_connection() {
        Some(connection) => {
            close_connection(connection).await;
            CommandResult::with_session(ctx.session.with_connection(None), CommandOutput::exit())
        }
        None => CommandResult::output(CommandOutput::exit()),
    }
}
