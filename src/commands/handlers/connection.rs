//! Connection command handlers (connect, disconnect, available-servers).

use super::{CommandContext, CommandResult};
use crate::commands::output::CommandOutput;
use crate::commands::router::ConnectArgs;
use crate::config::ConnectionConfig;
use crate::error::{LensError, Result};
use crate::session::{Connection, Session};
use tracing::{info, warn};

/// Handle connect: resolve settings, open a crawler and store it.
pub async fn handle_connect(ctx: &CommandContext<'_>, args: &ConnectArgs) -> Result<CommandResult> {
    let config = resolve_connection(ctx.session, args)?;
    let connector = ctx.connectors.get(&config.server)?;

    info!("Connecting: {}", config.display_string());
    let crawler = connector.connect(&config).await?;

    let connection = Connection::new(config, crawler);
    let message = format!("Connected to {}", connection.describe());
    Ok(CommandResult::with_session(
        ctx.session.with_connection(Some(connection)),
        CommandOutput::info(message),
    ))
}

/// Works out connection settings from a named connection or URL plus
/// explicit keys. Explicit keys win.
pub fn resolve_connection(session: &Session, args: &ConnectArgs) -> Result<ConnectionConfig> {
    let base = match args.target.as_deref() {
        None => ConnectionConfig::default(),
        Some(target) => match session.named_connection(target) {
            Some(named) => named.clone(),
            None if target.contains("://") => ConnectionConfig::from_connection_string(target)?,
            None => {
                let names: Vec<&str> = session.connection_names().collect();
                let known = if names.is_empty() {
                    "none configured".to_string()
                } else {
                    names.join(", ")
                };
                return Err(LensError::connection(format!(
                    "Unknown connection '{target}' (named connections: {known})"
                )));
            }
        },
    };

    base.with_args(&args.args)
}

/// Handle disconnect: close and drop the crawler.
pub async fn handle_disconnect(ctx: &CommandContext<'_>) -> Result<CommandResult> {
    let connection = ctx
        .session
        .current_connection()
        .ok_or_else(|| LensError::precondition("disconnect", "not connected"))?;

    let description = connection.describe();
    close_connection(connection).await;

    Ok(CommandResult::with_session(
        ctx.session.with_connection(None),
        CommandOutput::info(format!("Disconnected from {description}")),
    ))
}

/// Closes a crawler. Close failures are logged, never returned.
pub async fn close_connection(connection: &Connection) {
    if let Err(e) = connection.crawler().close().await {
        warn!("Error closing {}: {}", connection.describe(), e);
    } else {
        info!("Closed {}", connection.describe());
    }
}

/// Handle available-servers: list registered connectors.
pub fn handle_available_servers(ctx: &CommandContext<'_>) -> CommandResult {
    let rows = ctx
        .connectors
        .iter()
        .map(|c| vec![c.server().to_string(), c.description().to_string()])
        .collect();
    CommandResult::output(CommandOutput::table(&["server", "description"], rows))
}
