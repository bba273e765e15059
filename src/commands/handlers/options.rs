//! Option command handlers (limit, grep, filter, load, sweep, config-file).

use super::{CommandContext, CommandResult};
use crate::commands::output::CommandOutput;
use crate::config::Config;
use crate::error::Result;
use crate::options::OptionsFragment;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle limit, grep, filter and load: compose the fragment into the
/// current options.
pub fn handle_fragment(ctx: &CommandContext<'_>, fragment: &OptionsFragment) -> CommandResult {
    debug!("Composing {:?}", fragment);
    CommandResult::with_session(ctx.session.with_fragment(fragment), CommandOutput::Silent)
}

/// Handle sweep: drop every explicit fragment.
pub fn handle_sweep(ctx: &CommandContext<'_>) -> CommandResult {
    CommandResult::with_session(
        ctx.session.swept(),
        CommandOutput::info("Options reset to defaults"),
    )
}

/// Handle config-file: load defaults and named connections.
///
/// The file must exist. Its defaults become the new base options; fragments
/// already issued stay on top.
pub fn handle_config_file(ctx: &CommandContext<'_>, path: Option<&Path>) -> Result<CommandResult> {
    let path: PathBuf = path.map(Path::to_path_buf).unwrap_or_else(Config::default_path);
    let config = Config::load_required(&path)?;
    let session = ctx.session.with_config(&config, Some(path.as_path()))?;

    Ok(CommandResult::with_session(
        session,
        CommandOutput::info(format!(
            "Loaded {} ({} defaults, {} connections)",
            path.display(),
            config.defaults.len(),
            config.connections.len()
        )),
    ))
}
