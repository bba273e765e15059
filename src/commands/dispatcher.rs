//! Command dispatch.
//!
//! The dispatcher checks a parsed command against the session state, runs its
//! handler and commits the handler's next session. A failed command leaves the
//! session exactly as it was.

use super::handlers::{connection, execute, options, system, CommandContext, CommandResult};
use super::output::CommandOutput;
use super::router::Command;
use crate::catalog::ConnectorRegistry;
use crate::error::{LensError, Result};
use crate::formatters::FormatterRegistry;
use crate::logging::LogHandle;
use crate::session::{Session, SessionState};
use tracing::debug;

/// Routes commands to handlers.
#[derive(Clone, Default)]
pub struct CommandDispatcher {
    connectors: ConnectorRegistry,
    formatters: FormatterRegistry,
    log: LogHandle,
}

impl CommandDispatcher {
    pub fn new(connectors: ConnectorRegistry, formatters: FormatterRegistry, log: LogHandle) -> Self {
        Self {
            connectors,
            formatters,
            log,
        }
    }

    /// Runs `command` against `session`.
    ///
    /// On success the session is replaced by the handler's next session (if
    /// any). On error the session is untouched.
    pub async fn dispatch(&self, session: &mut Session, command: Command) -> Result<CommandOutput> {
        let def = command.definition()?;
        let state = session.state();
        if !def.requires.allows(state) {
            return Err(LensError::precondition(def.name, precondition_reason(state)));
        }

        debug!("Dispatching {} in {} session", def.name, state);

        let ctx = CommandContext {
            session,
            connectors: &self.connectors,
            formatters: &self.formatters,
            log: &self.log,
        };
        let result = self.run(&ctx, &command).await?;

        if let Some(next) = result.session {
            *session = next;
        }
        Ok(result.output)
    }

    async fn run(&self, ctx: &CommandContext<'_>, command: &Command) -> Result<CommandResult> {
        if let Some(fragment) = command.fragment() {
            return Ok(options::handle_fragment(ctx, &fragment));
        }

        match command {
            Command::Connect(args) => connection::handle_connect(ctx, args).await,
            Command::Disconnect => connection::handle_disconnect(ctx).await,
            Command::Execute(args) => execute::handle_execute(ctx, args).await,
            Command::Sweep => Ok(options::handle_sweep(ctx)),
            Command::ConfigFile(path) => options::handle_config_file(ctx, path.as_deref()),
            Command::Log(level) => system::handle_log(ctx, level.as_deref()),
            Command::System => system::handle_system(ctx),
            Command::AvailableCommands => Ok(system::handle_available_commands()),
            Command::AvailableServers => Ok(connection::handle_available_servers(ctx)),
            Command::Help(topic) => system::handle_help(topic.as_deref()),
            Command::Exit => Ok(system::handle_exit(ctx).await),
            Command::Limit(_) | Command::Grep(_) | Command::Filter(_) | Command::Load(_) => Err(
                LensError::internal(format!("{} has no option fragment", command.name())),
            ),
        }
    }
}

fn precondition_reason(state: SessionState) -> &'static str {
    match state {
        SessionState::Connected => "already connected; disconnect first",
        SessionState::Disconnected => "not connected",
    }
}
