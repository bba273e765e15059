//! schemalens - an interactive shell for documenting database schemas.

use schema_lens::catalog::default_connectors;
use schema_lens::cli::Cli;
use schema_lens::commands::CommandDispatcher;
use schema_lens::config::Config;
use schema_lens::error::Result;
use schema_lens::formatters::FormatterRegistry;
use schema_lens::logging::{init_file_logging, init_stderr_logging};
use schema_lens::session::Session;
use schema_lens::shell::{load_script, Shell};
use std::io;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // Logging comes up before the config is read, so a bad config file is
    // still reported. The configured level is applied once it is known.
    let config_path = cli.config_path();
    let early_level = cli.log_level.clone().unwrap_or_else(|| "warn".to_string());
    let log = if cli.log_to_file {
        init_file_logging(&early_level)
    } else {
        init_stderr_logging(&early_level)
    };

    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;
    let level = cli.log_level.clone().unwrap_or_else(|| config.log.level.clone());
    if cli.log_level.is_none() && std::env::var_os("RUST_LOG").is_none() {
        log.set_level(&level)?;
    }

    let loaded_from = config_path.exists().then_some(config_path.as_path());
    let session = Session::from_config(&config, loaded_from)?.with_log_level(level);
    let dispatcher = CommandDispatcher::new(
        default_connectors(cli.mock_db),
        FormatterRegistry::default(),
        log,
    );
    let mut shell = Shell::new(dispatcher, session);

    let (mut out, mut err) = (io::stdout(), io::stderr());
    if let Some(script) = &cli.script {
        let lines = load_script(script)?;
        shell.run_batch(lines, &mut out, &mut err).await
    } else if cli.is_batch() {
        shell.run_batch(&cli.commands, &mut out, &mut err).await
    } else {
        let mut input = io::stdin().lock();
        shell.run_interactive(&mut input, &mut out, &mut err).await
    }
}
