//! Execute command handler.

use super::{CommandContext, CommandResult};
use crate::commands::output::CommandOutput;
use crate::commands::router::ExecuteArgs;
use crate::error::{LensError, Result};
use crate::formatters::OutputSink;
use crate::options::Destination;
use crate::traversal::CatalogTraverser;
use tracing::{debug, info};

/// Handle execute: resolve the format, crawl, open the sink and traverse.
///
/// The format is resolved before anything is crawled, and the sink is only
/// opened once the crawl succeeded. The sink is released when the formatter
/// is dropped, on success and on error.
pub async fn handle_execute(ctx: &CommandContext<'_>, args: &ExecuteArgs) -> Result<CommandResult> {
    let connection = ctx
        .session
        .current_connection()
        .ok_or_else(|| LensError::precondition("execute", "not connected"))?;

    let next = ctx.session.with_output(&args.output);
    let output = next.output_options().clone();
    let entry = ctx.formatters.resolve(output.format())?;
    let report = ctx.session.report_options(&args.report)?;

    let options = ctx.session.current_options();
    debug!("Crawling {} with {:?}", connection.describe(), options);
    let catalog = connection.crawler().crawl(options).await?;
    info!(
        "Crawled {} tables, {} routines",
        catalog.tables.len(),
        catalog.routines.len()
    );

    let sink = OutputSink::open(output.destination())?;
    let mut formatter = (entry.factory)(sink, &output, report);
    CatalogTraverser::new(&catalog).traverse(formatter.as_mut())?;
    drop(formatter);

    let message = match output.destination() {
        Destination::Stdout => CommandOutput::Silent,
        Destination::File(path) => {
            CommandOutput::info(format!("Wrote {} report to {}", entry.token, path.display()))
        }
    };

    Ok(CommandResult::with_session(next, message))
}
