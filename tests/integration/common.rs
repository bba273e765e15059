//! Shared helpers for session tests.

use schema_lens::catalog::{default_connectors, MockConnector, MockCrawler};
use schema_lens::commands::{CommandDispatcher, CommandOutput, CommandRouter};
use schema_lens::error::Result;
use schema_lens::formatters::FormatterRegistry;
use schema_lens::logging::LogHandle;
use schema_lens::session::Session;
use std::sync::Arc;

/// A session wired to a mock crawler the test can inspect.
pub struct Harness {
    pub dispatcher: CommandDispatcher,
    pub session: Session,
    pub crawler: Arc<MockCrawler>,
}

impl Harness {
    pub fn new() -> Self {
        let crawler = Arc::new(MockCrawler::new());
        let dispatcher = CommandDispatcher::new(
            default_connectors(false).register(Arc::new(MockConnector::with_crawler(crawler.clone()))),
            FormatterRegistry::default(),
            LogHandle::detached(),
        );
        Self {
            dispatcher,
            session: Session::new(),
            crawler,
        }
    }

    /// Parses and dispatches one command line.
    pub async fn run(&mut self, line: &str) -> Result<CommandOutput> {
        let command = CommandRouter::parse(line)?;
        self.dispatcher.dispatch(&mut self.session, command).await
    }

    /// Runs every line, panicking on the first failure.
    pub async fn run_all(&mut self, lines: &[&str]) {
        for line in lines {
            if let Err(e) = self.run(line).await {
                panic!("{line}: {e}");
            }
        }
    }
}
