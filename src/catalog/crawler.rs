//! Crawler and connector traits.
//!
//! A [`Connector`] turns connection settings into a [`CatalogCrawler`]; the
//! crawler produces a [`Catalog`] for a given set of crawl options. The shell
//! only ever talks to these traits, so live data sources can be added without
//! touching the session or the formatters.

use super::schema::Catalog;
use crate::config::ConnectionConfig;
use crate::error::{LensError, Result};
use crate::options::CrawlOptions;
use async_trait::async_trait;
use std::sync::Arc;

/// An open connection able to crawl catalog metadata.
#[async_trait]
pub trait CatalogCrawler: Send + Sync {
    /// Crawls the data source, honoring limit, grep, filter and load options.
    async fn crawl(&self, options: &CrawlOptions) -> Result<Catalog>;

    /// Closes the connection.
    async fn close(&self) -> Result<()>;

    /// Display-safe description of what this crawler is connected to.
    fn describe(&self) -> String;
}

/// Opens crawlers for one kind of data source.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Server name used in `connect server=<name>`.
    fn server(&self) -> &'static str;

    /// One-line description for `available-servers`.
    fn description(&self) -> &'static str;

    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn CatalogCrawler>>;
}

/// Registered connectors, looked up by server name.
#[derive(Clone, Default)]
pub struct ConnectorRegistry {
    connectors: Vec<Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connector, replacing any connector with the same server name.
    pub fn register(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connectors.retain(|c| c.server() != connector.server());
        self.connectors.push(connector);
        self
    }

    /// Looks up the connector for `server` (case-insensitive).
    pub fn get(&self, server: &str) -> Result<Arc<dyn Connector>> {
        self.connectors
            .iter()
            .find(|c| c.server().eq_ignore_ascii_case(server))
            .cloned()
            .ok_or_else(|| {
                LensError::connection(format!(
                    "Unknown server '{}'. Available: {}",
                    server,
                    self.servers().join(", ")
                ))
            })
    }

    /// Server names in registration order.
    pub fn servers(&self) -> Vec<&'static str> {
        self.connectors.iter().map(|c| c.server()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Connector>> {
        self.connectors.iter()
    }
}
