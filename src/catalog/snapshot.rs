//! Offline catalog snapshots.
//!
//! A snapshot is a catalog serialized as JSON. Connecting with
//! `server=offline database=<path>` loads it once; each crawl narrows the
//! loaded catalog with the session's options.

use super::crawler::{CatalogCrawler, Connector};
use super::filter::apply_options;
use super::schema::Catalog;
use crate::config::ConnectionConfig;
use crate::error::{LensError, Result};
use crate::options::CrawlOptions;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Crawler over a catalog loaded from a snapshot file.
pub struct SnapshotCrawler {
    path: PathBuf,
    catalog: Catalog,
}

impl SnapshotCrawler {
    /// Loads a snapshot from `path`.
    pub async fn open(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            LensError::connection(format!("Cannot read snapshot {}: {e}", path.display()))
        })?;

        let catalog = serde_json::from_str(&content).map_err(|e| {
            LensError::connection(format!("Invalid snapshot {}: {e}", path.display()))
        })?;

        tracing::debug!("Loaded catalog snapshot from {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            catalog,
        })
    }
}

#[async_trait]
impl CatalogCrawler for SnapshotCrawler {
    async fn crawl(&self, options: &CrawlOptions) -> Result<Catalog> {
        Ok(apply_options(&self.catalog, options))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        format!("offline snapshot {}", self.path.display())
    }
}

/// Connector for `server=offline`.
pub struct SnapshotConnector;

#[async_trait]
impl Connector for SnapshotConnector {
    fn server(&self) -> &'static str {
        "offline"
    }

    fn description(&self) -> &'static str {
        "Catalog snapshot stored as JSON; pass the file as database=<path>"
    }

    async fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn CatalogCrawler>> {
        let path = config
            .database
            .as_deref()
            .ok_or_else(|| LensError::connection("Offline connections need database=<snapshot path>"))?;

        let crawler = SnapshotCrawler::open(Path::new(path)).await?;
        Ok(Arc::new(crawler))
    }
}

/// Writes `catalog` as a pretty-printed snapshot file.
pub fn write_snapshot(catalog: &Catalog, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog)
        .map_err(|e| LensError::internal(format!("Cannot serialize catalog: {e}")))?;
    std::fs::write(path, json).map_err(|e| LensError::sink(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::sample_catalog;

    #[tokio::test]
    async fn test_snapshot_round_trip_through_connector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        write_snapshot(&sample_catalog(), &path).unwrap();

        let config = ConnectionConfig {
            server: "offline".to_string(),
            database: Some(path.display().to_string()),
            ..Default::default()
        };
        let crawler = SnapshotConnector.connect(&config).await.unwrap();
        let catalog = crawler.crawl(&CrawlOptions::default()).await.unwrap();

        assert_eq!(catalog.tables.len(), sample_catalog().tables.len());
        assert!(crawler.describe().contains("books.json"));
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_connection_error() {
        let config = ConnectionConfig {
            server: "offline".to_string(),
            database: Some("/nonexistent/catalog.json".to_string()),
            ..Default::default()
        };
        let err = SnapshotConnector.connect(&config).await.err().unwrap();
        assert_eq!(err.category(), "Connection Error");
    }

    #[tokio::test]
    async fn test_offline_requires_database() {
        let config = ConnectionConfig {
            server: "offline".to_string(),
            ..Default::default()
        };
        assert!(SnapshotConnector.connect(&config).await.is_err());
    }
}
