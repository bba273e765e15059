//! Catalog model and crawlers.
//!
//! Provides the crawled object model plus a trait-based interface for the
//! data sources that produce it, so different crawlers can be used
//! interchangeably.

mod crawler;
mod filter;
mod mock;
mod schema;
mod snapshot;

pub use crawler::{CatalogCrawler, Connector, ConnectorRegistry};
pub use filter::apply_options;
pub use mock::{sample_catalog, FailingCrawler, MockConnector, MockCrawler};
pub use schema::{
    qualify, Catalog, Column, ColumnDataType, CrawlInfo, DatabaseObject, ForeignKey, Index,
    Routine, RoutineParameter, Sequence, Synonym, Table, WeakAssociation,
};
pub use snapshot::{write_snapshot, SnapshotConnector, SnapshotCrawler};

use std::sync::Arc;

/// Registry with the built-in connectors. The mock connector is only
/// registered on request.
pub fn default_connectors(with_mock: bool) -> ConnectorRegistry {
    let registry = ConnectorRegistry::new().register(Arc::new(SnapshotConnector));
    if with_mock {
        registry.register(Arc::new(MockConnector::new()))
    } else {
        registry
    }
}
