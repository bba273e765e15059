//! Mock crawler for testing.
//!
//! Serves a built-in sample catalog (a small books database) from memory and
//! records every crawl so tests can inspect the options the shell passed in.

use super::crawler::{CatalogCrawler, Connector};
use super::filter::apply_options;
use super::schema::{
    Catalog, Column, ColumnDataType, CrawlInfo, ForeignKey, Index, Routine, RoutineParameter,
    Sequence, Synonym, Table,
};
use crate::config::ConnectionConfig;
use crate::error::{LensError, Result};
use crate::options::CrawlOptions;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A mock crawler that filters a fixed catalog.
pub struct MockCrawler {
    catalog: Catalog,
    crawls: AtomicUsize,
    closed: AtomicBool,
    last_options: Mutex<Option<CrawlOptions>>,
}

impl MockCrawler {
    /// Creates a mock crawler serving the sample catalog.
    pub fn new() -> Self {
        Self::with_catalog(sample_catalog())
    }

    /// Creates a mock crawler serving the given catalog.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            crawls: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            last_options: Mutex::new(None),
        }
    }

    /// Number of crawls performed so far.
    pub fn crawl_count(&self) -> usize {
        self.crawls.load(Ordering::SeqCst)
    }

    /// Options passed to the most recent crawl.
    pub fn last_options(&self) -> Option<CrawlOptions> {
        self.last_options
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for MockCrawler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogCrawler for MockCrawler {
    async fn crawl(&self, options: &CrawlOptions) -> Result<Catalog> {
        self.crawls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_options.lock() {
            *last = Some(options.clone());
        }
        Ok(apply_options(&self.catalog, options))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "mock catalog (in memory)".to_string()
    }
}

/// A crawler whose crawls always fail with the given message.
pub struct FailingCrawler {
    message: String,
}

impl FailingCrawler {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CatalogCrawler for FailingCrawler {
    async fn crawl(&self, _options: &CrawlOptions) -> Result<Catalog> {
        Err(LensError::crawl(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "failing crawler".to_string()
    }
}

/// Connector for `server=mock`. Every connection shares one crawler.
pub struct MockConnector {
    crawler: Arc<dyn CatalogCrawler>,
}

impl MockConnector {
    /// Creates a connector serving the sample catalog.
    pub fn new() -> Self {
        Self::with_crawler(Arc::new(MockCrawler::new()))
    }

    /// Creates a connector handing out the given crawler.
    pub fn with_crawler(crawler: Arc<dyn CatalogCrawler>) -> Self {
        Self { crawler }
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for MockConnector {
    fn server(&self) -> &'static str {
        "mock"
    }

    fn description(&self) -> &'static str {
        "Built-in sample books catalog, held in memory"
    }

    async fn connect(&self, _config: &ConnectionConfig) -> Result<Arc<dyn CatalogCrawler>> {
        Ok(Arc::clone(&self.crawler))
    }
}

fn column(name: &str, data_type: &str, nullable: bool) -> Column {
    Column {
        nullable,
        ..Column::new(name, data_type)
    }
}

fn foreign_key(name: &str, column: &str, table: &str, referenced: &str) -> ForeignKey {
    ForeignKey {
        name: Some(name.to_string()),
        columns: vec![column.to_string()],
        referenced_table: table.to_string(),
        referenced_columns: vec![referenced.to_string()],
    }
}

/// A small books database spread over two schemas.
pub fn sample_catalog() -> Catalog {
    const BOOKS: &str = "PUBLIC.BOOKS";
    const SALES: &str = "PUBLIC.PUBLISHER_SALES";

    let authors = Table {
        remarks: Some("Contact details for book authors".to_string()),
        columns: vec![
            column("ID", "INTEGER", false),
            column("FIRSTNAME", "VARCHAR(20)", false),
            column("LASTNAME", "VARCHAR(20)", false),
            column("ADDRESS1", "VARCHAR(255)", true),
            column("CITY", "VARCHAR(50)", true),
            column("COUNTRY", "VARCHAR(50)", true),
        ],
        primary_key: vec!["ID".to_string()],
        indexes: vec![Index {
            name: "IDX_B_AUTHORS".to_string(),
            columns: vec!["LASTNAME".to_string(), "FIRSTNAME".to_string()],
            is_unique: false,
        }],
        row_count: Some(20),
        ..Table::new(BOOKS, "AUTHORS")
    };

    let publishers = Table {
        remarks: Some("List of book publishers".to_string()),
        columns: vec![
            column("ID", "INTEGER", false),
            column("PUBLISHER", "VARCHAR(255)", true),
        ],
        primary_key: vec!["ID".to_string()],
        row_count: Some(3),
        ..Table::new(BOOKS, "PUBLISHERS")
    };

    let books = Table {
        remarks: Some("Details for published books".to_string()),
        columns: vec![
            column("ID", "INTEGER", false),
            column("TITLE", "VARCHAR(255)", false),
            column("DESCRIPTION", "VARCHAR(255)", true),
            column("PUBLISHER_ID", "INTEGER", false),
            column("PUBLICATION_DATE", "DATE", true),
            column("PRICE", "DOUBLE", true),
        ],
        primary_key: vec!["ID".to_string()],
        row_count: Some(12),
        ..Table::new(BOOKS, "BOOKS")
    };

    let book_authors = Table {
        remarks: Some("Relationship between books and their authors, along with the latest updated information".to_string()),
        columns: vec![
            column("BOOKID", "INTEGER", false),
            column("AUTHORID", "INTEGER", false),
            column("SOMEDATA", "VARCHAR(30)", true),
        ],
        foreign_keys: vec![
            foreign_key("FK_Y_BOOK", "BOOKID", "PUBLIC.BOOKS.BOOKS", "ID"),
            foreign_key("FK_Z_AUTHOR", "AUTHORID", "PUBLIC.BOOKS.AUTHORS", "ID"),
        ],
        indexes: vec![Index {
            name: "UIDX_BOOKAUTHORS".to_string(),
            columns: vec!["BOOKID".to_string(), "AUTHORID".to_string()],
            is_unique: true,
        }],
        row_count: Some(27),
        ..Table::new(BOOKS, "BOOKAUTHORS")
    };

    let authors_list = Table {
        table_type: "VIEW".to_string(),
        definition: Some("SELECT ID, FIRSTNAME, LASTNAME FROM PUBLIC.BOOKS.AUTHORS".to_string()),
        columns: vec![
            column("FIRSTNAME", "VARCHAR(20)", true),
            column("LASTNAME", "VARCHAR(20)", true),
        ],
        ..Table::new(BOOKS, "AUTHORSLIST")
    };

    let regions = Table {
        columns: vec![
            column("REGION_ID", "INTEGER", false),
            column("CITY", "VARCHAR(50)", false),
            column("COUNTRY", "VARCHAR(50)", false),
        ],
        primary_key: vec!["REGION_ID".to_string()],
        row_count: Some(5),
        ..Table::new(SALES, "REGIONS")
    };

    let sales = Table {
        columns: vec![
            column("POSTAL_CODE", "INTEGER", false),
            column("COUNTRY", "VARCHAR(50)", false),
            column("BOOKID", "INTEGER", true),
            column("PERIODENDDATE", "DATE", true),
            column("TOTALAMOUNT", "DOUBLE", true),
            column("REGION_ID", "INTEGER", false),
        ],
        foreign_keys: vec![foreign_key(
            "FK_SALES_REGIONS",
            "REGION_ID",
            "PUBLIC.PUBLISHER_SALES.REGIONS",
            "REGION_ID",
        )],
        row_count: Some(0),
        ..Table::new(SALES, "SALES")
    };

    Catalog {
        crawl_info: CrawlInfo {
            crawler_version: format!("schemalens {}", env!("CARGO_PKG_VERSION")),
            crawl_timestamp: "2024-01-01T00:00:00Z".to_string(),
            database_product: "HSQL Database Engine".to_string(),
            database_version: "2.7.1".to_string(),
            driver_version: "HSQL Database Engine Driver 2.7.1".to_string(),
        },
        column_data_types: ["DATE", "DOUBLE", "INTEGER", "VARCHAR"]
            .into_iter()
            .map(|name| ColumnDataType {
                name: name.to_string(),
                sql_type: name.to_string(),
                ..Default::default()
            })
            .collect(),
        tables: vec![authors, publishers, books, book_authors, authors_list, regions, sales],
        routines: vec![
            Routine {
                schema: BOOKS.to_string(),
                name: "NEW_PUBLISHER".to_string(),
                routine_type: "PROCEDURE".to_string(),
                return_type: "no result".to_string(),
                parameters: vec![
                    RoutineParameter {
                        name: "NEWPUBLISHER".to_string(),
                        data_type: "VARCHAR".to_string(),
                        mode: "IN".to_string(),
                    },
                    RoutineParameter {
                        name: "PUBLISHER".to_string(),
                        data_type: "VARCHAR".to_string(),
                        mode: "OUT".to_string(),
                    },
                ],
                definition: Some("INSERT INTO PUBLISHERS (PUBLISHER) VALUES (NEWPUBLISHER)".to_string()),
                remarks: None,
            },
            Routine {
                schema: BOOKS.to_string(),
                name: "CUSTOMADD".to_string(),
                routine_type: "FUNCTION".to_string(),
                return_type: "INTEGER".to_string(),
                parameters: vec![RoutineParameter {
                    name: "ONE".to_string(),
                    data_type: "INTEGER".to_string(),
                    mode: "IN".to_string(),
                }],
                definition: Some("RETURN ONE + 1".to_string()),
                remarks: None,
            },
        ],
        synonyms: vec![Synonym {
            schema: BOOKS.to_string(),
            name: "PUBLICATIONS".to_string(),
            referenced_object: "PUBLIC.BOOKS.BOOKS".to_string(),
            remarks: None,
        }],
        sequences: vec![Sequence {
            schema: BOOKS.to_string(),
            name: "PUBLISHER_ID_SEQ".to_string(),
            increment: 1,
            minimum: Some(1),
            maximum: None,
            cycle: false,
            remarks: None,
        }],
    }
}
