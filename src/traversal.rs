//! Catalog traversal.
//!
//! A [`CatalogTraverser`] feeds a [`Catalog`] to a [`CatalogHandler`] in a
//! fixed order:
//!
//! 1. `begin`
//! 2. `handle_crawl_info`, exactly once
//! 3. column data types, tables, routines, synonyms, sequences; each as
//!    `handle_start` → `handle` per object → `handle_end`
//! 4. `end`
//!
//! Objects inside a category are visited by full name, so two traversals of
//! the same catalog produce the same calls.

use crate::catalog::{
    Catalog, ColumnDataType, CrawlInfo, DatabaseObject, Routine, Sequence, Synonym, Table,
};
use crate::error::Result;
use std::fmt;

/// Object categories, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ColumnDataTypes,
    Tables,
    Routines,
    Synonyms,
    Sequences,
}

impl Category {
    /// Every category, in the order they are traversed.
    pub const ALL: [Category; 5] = [
        Category::ColumnDataTypes,
        Category::Tables,
        Category::Routines,
        Category::Synonyms,
        Category::Sequences,
    ];

    /// Section heading used by human-readable formatters.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ColumnDataTypes => "Column Data Types",
            Self::Tables => "Tables",
            Self::Routines => "Routines",
            Self::Synonyms => "Synonyms",
            Self::Sequences => "Sequences",
        }
    }

    /// Key used by structured formatters.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ColumnDataTypes => "column_data_types",
            Self::Tables => "tables",
            Self::Routines => "routines",
            Self::Synonyms => "synonyms",
            Self::Sequences => "sequences",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One catalog object handed to a handler.
#[derive(Debug, Clone, Copy)]
pub enum CatalogObject<'a> {
    ColumnDataType(&'a ColumnDataType),
    Table(&'a Table),
    Routine(&'a Routine),
    Synonym(&'a Synonym),
    Sequence(&'a Sequence),
}

impl<'a> CatalogObject<'a> {
    pub fn category(&self) -> Category {
        match self {
            Self::ColumnDataType(_) => Category::ColumnDataTypes,
            Self::Table(_) => Category::Tables,
            Self::Routine(_) => Category::Routines,
            Self::Synonym(_) => Category::Synonyms,
            Self::Sequence(_) => Category::Sequences,
        }
    }

    /// The object through its common name/remarks view.
    pub fn as_database_object(&self) -> &'a dyn DatabaseObject {
        match *self {
            Self::ColumnDataType(o) => o,
            Self::Table(o) => o,
            Self::Routine(o) => o,
            Self::Synonym(o) => o,
            Self::Sequence(o) => o,
        }
    }

    pub fn full_name(&self) -> String {
        self.as_database_object().full_name()
    }

    /// Type label shown next to the name: table type, routine type, ...
    pub fn type_label(&self) -> String {
        match self {
            Self::ColumnDataType(t) => {
                if t.user_defined {
                    "user defined".to_string()
                } else {
                    "system".to_string()
                }
            }
            Self::Table(t) => t.table_type.to_lowercase(),
            Self::Routine(r) => r.routine_type.to_lowercase(),
            Self::Synonym(_) => "synonym".to_string(),
            Self::Sequence(_) => "sequence".to_string(),
        }
    }
}

/// Receives catalog contents in traversal order.
///
/// Every method defaults to a no-op. An error from any method stops the
/// traversal and is returned to the caller.
pub trait CatalogHandler {
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn handle_crawl_info(&mut self, _info: &CrawlInfo) -> Result<()> {
        Ok(())
    }

    fn handle_start(&mut self, _category: Category) -> Result<()> {
        Ok(())
    }

    fn handle(&mut self, _object: CatalogObject<'_>) -> Result<()> {
        Ok(())
    }

    fn handle_end(&mut self, _category: Category) -> Result<()> {
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        Ok(())
    }

    /// When true, start/end calls are skipped for categories with no objects.
    fn suppress_empty_sections(&self) -> bool {
        false
    }
}

/// Walks a catalog in the fixed traversal order.
pub struct CatalogTraverser<'a> {
    catalog: &'a Catalog,
}

impl<'a> CatalogTraverser<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Objects of one category, sorted by full name.
    pub fn objects(&self, category: Category) -> Vec<CatalogObject<'a>> {
        let catalog = self.catalog;
        let mut objects: Vec<CatalogObject<'a>> = match category {
            Category::ColumnDataTypes => catalog
                .column_data_types
                .iter()
                .map(CatalogObject::ColumnDataType)
                .collect(),
            Category::Tables => catalog.tables.iter().map(CatalogObject::Table).collect(),
            Category::Routines => catalog.routines.iter().map(CatalogObject::Routine).collect(),
            Category::Synonyms => catalog.synonyms.iter().map(CatalogObject::Synonym).collect(),
            Category::Sequences => catalog
                .sequences
                .iter()
                .map(CatalogObject::Sequence)
                .collect(),
        };
        objects.sort_by_cached_key(|o| o.full_name());
        objects
    }

    /// Runs `handler` over the whole catalog.
    pub fn traverse(&self, handler: &mut dyn CatalogHandler) -> Result<()> {
        handler.begin()?;
        handler.handle_crawl_info(&self.catalog.crawl_info)?;

        for category in Category::ALL {
            let objects = self.objects(category);
            if objects.is_empty() && handler.suppress_empty_sections() {
                tracing::trace!("Skipping empty section {}", category);
                continue;
            }

            handler.handle_start(category)?;
            for object in objects {
                handler.handle(object)?;
            }
            handler.handle_end(category)?;
        }

        handler.end()
    }
}
