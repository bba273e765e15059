//! Catalog object model.
//!
//! Represents a crawled database: crawl metadata plus tables, routines,
//! synonyms, sequences and column data types. Everything is serializable so a
//! catalog can be stored as an offline snapshot and emitted as JSON.

use serde::{Deserialize, Serialize};

/// The complete crawled model of a database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Metadata about the crawl itself.
    pub crawl_info: CrawlInfo,

    /// Data types known to the database.
    pub column_data_types: Vec<ColumnDataType>,

    /// Tables and views.
    pub tables: Vec<Table>,

    /// Procedures and functions.
    pub routines: Vec<Routine>,

    pub synonyms: Vec<Synonym>,

    pub sequences: Vec<Sequence>,
}

impl Catalog {
    /// Finds a table by its fully-qualified name.
    pub fn table(&self, full_name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.full_name() == full_name)
    }
}

/// Who crawled what, and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlInfo {
    pub crawler_version: String,
    pub crawl_timestamp: String,
    pub database_product: String,
    pub database_version: String,
    pub driver_version: String,
}

/// Common view over named catalog objects.
pub trait DatabaseObject {
    /// Schema name; empty for objects that are not schema-scoped.
    fn schema(&self) -> &str;

    fn name(&self) -> &str;

    fn remarks(&self) -> Option<&str>;

    /// `schema.name`, or just the name when there is no schema.
    fn full_name(&self) -> String {
        qualify(self.schema(), self.name())
    }

    /// Returns true if the object carries non-blank remarks.
    fn has_remarks(&self) -> bool {
        self.remarks().is_some_and(|r| !r.trim().is_empty())
    }
}

/// Joins a schema and a name the way fully-qualified names are written.
pub fn qualify(schema: &str, name: &str) -> String {
    if schema.is_empty() {
        name.to_string()
    } else {
        format!("{schema}.{name}")
    }
}

/// A data type reported by the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDataType {
    pub name: String,

    /// Generic SQL type the database type maps to (e.g. "VARCHAR").
    pub sql_type: String,

    pub user_defined: bool,

    pub remarks: Option<String>,
}

impl DatabaseObject for ColumnDataType {
    fn schema(&self) -> &str {
        ""
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}

/// Represents a database table or view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub schema: String,

    /// Table name.
    pub name: String,

    /// "TABLE", "VIEW", ...
    pub table_type: String,

    pub remarks: Option<String>,

    /// View definition, if any.
    pub definition: Option<String>,

    /// Columns in the table.
    pub columns: Vec<Column>,

    /// Column names that form the primary key.
    pub primary_key: Vec<String>,

    /// Foreign keys declared on this table.
    pub foreign_keys: Vec<ForeignKey>,

    /// Indexes on the table.
    pub indexes: Vec<Index>,

    /// Inferred relationships; filled in by the crawler when requested.
    pub weak_associations: Vec<WeakAssociation>,

    pub row_count: Option<u64>,
}

impl Table {
    /// Creates a new table with the given schema and name.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            table_type: "TABLE".to_string(),
            ..Default::default()
        }
    }

    /// Fully-qualified name of one of this table's columns.
    pub fn column_full_name(&self, column: &str) -> String {
        format!("{}.{}", self.full_name(), column)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn is_view(&self) -> bool {
        self.table_type.eq_ignore_ascii_case("VIEW")
    }
}

impl DatabaseObject for Table {
    fn schema(&self) -> &str {
        &self.schema
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}

/// Represents a column in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Data type (e.g., "INTEGER", "VARCHAR(255)").
    pub data_type: String,

    /// Whether the column allows NULL values.
    pub nullable: bool,

    /// Default value expression, if any.
    pub default: Option<String>,

    pub remarks: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Default::default()
        }
    }
}

/// A declared foreign key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKey {
    pub name: Option<String>,

    /// Referencing columns in this table.
    pub columns: Vec<String>,

    /// Fully-qualified name of the referenced table.
    pub referenced_table: String,

    pub referenced_columns: Vec<String>,
}

/// Represents an index on a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Index {
    /// Index name.
    pub name: String,

    /// Columns in the index, in order.
    pub columns: Vec<String>,

    /// Whether this is a unique index.
    pub is_unique: bool,
}

/// A relationship inferred from column naming, not declared as a foreign key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeakAssociation {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// A stored procedure or function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routine {
    pub schema: String,
    pub name: String,

    /// "PROCEDURE" or "FUNCTION".
    pub routine_type: String,

    pub return_type: String,
    pub parameters: Vec<RoutineParameter>,
    pub definition: Option<String>,
    pub remarks: Option<String>,
}

impl DatabaseObject for Routine {
    fn schema(&self) -> &str {
        &self.schema
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineParameter {
    pub name: String,
    pub data_type: String,

    /// "IN", "OUT" or "INOUT".
    pub mode: String,
}

/// An alias for another database object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Synonym {
    pub schema: String,
    pub name: String,

    /// Fully-qualified name of the aliased object.
    pub referenced_object: String,

    pub remarks: Option<String>,
}

impl DatabaseObject for Synonym {
    fn schema(&self) -> &str {
        &self.schema
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sequence {
    pub schema: String,
    pub name: String,
    pub increment: i64,
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub cycle: bool,
    pub remarks: Option<String>,
}

impl DatabaseObject for Sequence {
    fn schema(&self) -> &str {
        &self.schema
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}
