mod sqlite;

use crate::error::StoreError;

pub use sqlite::{expand_path, SqliteStore};

/// Synchronous access to a SQL database, driven by statement texts supplied
/// by the caller.
pub trait Store {
    /// True when `sql` yields at least one row.
    fn exists(&self, sql: &str) -> Result<bool, StoreError>;
    /// Runs a query whose first column of the first row is a count.
    fn count(&self, sql: &str) -> Result<u64, StoreError>;
    /// Runs a statement without parameters, discarding any rows.
    fn execute(&self, sql: &str) -> Result<(), StoreError>;
    /// Runs `sql` once per record with (category, x, y) bound as positional
    /// parameters. Returns the number of rows inserted.
    fn insert_batch(&self, sql: &str, records: &[Record]) -> Result<usize, StoreError>;
    /// Runs a query returning (category, count) rows.
    fn category_counts(&self, sql: &str) -> Result<Vec<CategoryCount>, StoreError>;
}

/// One synthetic sample point.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub category: String,
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct Records {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>, // each inner Vec is a row of stringified values
}
