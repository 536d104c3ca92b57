//! SQL statement texts used by the seeder, addressed by logical name.
//!
//! [`EmbeddedStatements`] serves the texts compiled into the binary from
//! `sql/`. [`DirStatements`] reads the same file names from a directory at
//! run time, so the statements can be edited without rebuilding.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::StatementError;
use crate::logger::debug;

/// Table the embedded statements operate on.
pub const DATA_TABLE: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementName {
    CheckTableExists,
    CountRecords,
    CreateTable,
    InsertRecord,
    VerifyByCategory,
}

impl StatementName {
    pub const ALL: [StatementName; 5] = [
        StatementName::CheckTableExists,
        StatementName::CountRecords,
        StatementName::CreateTable,
        StatementName::InsertRecord,
        StatementName::VerifyByCategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementName::CheckTableExists => "check_table_exists",
            StatementName::CountRecords => "count_records",
            StatementName::CreateTable => "create_data_table",
            StatementName::InsertRecord => "insert_data",
            StatementName::VerifyByCategory => "verify_data_by_category",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.sql", self.as_str())
    }
}

impl fmt::Display for StatementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supplies statement text by name.
///
/// The insert statement takes three positional parameters in the order
/// category, x, y.
pub trait StatementSource {
    fn statement(&self, name: StatementName) -> Result<Cow<'_, str>, StatementError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedStatements;

impl StatementSource for EmbeddedStatements {
    fn statement(&self, name: StatementName) -> Result<Cow<'_, str>, StatementError> {
        let text = match name {
            StatementName::CheckTableExists => include_str!("../sql/check_table_exists.sql"),
            StatementName::CountRecords => include_str!("../sql/count_records.sql"),
            StatementName::CreateTable => include_str!("../sql/create_data_table.sql"),
            StatementName::InsertRecord => include_str!("../sql/insert_data.sql"),
            StatementName::VerifyByCategory => include_str!("../sql/verify_data_by_category.sql"),
        };
        Ok(Cow::Borrowed(text.trim()))
    }
}

/// Reads `<dir>/<name>.sql` on every lookup.
#[derive(Debug, Clone)]
pub struct DirStatements {
    dir: PathBuf,
}

impl DirStatements {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: StatementName) -> PathBuf {
        self.dir.join(name.file_name())
    }
}

impl StatementSource for DirStatements {
    fn statement(&self, name: StatementName) -> Result<Cow<'_, str>, StatementError> {
        let path = self.path_for(name);
        debug(&format!("statements: reading {}", path.display()));
        let text = fs::read_to_string(&path).map_err(|source| StatementError::Read {
            name,
            path: path.clone(),
            source,
        })?;
        let text = text.trim();
        if text.is_empty() {
            return Err(StatementError::Empty { name, path });
        }
        Ok(Cow::Owned(text.to_string()))
    }
}
