use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::statements::StatementName;

/// Stage of a seeding run, carried by every [`SeedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Connect,
    Detect,
    Create,
    Populate,
    Verify,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Connect => "connect",
            Phase::Detect => "detect",
            Phase::Create => "create",
            Phase::Populate => "populate",
            Phase::Verify => "verify",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement text could not be supplied.
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("failed to read statement `{name}` from {}: {source}", .path.display())]
    Read {
        name: StatementName,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("statement `{name}` at {} is empty", .path.display())]
    Empty { name: StatementName, path: PathBuf },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("cannot prepare database location {}: {source}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid database path: {0}")]
    InvalidPath(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one category is required")]
    NoCategories,
    #[error("category `{0}` is listed more than once")]
    DuplicateCategory(String),
    #[error("points_per_category must be greater than zero")]
    NoPoints,
    #[error("value_range [{0}, {1}) is empty or not finite")]
    BadRange(f64, f64),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("{phase} failed: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: StatementError,
    },
    #[error("{phase} failed: {source}")]
    Store {
        phase: Phase,
        #[source]
        source: StoreError,
    },
    #[error("invalid seed configuration: {0}")]
    Config(#[from] ConfigError),
}

impl SeedError {
    pub fn io(phase: Phase) -> impl FnOnce(StatementError) -> SeedError {
        move |source| SeedError::Io { phase, source }
    }

    pub fn store(phase: Phase) -> impl FnOnce(StoreError) -> SeedError {
        move |source| SeedError::Store { phase, source }
    }

    /// Phase the run was in when it failed; `None` for configuration errors.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SeedError::Io { phase, .. } | SeedError::Store { phase, .. } => Some(*phase),
            SeedError::Config(_) => None,
        }
    }
}
