//! Creates, seeds and verifies a local sample database.
//!
//! ```rust,ignore
//! use dataseed::prelude::*;
//!
//! let store = SqliteStore::open(Path::new("data/mydata.db"))?;
//! let report = Seeder::new(SeedConfig::default())?.ensure_seeded(
//!     &store,
//!     &EmbeddedStatements,
//!     &mut LogReporter,
//!     &mut rand::thread_rng(),
//! )?;
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod reporter;
pub mod seeder;
pub mod statements;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{AppConfig, SeedConfig};
    pub use crate::db::{CategoryCount, Record, SqliteStore, Store};
    pub use crate::error::{Phase, SeedError, StatementError, StoreError};
    pub use crate::reporter::{LogReporter, Recorder, Reporter};
    pub use crate::seeder::{category_offset, generate_records, SeedOutcome, SeedReport, Seeder};
    pub use crate::statements::{DirStatements, EmbeddedStatements, StatementName, StatementSource};
}
