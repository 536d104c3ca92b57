use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::db::SqliteStore;
use crate::error::{Phase, SeedError};
use crate::reporter::Reporter;
use crate::seeder::{SeedReport, Seeder};
use crate::statements::{DirStatements, EmbeddedStatements, StatementSource, DATA_TABLE};

#[derive(Debug, Parser)]
#[command(name = "dataseed", version, about = "Create, seed and verify the sample database")]
pub struct Cli {
    /// YAML configuration file (defaults to <config dir>/dataseed/config.yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Database file to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Read statement texts from <DIR>/<name>.sql instead of the built-in ones
    #[arg(long, value_name = "DIR")]
    pub sql_dir: Option<PathBuf>,

    /// Append log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create and populate the table if needed, then verify it (default)
    Seed,
    /// List tables and print the first rows of the data table
    Inspect {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

impl Cli {
    /// Flags given on the command line win over the file.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(db) = &self.db {
            config.database = db.clone();
        }
        if let Some(dir) = &self.sql_dir {
            config.sql_dir = Some(dir.clone());
        }
        if let Some(log) = &self.log_file {
            config.log_file = Some(log.clone());
        }
        config
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Seed)
    }
}

fn statement_source(config: &AppConfig) -> Box<dyn StatementSource> {
    match &config.sql_dir {
        Some(dir) => Box::new(DirStatements::new(dir)),
        None => Box::new(EmbeddedStatements),
    }
}

/// Opens the configured database and seeds it. The store is closed before
/// returning, on success and on error.
pub fn run_seed<R: Reporter + ?Sized>(
    config: &AppConfig,
    reporter: &mut R,
) -> Result<SeedReport, SeedError> {
    let seeder = Seeder::new(config.seed.clone())?;
    reporter.phase(Phase::Connect);
    let store =
        SqliteStore::open(&config.database).map_err(SeedError::store(Phase::Connect))?;
    let statements = statement_source(config);
    seeder.ensure_seeded(&store, statements.as_ref(), reporter, &mut rand::thread_rng())
}

/// Prints the tables of the configured database and up to `limit` rows of
/// the data table. The database is opened read-only.
pub fn run_inspect(config: &AppConfig, limit: usize, out: &mut impl Write) -> Result<()> {
    let store = SqliteStore::open_read_only(&config.database)
        .with_context(|| format!("failed to open {}", config.database.display()))?;

    let tables = store.list_tables()?;
    writeln!(out, "Tables in {}:", config.database.display())?;
    for table in &tables {
        writeln!(out, "main.{table}")?;
    }

    if !tables.iter().any(|t| t == DATA_TABLE) {
        writeln!(
            out,
            "\nTable '{}' does not exist in {}.",
            DATA_TABLE,
            config.database.display()
        )?;
        return Ok(());
    }

    let records = store.fetch_records(DATA_TABLE, limit, 0)?;
    writeln!(out, "\nFirst {} rows from {}:", records.rows.len(), DATA_TABLE)?;
    writeln!(out, "{}", records.columns.join("\t"))?;
    for row in &records.rows {
        writeln!(out, "{}", row.join("\t"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use crate::reporter::Recorder;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["dataseed", "--db", "other.db", "--sql-dir", "sql"]);
        let config = cli.apply(AppConfig::default());
        assert_eq!(config.database, PathBuf::from("other.db"));
        assert_eq!(config.sql_dir, Some(PathBuf::from("sql")));
        assert_eq!(config.log_file, None);
        assert!(matches!(cli.command(), Command::Seed));
    }

    #[test]
    fn inspect_subcommand_parses_limit() {
        let cli = Cli::parse_from(["dataseed", "inspect", "--limit", "3"]);
        assert!(matches!(cli.command(), Command::Inspect { limit: 3 }));
        let cli = Cli::parse_from(["dataseed", "inspect"]);
        assert!(matches!(cli.command(), Command::Inspect { limit: 10 }));
    }

    #[test]
    fn run_seed_reports_connect_failure() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "")?;
        let config = AppConfig {
            database: blocker.join("mydata.db"),
            ..AppConfig::default()
        };
        let mut recorder = Recorder::default();
        let err = run_seed(&config, &mut recorder).unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Connect));
        assert_eq!(recorder.phases, vec![Phase::Connect]);
        Ok(())
    }

    #[test]
    fn inspect_prints_tables_and_rows() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = AppConfig {
            database: dir.path().join("mydata.db"),
            ..AppConfig::default()
        };
        run_seed(&config, &mut Recorder::default())?;

        let mut out = Vec::new();
        run_inspect(&config, 2, &mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("main.data"));
        assert!(text.contains("First 2 rows from data:"));
        assert!(text.contains("category\tx_value\ty_value"));
        assert!(text.contains("A\t1\t"));
        Ok(())
    }

    #[test]
    fn inspect_reports_missing_table() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("empty.db");
        SqliteStore::open(&path)?.execute("CREATE TABLE other (id INTEGER)")?;
        let config = AppConfig {
            database: path,
            ..AppConfig::default()
        };

        let mut out = Vec::new();
        run_inspect(&config, 10, &mut out)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("main.other"));
        assert!(text.contains("Table 'data' does not exist"));
        Ok(())
    }
}
