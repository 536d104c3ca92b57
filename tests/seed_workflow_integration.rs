//! Integration tests for seeding a real SQLite file end to end.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use dataseed::prelude::*;
use rusqlite::Connection;

fn seed(path: &Path, statements: &dyn StatementSource) -> Result<SeedReport, SeedError> {
    let store = SqliteStore::open(path).map_err(SeedError::store(Phase::Connect))?;
    Seeder::new(SeedConfig::default())?.ensure_seeded(
        &store,
        statements,
        &mut Recorder::default(),
        &mut rand::thread_rng(),
    )
}

fn row_count(path: &Path) -> anyhow::Result<i64> {
    let conn = Connection::open(path)?;
    Ok(conn.query_row("SELECT COUNT(*) FROM data", [], |row| row.get(0))?)
}

fn table_exists(path: &Path) -> anyhow::Result<bool> {
    let conn = Connection::open(path)?;
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'data'",
        [],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

/// Serves the built-in statements except the ones listed.
struct Without(Vec<StatementName>);

impl StatementSource for Without {
    fn statement(&self, name: StatementName) -> Result<Cow<'_, str>, StatementError> {
        if self.0.contains(&name) {
            return Err(StatementError::Read {
                name,
                path: PathBuf::from(name.file_name()),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        EmbeddedStatements.statement(name)
    }
}

#[test]
fn test_fresh_database_gets_sixty_rows() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("data").join("mydata.db");

    let report = seed(&path, &EmbeddedStatements)?;

    assert_eq!(report.outcome, SeedOutcome::Created);
    assert_eq!(report.inserted, 60);
    assert_eq!(report.total_rows(), 60);
    assert_eq!(row_count(&path)?, 60);
    Ok(())
}

#[test]
fn test_verification_returns_each_category_with_twenty() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mydata.db");

    let report = seed(&path, &EmbeddedStatements)?;

    let expected: Vec<CategoryCount> = ["A", "B", "C"]
        .iter()
        .map(|c| CategoryCount { category: c.to_string(), count: 20 })
        .collect();
    assert_eq!(report.counts, expected);
    Ok(())
}

#[test]
fn test_second_run_inserts_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mydata.db");

    seed(&path, &EmbeddedStatements)?;
    let second = seed(&path, &EmbeddedStatements)?;

    assert_eq!(second.outcome, SeedOutcome::AlreadySeeded { rows: 60 });
    assert_eq!(second.inserted, 0);
    assert_eq!(second.total_rows(), 60);
    assert_eq!(row_count(&path)?, 60);
    Ok(())
}

#[test]
fn test_stored_values_follow_formula() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mydata.db");
    seed(&path, &EmbeddedStatements)?;

    let conn = Connection::open(&path)?;
    let mut stmt = conn.prepare("SELECT category, x_value, y_value FROM data")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })?;

    let mut seen = 0;
    for row in rows {
        let (category, x, y) = row?;
        let index = ["A", "B", "C"]
            .iter()
            .position(|c| *c == category)
            .expect("unknown category");
        assert!((1..=20).contains(&x));
        let random_part = y - 0.2 * x as f64 - category_offset(index);
        assert!(
            (5.0 - 1e-9..15.0 + 1e-9).contains(&random_part),
            "{category}/{x}: {random_part}"
        );
        seen += 1;
    }
    assert_eq!(seen, 60);
    Ok(())
}

#[test]
fn test_existing_empty_table_is_repopulated() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mydata.db");
    {
        let conn = Connection::open(&path)?;
        conn.execute_batch("CREATE TABLE data (category TEXT, x_value INTEGER, y_value DOUBLE)")?;
    }

    let report = seed(&path, &EmbeddedStatements)?;

    assert_eq!(report.outcome, SeedOutcome::Repopulated);
    assert_eq!(row_count(&path)?, 60);
    Ok(())
}

#[test]
fn test_missing_create_statement_leaves_database_untouched() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mydata.db");

    let err = seed(&path, &Without(vec![StatementName::CreateTable])).unwrap_err();

    assert!(matches!(err, SeedError::Io { phase: Phase::Create, .. }));
    assert!(!table_exists(&path)?);
    Ok(())
}

#[test]
fn test_missing_insert_statement_fails_before_create() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mydata.db");

    let err = seed(&path, &Without(vec![StatementName::InsertRecord])).unwrap_err();

    assert!(matches!(err, SeedError::Io { phase: Phase::Populate, .. }));
    assert!(!table_exists(&path)?);
    Ok(())
}

#[test]
fn test_statements_from_directory() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let sql_dir = dir.path().join("sql");
    std::fs::create_dir_all(&sql_dir)?;
    for name in StatementName::ALL {
        std::fs::write(
            sql_dir.join(name.file_name()),
            &*EmbeddedStatements.statement(name)?,
        )?;
    }
    let path = dir.path().join("mydata.db");

    let report = seed(&path, &DirStatements::new(&sql_dir))?;
    assert_eq!(report.total_rows(), 60);

    std::fs::remove_file(sql_dir.join("check_table_exists.sql"))?;
    let err = seed(&path, &DirStatements::new(&sql_dir)).unwrap_err();
    assert!(matches!(err, SeedError::Io { phase: Phase::Detect, .. }));
    assert!(err.to_string().starts_with("detect failed"));
    Ok(())
}

#[test]
fn test_custom_configuration_shapes_table() -> anyhow::Result<()> {
    let store = SqliteStore::open_in_memory()?;
    let config = SeedConfig {
        categories: vec!["east".into(), "west".into()],
        points_per_category: 7,
        value_range: (0.0, 2.0),
    };
    let mut recorder = Recorder::default();

    let report = Seeder::new(config)?.ensure_seeded(
        &store,
        &EmbeddedStatements,
        &mut recorder,
        &mut rand::thread_rng(),
    )?;

    assert_eq!(report.inserted, 14);
    assert_eq!(
        recorder.counts,
        vec![
            CategoryCount { category: "east".into(), count: 7 },
            CategoryCount { category: "west".into(), count: 7 },
        ]
    );
    Ok(())
}
