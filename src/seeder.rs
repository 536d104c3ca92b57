//! Create-if-absent, populate-if-empty, then verify.

use rand::Rng;

use crate::config::SeedConfig;
use crate::db::{CategoryCount, Record, Store};
use crate::error::{Phase, SeedError};
use crate::reporter::Reporter;
use crate::statements::{StatementName, StatementSource};

/// Added to y per position of a category in its enumeration.
pub const CATEGORY_OFFSET_STEP: f64 = 3.0;
/// Weight of x in y.
pub const X_SLOPE: f64 = 0.2;

/// Offset of the category at `index` (0-based) in the configured order.
pub fn category_offset(index: usize) -> f64 {
    CATEGORY_OFFSET_STEP * index as f64
}

/// Every category crossed with x in `1..=points_per_category`, in category
/// order. `y = uniform[min, max) + category_offset + X_SLOPE * x`.
pub fn generate_records(config: &SeedConfig, rng: &mut impl Rng) -> Vec<Record> {
    let (min, max) = config.value_range;
    let mut records = Vec::with_capacity(config.total_records());
    for (index, category) in config.categories.iter().enumerate() {
        let offset = category_offset(index);
        for x in 1..=i64::from(config.points_per_category) {
            let y = rng.gen_range(min..max) + offset + X_SLOPE * x as f64;
            records.push(Record {
                category: category.clone(),
                x,
                y,
            });
        }
    }
    records
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table held rows before the run; nothing was written.
    AlreadySeeded { rows: u64 },
    /// The table was absent and has been created and populated.
    Created,
    /// The table existed but was empty and has been populated.
    Repopulated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    pub outcome: SeedOutcome,
    pub inserted: usize,
    pub counts: Vec<CategoryCount>,
}

impl SeedReport {
    pub fn total_rows(&self) -> u64 {
        self.counts.iter().map(|c| c.count).sum()
    }
}

pub struct Seeder {
    config: SeedConfig,
}

impl Seeder {
    pub fn new(config: SeedConfig) -> Result<Self, SeedError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Makes sure the table exists and holds sample data, then reports the
    /// per-category row counts.
    ///
    /// A table with at least one row counts as seeded and is left alone. The
    /// statements needed to mutate the store are resolved before the first
    /// write, so a statement that cannot be read leaves the store untouched.
    pub fn ensure_seeded<S, Q, R>(
        &self,
        store: &S,
        statements: &Q,
        reporter: &mut R,
        rng: &mut impl Rng,
    ) -> Result<SeedReport, SeedError>
    where
        S: Store + ?Sized,
        Q: StatementSource + ?Sized,
        R: Reporter + ?Sized,
    {
        reporter.phase(Phase::Detect);
        let check = statements
            .statement(StatementName::CheckTableExists)
            .map_err(SeedError::io(Phase::Detect))?;
        let exists = store
            .exists(&check)
            .map_err(SeedError::store(Phase::Detect))?;

        if exists {
            let count_sql = statements
                .statement(StatementName::CountRecords)
                .map_err(SeedError::io(Phase::Detect))?;
            let rows = store
                .count(&count_sql)
                .map_err(SeedError::store(Phase::Detect))?;
            if rows > 0 {
                reporter.already_seeded(rows);
                let verify_sql = statements
                    .statement(StatementName::VerifyByCategory)
                    .map_err(SeedError::io(Phase::Verify))?;
                let counts = verify(store, &verify_sql, reporter)?;
                return Ok(SeedReport {
                    outcome: SeedOutcome::AlreadySeeded { rows },
                    inserted: 0,
                    counts,
                });
            }
        }

        let create_sql = if exists {
            None
        } else {
            Some(
                statements
                    .statement(StatementName::CreateTable)
                    .map_err(SeedError::io(Phase::Create))?,
            )
        };
        let insert_sql = statements
            .statement(StatementName::InsertRecord)
            .map_err(SeedError::io(Phase::Populate))?;
        let verify_sql = statements
            .statement(StatementName::VerifyByCategory)
            .map_err(SeedError::io(Phase::Verify))?;

        if let Some(create_sql) = create_sql {
            reporter.phase(Phase::Create);
            store
                .execute(&create_sql)
                .map_err(SeedError::store(Phase::Create))?;
            reporter.table_created();
        }

        reporter.phase(Phase::Populate);
        let records = generate_records(&self.config, rng);
        let inserted = store
            .insert_batch(&insert_sql, &records)
            .map_err(SeedError::store(Phase::Populate))?;
        reporter.inserted(inserted);

        let counts = verify(store, &verify_sql, reporter)?;
        Ok(SeedReport {
            outcome: if exists {
                SeedOutcome::Repopulated
            } else {
                SeedOutcome::Created
            },
            inserted,
            counts,
        })
    }
}

fn verify<S, R>(store: &S, sql: &str, reporter: &mut R) -> Result<Vec<CategoryCount>, SeedError>
where
    S: Store + ?Sized,
    R: Reporter + ?Sized,
{
    reporter.phase(Phase::Verify);
    let counts = store
        .category_counts(sql)
        .map_err(SeedError::store(Phase::Verify))?;
    for count in &counts {
        reporter.category_count(count);
    }
    Ok(counts)
}
