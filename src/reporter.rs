//! Observer for seeding progress.
//!
//! The seeder never logs on its own; it tells a [`Reporter`] what happened
//! and the caller decides where that goes.

use crate::db::CategoryCount;
use crate::error::Phase;
use crate::logger::{debug, info};

pub trait Reporter {
    /// A phase is about to start.
    fn phase(&mut self, _phase: Phase) {}

    /// The table already holds `rows` rows; population is skipped.
    fn already_seeded(&mut self, _rows: u64) {}

    fn table_created(&mut self) {}

    fn inserted(&mut self, _rows: usize) {}

    /// One row of the verification query.
    fn category_count(&mut self, count: &CategoryCount);
}

/// Forwards every event to the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn phase(&mut self, phase: Phase) {
        debug(&format!("phase: {phase}"));
    }

    fn already_seeded(&mut self, rows: u64) {
        info(&format!("database already exists and has {rows} records"));
    }

    fn table_created(&mut self) {
        info("data table created");
    }

    fn inserted(&mut self, rows: usize) {
        info(&format!("inserted {rows} sample records"));
    }

    fn category_count(&mut self, count: &CategoryCount) {
        info(&format!(
            "category {} has {} records",
            count.category, count.count
        ));
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    pub phases: Vec<Phase>,
    pub already_seeded: Option<u64>,
    pub created: bool,
    pub inserted: usize,
    pub counts: Vec<CategoryCount>,
}

impl Reporter for Recorder {
    fn phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    fn already_seeded(&mut self, rows: u64) {
        self.already_seeded = Some(rows);
    }

    fn table_created(&mut self) {
        self.created = true;
    }

    fn inserted(&mut self, rows: usize) {
        self.inserted += rows;
    }

    fn category_count(&mut self, count: &CategoryCount) {
        self.counts.push(count.clone());
    }
}
