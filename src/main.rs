use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use dataseed::cli::{run_inspect, run_seed, Cli, Command};
use dataseed::config::AppConfig;
use dataseed::logger::{error, info, init, warn};
use dataseed::reporter::LogReporter;
use dataseed::seeder::SeedOutcome;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error(&format!("fatal error: {:#}", err));
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.apply(AppConfig::load(cli.config.as_deref())?);

    if let Err(err) = init(config.log_file.as_deref()) {
        warn(&format!("file logging disabled, using stderr: {err}"));
    }
    match &config.sql_dir {
        Some(dir) => info(&format!("reading statements from {}", dir.display())),
        None => info("using built-in statements"),
    }

    match cli.command() {
        Command::Seed => {
            let report = run_seed(&config, &mut LogReporter)
                .with_context(|| format!("seeding {} failed", config.database.display()))?;
            for count in &report.counts {
                println!("{}: {}", count.category, count.count);
            }
            match report.outcome {
                SeedOutcome::AlreadySeeded { rows } => {
                    println!("{} already seeded ({rows} rows)", config.database.display())
                }
                SeedOutcome::Created | SeedOutcome::Repopulated => {
                    if report.total_rows() != config.seed.total_records() as u64 {
                        warn(&format!(
                            "expected {} rows after seeding, found {}",
                            config.seed.total_records(),
                            report.total_rows()
                        ));
                    }
                    println!("{} created successfully", config.database.display())
                }
            }
        }
        Command::Inspect { limit } => {
            let stdout = std::io::stdout();
            run_inspect(&config, limit, &mut stdout.lock())?;
        }
    }
    Ok(())
}
