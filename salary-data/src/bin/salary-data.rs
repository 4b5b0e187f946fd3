use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use salary_core::{DEFAULT_HISTORY_LIMIT, IrpsSchedule, PayrollConfig, PayrollService};
use salary_data::{BatchCalculator, HistoryExporter};
use salary_db_sqlite::SqliteRepository;
use tracing_subscriber::EnvFilter;

/// Batch salary calculations and history export.
#[derive(Parser, Debug)]
#[command(name = "salary-data")]
#[command(version, about, long_about = None)]
struct Args {
    /// SQLite database file or URL
    #[arg(short, long, global = true, default_value = "salary.db")]
    database: String,

    /// IRPS withholding table: matrix, formula or marginal
    #[arg(long, global = true, default_value = "matrix")]
    schedule: IrpsSchedule,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate every row of a CSV file
    ///
    /// Columns: salary, calculation_type, medical_aid, loans,
    /// other_discounts, dependents
    Batch {
        /// Input CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Write results here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Store each result in the calculation history
        #[arg(short, long, default_value_t = false)]
        persist: bool,
    },

    /// Write recent calculation history as CSV
    Export {
        /// Number of results to export (1-100)
        #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create: {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;
    repo.run_migrations()
        .await
        .context("Failed to run migrations")?;

    let service = PayrollService::new(PayrollConfig::with_schedule(args.schedule), Arc::new(repo));

    match args.command {
        Command::Batch { file, out, persist } => {
            let input = File::open(&file)
                .with_context(|| format!("Failed to open: {}", file.display()))?;
            let records = BatchCalculator::parse(input)
                .with_context(|| format!("Failed to parse CSV: {}", file.display()))?;
            eprintln!("Parsed {} rows from {}", records.len(), file.display());

            let results = BatchCalculator::run(&service, &records, persist)
                .await
                .context("Batch calculation failed")?;
            let written = BatchCalculator::write_results(output(out.as_ref())?, &results)
                .context("Failed to write results")?;

            if persist {
                eprintln!("Calculated and stored {written} results.");
            } else {
                eprintln!("Calculated {written} results.");
            }
        }
        Command::Export { limit, out } => {
            let written = HistoryExporter::export(&service, limit, output(out.as_ref())?)
                .await
                .context("Failed to export history")?;
            eprintln!("Exported {written} calculations.");
        }
    }

    Ok(())
}
