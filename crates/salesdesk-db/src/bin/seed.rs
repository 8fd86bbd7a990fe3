//! # Seed / Import Tool
//!
//! Populates the record store, either with the built-in sample data set or
//! with a JSON export.
//!
//! ## Usage
//! ```bash
//! # Load the 8 built-in sample records
//! cargo run -p salesdesk-db --bin seed
//!
//! # Import a JSON export (array of rows, any column naming)
//! cargo run -p salesdesk-db --bin seed -- --file ./sales.json
//!
//! # Replace whatever is already stored
//! cargo run -p salesdesk-db --bin seed -- --file ./sales.json --clear
//!
//! # Specify database path
//! cargo run -p salesdesk-db --bin seed -- --db ./data/salesdesk.db
//! ```
//!
//! Rows that cannot be mapped are reported and skipped; the rest are
//! inserted in batches of 1000, one transaction per batch.

use anyhow::{bail, Context};
use salesdesk_core::ingest::{parse_document, ImportReport};
use salesdesk_core::sample::sample_records;
use salesdesk_db::{Database, DbConfig};
use std::env;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_PATH: &str = "./salesdesk.db";

/// How many rejected rows to print before summarizing.
const MAX_REPORTED_REJECTS: usize = 10;

struct Args {
    db_path: PathBuf,
    file: Option<PathBuf>,
    clear: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,salesdesk_db=info")),
        )
        .init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };

    println!("🌱 Salesdesk Seed / Import");
    println!("==========================");
    println!("Database: {}", args.db_path.display());
    match &args.file {
        Some(file) => println!("Source:   {}", file.display()),
        None => println!("Source:   built-in sample records"),
    }
    println!();

    let report = match &args.file {
        Some(file) => {
            let json = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            parse_document(&json).with_context(|| format!("parsing {}", file.display()))?
        }
        None => ImportReport {
            records: sample_records(),
            rejected: Vec::new(),
        },
    };

    println!(
        "✓ Mapped {} of {} rows",
        report.records.len(),
        report.total_rows()
    );
    for err in report.rejected.iter().take(MAX_REPORTED_REJECTS) {
        println!("  ⚠ {}", err);
    }
    if report.rejected.len() > MAX_REPORTED_REJECTS {
        println!(
            "  ... and {} more rejected rows",
            report.rejected.len() - MAX_REPORTED_REJECTS
        );
    }

    if report.records.is_empty() {
        println!("⚠ Nothing to import");
        return Ok(());
    }

    let db = Database::new(DbConfig::new(&args.db_path))
        .await
        .context("opening database")?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let repo = db.sales_records();
    let existing = repo.count().await?;
    if existing > 0 {
        if args.clear {
            let deleted = repo.clear().await?;
            println!("🗑  Cleared {} existing records", deleted);
        } else {
            println!("⚠ Database already has {} records", existing);
            println!("  Skipping import to avoid duplicates.");
            println!("  Re-run with --clear to replace them.");
            db.close().await;
            return Ok(());
        }
    }

    let start = Instant::now();
    let inserted = repo.insert_many(&report.records).await?;
    let elapsed = start.elapsed();

    println!();
    println!("✓ Inserted {} records in {:?}", inserted, elapsed);
    println!("  Total stored: {}", repo.count().await?);

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Returns `None` when `--help` was requested.
fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut args = Args {
        db_path: PathBuf::from(DEFAULT_DB_PATH),
        file: None,
        clear: false,
    };

    let mut argv = env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--db" | "-d" => match argv.next() {
                Some(path) => args.db_path = PathBuf::from(path),
                None => bail!("--db needs a path"),
            },
            "--file" | "-f" => match argv.next() {
                Some(path) => args.file = Some(PathBuf::from(path)),
                None => bail!("--file needs a path"),
            },
            "--clear" => args.clear = true,
            "--help" | "-h" => {
                println!("Salesdesk Seed / Import");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: {DEFAULT_DB_PATH})");
                println!("  -f, --file <PATH>   JSON export to import (default: built-in samples)");
                println!("      --clear         Delete existing records first");
                println!("  -h, --help          Show this help message");
                return Ok(None);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(Some(args))
}
