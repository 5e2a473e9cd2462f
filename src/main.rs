//! Command-line interface for oltp-bench
//!
//! # Usage Examples
//!
//! ```bash
//! # Load usertable with Zipfian keys, 500 rows per commit
//! oltp-bench load \
//!   --catalog tests/fixtures/ycsb_catalog.yaml \
//!   --config tests/fixtures/ycsb_loader.yaml \
//!   --commit-count 500
//!
//! # Print the planned record and batch counts only
//! oltp-bench load --catalog tests/fixtures/ycsb_catalog.yaml \
//!   --table usertable --record-count 1000 --scale-factor 2.5 --dry-run
//!
//! # Top 20 keys of a focused Zipfian distribution
//! oltp-bench sample --distribution focused-zipfian --max 9999 --num 3 --denom 4 --top 20
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use oltp_bench::{run_load, run_sample, LoadReport, SampleArgs};
use oltp_loader::CommonLoadArgs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "oltp-bench")]
#[command(about = "Skewed key distributions and batched table loading for OLTP benchmarks")]
#[command(long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unload the catalog tables, then load one table into the in-memory sink
    Load {
        #[command(flatten)]
        args: CommonLoadArgs,
    },

    /// Draw values from a key distribution and print a frequency summary
    Sample {
        #[command(flatten)]
        args: SampleArgs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Yaml,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize logging, defaulting to info
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Load { args } => {
            let stop = Arc::new(AtomicBool::new(false));
            let signal = stop.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupted, stopping after the current batch");
                    signal.store(true, Ordering::Release);
                }
            });

            let report = run_load(&args, stop).await?;
            match cli.format {
                OutputFormat::Text => print_load_report(&report),
                OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
            }
        }
        Commands::Sample { args } => {
            let summary = run_sample(&args)?;
            match cli.format {
                OutputFormat::Text => print!("{summary}"),
                OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&summary)?),
            }
        }
    }

    Ok(())
}

fn print_load_report(report: &LoadReport) {
    if report.dry_run {
        println!(
            "Dry run: {} records into '{}' in {} batches of up to {} ({} keys)",
            report.record_count,
            report.table,
            report.planned_batches,
            report.commit_count,
            report.key_distribution
        );
        return;
    }

    println!(
        "Loaded {} rows into '{}' in {} batches ({:.3}s, {:.2} rows/sec)",
        report.rows_inserted,
        report.table,
        report.batches,
        report.total_seconds,
        report.rows_per_second
    );
    if report.deleted_rows > 0 {
        println!("Deleted {} existing rows first", report.deleted_rows);
    }
    println!("Table counts:");
    for (table, count) in &report.table_counts {
        println!("  {table}: {count}");
    }
}
