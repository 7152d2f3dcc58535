use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use support_ledger::api::{AppState, create_router};
use support_ledger::config::ConfigLoader;
use support_ledger::ingest::{
    Dataset, RecordCounts, read_assignments_from_path, read_employees_from_path,
    read_events_from_path, read_holidays_from_path,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "support-ledger")]
#[command(about = "Event support coverage and travel allowance reporting server")]
struct Args {
    /// Allowance configuration directory; the built-in policy is used when omitted
    #[arg(long, env = "SUPPORT_LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "SUPPORT_LEDGER_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// CSV of events to preload into the held dataset
    #[arg(long)]
    events: Option<PathBuf>,

    /// CSV of employees to preload into the held dataset
    #[arg(long)]
    employees: Option<PathBuf>,

    /// CSV of support assignments to preload into the held dataset
    #[arg(long)]
    assignments: Option<PathBuf>,

    /// CSV of declared holidays to preload into the held dataset
    #[arg(long)]
    holidays: Option<PathBuf>,
}

fn log_counts(kind: &str, counts: &RecordCounts) {
    tracing::info!(
        kind,
        accepted = counts.accepted,
        skipped = counts.skipped,
        duplicates = counts.duplicates,
        "Preloaded records"
    );
}

/// Reads the CSV files named on the command line.
fn preload(args: &Args) -> Result<Dataset> {
    let mut dataset = Dataset::default();

    // Employees first so event hosts can be resolved.
    if let Some(path) = &args.employees {
        let (employees, counts) =
            read_employees_from_path(path).context("Failed to import employees")?;
        log_counts("employees", &counts);
        dataset.employees = employees;
    }
    if let Some(path) = &args.events {
        let (events, counts) = read_events_from_path(path, &dataset.employees)
            .context("Failed to import events")?;
        log_counts("events", &counts);
        dataset.events = events;
    }
    if let Some(path) = &args.assignments {
        let (assignments, counts) =
            read_assignments_from_path(path).context("Failed to import support assignments")?;
        log_counts("assignments", &counts);
        dataset.assignments = assignments;
    }
    if let Some(path) = &args.holidays {
        let (holidays, counts) =
            read_holidays_from_path(path).context("Failed to import holidays")?;
        log_counts("holidays", &counts);
        dataset.holidays = holidays;
    }

    Ok(dataset)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = match &args.config {
        Some(dir) => ConfigLoader::load(dir)
            .with_context(|| format!("Failed to load configuration from {}", dir.display()))?,
        None => {
            tracing::info!("No configuration directory given; using built-in policy");
            ConfigLoader::builtin()
        }
    };

    let dataset = preload(&args)?;

    let router = create_router(AppState::with_dataset(config, dataset));

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    tracing::info!(addr = %args.bind, "Listening");

    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}
