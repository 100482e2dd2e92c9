//! Lecture-Crawler main entry point
//!
//! This is the command-line interface for the Lecture-Crawler.

use anyhow::Context;
use clap::Parser;
use lecture_crawler::config::{load_config_with_hash, Config};
use lecture_crawler::crawler::{build_orchestrator, PassOutcome};
use lecture_crawler::output::{load_statistics, print_statistics};
use lecture_crawler::storage::open_storage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Lecture-Crawler: keeps a catalogue of published lecture recordings
///
/// Crawls the paginated recording listing, stores recordings it has not seen
/// before, and re-runs itself hourly during working hours.
#[derive(Parser, Debug)]
#[command(name = "lecture-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Catalogues published lecture recordings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Listing page the first pass starts from; scheduled passes start from 0
    #[arg(long, default_value_t = 0, value_name = "N")]
    start_page: u32,

    /// Run a single pass and exit without scheduling the next one
    #[arg(long, conflicts_with = "stats")]
    once: bool,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.stats {
        return handle_stats(&config);
    }

    if cli.once {
        config.crawler.schedule = false;
    }

    handle_crawl(config, cli.start_page, cli.once).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lecture_crawler=info,warn"),
            1 => EnvFilter::new("lecture_crawler=debug,info"),
            2 => EnvFilter::new("lecture_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let store = open_storage(Path::new(&config.storage.database_path))
        .context("failed to open recording database")?;
    let stats = load_statistics(&store).context("failed to load statistics")?;

    print_statistics(&stats);

    Ok(())
}

/// Handles the crawl: one pass, then (unless `once`) keep serving the schedule
async fn handle_crawl(config: Config, start_page: u32, once: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {}{} from page {}",
        config.site.base_url,
        config.site.start_path,
        start_page
    );

    let orchestrator = build_orchestrator(&config).context("failed to set up crawler")?;
    let outcome = orchestrator.clone().run(start_page).await;

    if once {
        return match outcome {
            PassOutcome::Completed(_) => Ok(()),
            PassOutcome::Failed(message) => Err(anyhow::anyhow!("pass failed: {}", message)),
        };
    }

    match orchestrator.scheduler().state().armed_until() {
        Some(fire_at) => tracing::info!(
            "Next pass at {}. Press Ctrl-C to stop",
            fire_at.format("%Y-%m-%d %H:%M")
        ),
        None => {
            tracing::info!("Scheduling is disabled in the configuration; exiting");
            return Ok(());
        }
    }
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    tracing::info!("Shutting down");
    Ok(())
}
