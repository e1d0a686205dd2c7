//! Embed-Scout main entry point
//!
//! This is the command-line interface for the Embed-Scout game harvester.

use anyhow::{bail, Context};
use clap::Parser;
use embed_scout::config::{load_config_with_hash, validate_category, Config};
use embed_scout::crawler::Harvester;
use embed_scout::logging::RunLog;
use embed_scout::model::GameDetail;
use embed_scout::output::{load_report, print_statistics, JsonOutputHandler};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Embed-Scout: a polite game catalogue harvester
///
/// Embed-Scout walks a game portal's category listings, enriches each game
/// with its detail page, keeps only the games that can be embedded in an
/// iframe, and writes one JSON report per category.
#[derive(Parser, Debug)]
#[command(name = "embed-scout")]
#[command(version = "1.0.0")]
#[command(about = "A polite game catalogue harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Categories to scrape, comma-separated (defaults to the config's list)
    #[arg(long, value_delimiter = ',')]
    category: Vec<String>,

    /// Listing pages per category (overrides max_pages)
    #[arg(long, value_name = "N")]
    pages: Option<u32>,

    /// Output file; only valid with a single category
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Skip detail and embed pages and keep every listed game
    #[arg(long)]
    no_iframes: bool,

    /// Print the configured categories and exit
    #[arg(long, conflicts_with = "stats")]
    list_categories: bool,

    /// Keep only the N best-rated games of each category
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Show statistics of an existing report and exit
    #[arg(long, value_name = "PATH", conflicts_with = "list_categories")]
    stats: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.stats {
        return handle_stats(path);
    }

    let (config, config_hash) = load_effective_config(&cli)?;

    if cli.list_categories {
        handle_list_categories(&config);
        return Ok(());
    }

    let categories = config.categories.clone();
    if cli.output.is_some() && categories.len() != 1 {
        bail!(
            "--output needs exactly one category, got {}",
            categories.len()
        );
    }

    let log = RunLog::open(&config.log_dir, cli.verbose, cli.quiet)
        .with_context(|| format!("Failed to open log directory {}", config.log_dir.display()))?;
    tracing::info!("Logging to {}", log.path().display());
    if let Some(hash) = &config_hash {
        tracing::info!("Configuration loaded (hash: {})", hash);
    }

    let outcome = handle_harvest(config, &categories, &cli).await;
    if let Err(e) = &outcome {
        tracing::error!("Run failed: {:#}", e);
    }

    log.close().context("Failed to close log file")?;
    let results = outcome?;

    print_summary(&results);
    Ok(())
}

/// Loads the config file and applies command-line overrides
///
/// A missing file is only tolerated at the default path, where it means
/// "use built-in defaults".
fn load_effective_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = if cli.config.exists() {
        let (config, hash) = load_config_with_hash(&cli.config)
            .with_context(|| format!("Failed to load {}", cli.config.display()))?;
        (config, Some(hash))
    } else if cli.config == Path::new(DEFAULT_CONFIG_PATH) {
        (Config::default(), None)
    } else {
        bail!("Config file not found: {}", cli.config.display());
    };

    if !cli.category.is_empty() {
        for category in &cli.category {
            validate_category(category)?;
        }
        config.categories = cli.category.clone();
    }

    if let Some(pages) = cli.pages {
        if pages < 1 {
            bail!("--pages must be >= 1");
        }
        config.max_pages = pages;
    }

    if cli.no_iframes {
        config.scrape_iframes = false;
    }

    Ok((config, hash))
}

/// Handles the --list-categories mode
fn handle_list_categories(config: &Config) {
    println!("Configured categories ({}):", config.categories.len());
    for category in &config.categories {
        println!("  - {}", category);
    }
}

/// Handles the --stats mode: shows statistics of a saved report
fn handle_stats(path: &Path) -> anyhow::Result<()> {
    let report =
        load_report(path).with_context(|| format!("Failed to read report {}", path.display()))?;
    print_statistics(&report);
    Ok(())
}

/// Handles the main harvest, racing it against Ctrl-C
async fn handle_harvest(
    config: Config,
    categories: &[String],
    cli: &Cli,
) -> anyhow::Result<BTreeMap<String, Vec<GameDetail>>> {
    tracing::info!(
        "Harvesting {} categories from {} (pages: {}, details: {})",
        categories.len(),
        config.base_url,
        config.max_pages,
        config.scrape_iframes
    );

    let sink = JsonOutputHandler::new(config.output_dir.clone())
        .with_explicit_path(cli.output.clone());
    let harvester = Harvester::new(config)?.with_top(cli.top);

    tokio::select! {
        results = harvester.run_categories(categories, &sink) => Ok(results?),
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            tracing::warn!("Interrupted by user");
            bail!("interrupted");
        }
    }
}

fn print_summary(results: &BTreeMap<String, Vec<GameDetail>>) {
    let total: usize = results.values().map(Vec::len).sum();

    println!("\n=== Harvest Complete ===\n");
    for (category, games) in results {
        println!("  {}: {} games", category, games.len());
    }
    println!("\n✓ {} games across {} categories", total, results.len());
}
