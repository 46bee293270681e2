//! Sumi-Shelf main entry point
//!
//! This is the command-line interface for the Sumi-Shelf catalog crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_shelf::config::{load_config_with_hash, Config};
use sumi_shelf::crawler::Coordinator;
use sumi_shelf::output::{
    clean_records, generate_markdown_summary, load_dataset, print_statistics, write_csv,
    DashboardMetrics, DatasetFilter, DatasetStatistics,
};
use sumi_shelf::storage::{open_storage, SqliteStorage, Storage};
use tracing_subscriber::EnvFilter;

/// Sumi-Shelf: A polite catalog crawler
///
/// Sumi-Shelf walks a paginated book catalog category by category, visits
/// every item's detail page, and turns the result into CSV exports, a SQLite
/// document collection and a markdown summary.
#[derive(Parser, Debug)]
#[command(name = "sumi-shelf")]
#[command(version = "1.0.0")]
#[command(about = "A polite catalog crawler", long_about = None)]
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

    /// Validate config and print it without crawling
    #[arg(long, conflicts_with_all = ["stats", "export_summary", "dashboard"])]
    dry_run: bool,

    /// Show statistics of the stored collection and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary", "dashboard"])]
    stats: bool,

    /// Regenerate the markdown summary from the stored collection and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "dashboard"])]
    export_summary: bool,

    /// Show a filtered view of the dataset and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "export_summary"])]
    dashboard: bool,

    /// Restrict the dashboard to these genres (repeatable)
    #[arg(long = "genre", value_name = "GENRE", requires = "dashboard")]
    genres: Vec<String>,

    /// Lowest price shown on the dashboard (inclusive)
    #[arg(long, requires = "dashboard")]
    min_price: Option<f64>,

    /// Highest price shown on the dashboard (inclusive)
    #[arg(long, requires = "dashboard")]
    max_price: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else if cli.dashboard {
        let filter = DatasetFilter {
            genres: cli.genres,
            min_price: cli.min_price,
            max_price: cli.max_price,
        };
        handle_dashboard(&config, &filter);
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_shelf=info,warn"),
            1 => EnvFilter::new("sumi_shelf=debug,info"),
            2 => EnvFilter::new("sumi_shelf=trace,debug"),
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

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Shelf Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root URL: {}", config.crawler.root_url);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Detail delay: {}ms", config.crawler.detail_delay_ms);
    println!("  Detail path prefix: {}", config.crawler.detail_path_prefix);

    println!("\nSelectors:");
    println!("  Categories: {}", config.selectors.categories);
    println!("  Item: {}", config.selectors.item);
    println!("  Item title: {}", config.selectors.item_title);
    println!("  Item price: {}", config.selectors.item_price);
    println!("  Next page: {}", config.selectors.next_page);
    println!("  Detail description: {}", config.selectors.detail_description);

    println!("\nOutput:");
    println!("  Raw CSV: {}", config.output.raw_csv_path);
    println!("  Cleaned CSV: {}", config.output.cleaned_csv_path);
    println!(
        "  Database: {} (collection '{}')",
        config.output.database_path, config.output.collection
    );
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics of the stored collection
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::open_existing(Path::new(&config.output.database_path))
        .context("failed to open document store")?;
    let records = storage.load_collection(&config.output.collection)?;

    if let Some(load) = storage.latest_load(&config.output.collection)? {
        println!(
            "Last load: {} ({} documents, config {})\n",
            load.loaded_at, load.document_count, load.config_hash
        );
    }

    print_statistics(&DatasetStatistics::from_records(&records));
    Ok(())
}

/// Handles the --export-summary mode: regenerates the markdown summary
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Catalog Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = SqliteStorage::open_existing(Path::new(&config.output.database_path))
        .context("failed to open document store")?;

    tracing::info!("Loading collection '{}'...", config.output.collection);
    let records = storage.load_collection(&config.output.collection)?;
    let stats = DatasetStatistics::from_records(&records);

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&stats, None, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);
    Ok(())
}

/// Handles the --dashboard mode: filtered metrics over the dataset
fn handle_dashboard(config: &Config, filter: &DatasetFilter) {
    let source = load_dataset(
        Path::new(&config.output.database_path),
        &config.output.collection,
        Path::new(&config.output.cleaned_csv_path),
    );

    println!("=== Book Catalog Dashboard ===\n");
    println!("Source: {}", source.label());

    if source.records().is_empty() {
        println!("No data available. Run a crawl first.");
        return;
    }

    let filtered = filter.apply(source.records());
    let metrics = DashboardMetrics::from_records(&filtered);

    println!("  Total books: {}", metrics.total_books);
    println!("  Average price: £{:.2}", metrics.average_price);
    println!("  Unique genres: {}", metrics.unique_genres);
    println!();

    let stats = DatasetStatistics::from_records(&filtered);
    for genre in stats.genres_by_count() {
        println!(
            "  {:<24} {:>5}  mean £{:.2}  median £{:.2}",
            genre.genre, genre.count, genre.mean_price, genre.median_price
        );
    }
}

/// Handles the main crawl operation and every export that follows it
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;

    tracing::info!("Starting crawl of {}", coordinator.root_url());
    let (result, report) = match coordinator.crawl_with_report().await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            println!("No data collected.");
            return Ok(());
        }
    };

    if result.is_empty() {
        println!("No data collected.");
        return Ok(());
    }

    let raw = result.into_records();
    let raw_path = Path::new(&config.output.raw_csv_path);
    write_csv(raw_path, &raw).with_context(|| format!("failed to write {}", raw_path.display()))?;
    tracing::info!("Saved {} raw records to {}", raw.len(), raw_path.display());

    let cleaned = clean_records(&raw);
    let cleaned_path = Path::new(&config.output.cleaned_csv_path);
    write_csv(cleaned_path, &cleaned)
        .with_context(|| format!("failed to write {}", cleaned_path.display()))?;
    tracing::info!("Saved cleaned records to {}", cleaned_path.display());

    // A store failure leaves the CSV exports as the dataset of record
    match open_storage(Path::new(&config.output.database_path)) {
        Ok(mut storage) => {
            match storage.replace_collection(&config.output.collection, &cleaned, config_hash) {
                Ok(count) => tracing::info!(
                    "Loaded {} documents into '{}'",
                    count,
                    config.output.collection
                ),
                Err(e) => tracing::error!("Failed to load document store: {}", e),
            }
        }
        Err(e) => tracing::error!("Failed to open document store: {}", e),
    }

    let stats = DatasetStatistics::from_records(&cleaned);
    print_statistics(&stats);

    let summary_path = Path::new(&config.output.summary_path);
    generate_markdown_summary(&stats, Some(&report), summary_path)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    println!("\n✓ Summary exported to: {}", summary_path.display());

    Ok(())
}
