//! Category-Census main entry point
//!
//! This is the command-line interface for the Category-Census crawler.

use category_census::config::{load_config_with_hash, Config};
use category_census::crawler::run_census;
use category_census::output::{print_statistics, tally, CsvTallySink, TallySink};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Category-Census: counts the items of an alphabetical category index
///
/// Crawls every alphabetic bucket of the category concurrently, stops each
/// crawl lane where the next bucket begins, and writes the number of
/// distinct items per leading letter to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "category-census")]
#[command(version)]
#[command(about = "Counts the items of an alphabetical category index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the tally CSV (overrides the configuration)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.tally_path = output.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_census(&config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("category_census=info,warn"),
            1 => EnvFilter::new("category_census=debug,info"),
            2 => EnvFilter::new("category_census=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Category-Census Dry Run ===\n");

    println!("Source:");
    println!("  Root index: {}", config.source.root_url);
    println!("  Base URL: {}", config.source.base_url);
    println!("  Index selector: {}", config.source.index_selector);
    println!("  Item selector: {}", config.source.item_selector);
    println!("  Next page label: {}", config.source.next_page_label);

    println!("\nCrawler:");
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    let [start, end] = config.crawler.excluded_lead_range;
    println!(
        "  Excluded leading code points: {}..={} ({:?}..={:?})",
        start,
        end,
        char::from_u32(start).unwrap_or('?'),
        char::from_u32(end).unwrap_or('?')
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Tally: {}", config.output.tally_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl: crawl, tally, write
async fn handle_census(config: &Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    tracing::info!("Starting census of {}", config.source.root_url);

    let report = match run_census(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Census failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Crawl finished, writing result...");
    let result = tally(&report.items);
    let sink = CsvTallySink::new(&config.output.tally_path);
    if let Err(e) = sink.write_tally(&result) {
        tracing::error!("Failed to write {}: {}", sink.describe(), e);
        return Err(e.into());
    }

    tracing::info!(
        "File saved: {} ({} letters, {} items)",
        sink.describe(),
        result.len(),
        result.total()
    );

    if !quiet {
        print_statistics(&report.stats);
    }

    tracing::info!(
        "Total run time: {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
