//! Quote-Harvest main entry point
//!
//! This is the command-line interface for the Quote-Harvest scraper.

use clap::Parser;
use quote_harvest::config::{load_config_with_hash, validate, Config};
use quote_harvest::crawler::harvest;
use quote_harvest::url::PageUrlBuilder;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quote-Harvest: a paginated quote scraper
///
/// Walks the numbered listing pages of a quote site until the "next" link
/// disappears, then writes every quote to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "quote-harvest")]
#[command(version)]
#[command(about = "A paginated quote scraper", long_about = None)]
struct Cli {
    /// Path of the CSV file to write [default: quotes.csv]
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the site's base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved configuration and first page URL without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let output = PathBuf::from(&config.output.path);
    match harvest(&config, &output).await {
        Ok(quotes) => {
            tracing::info!("Harvest completed: {} quotes", quotes.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quote_harvest=info,warn"),
            1 => EnvFilter::new("quote_harvest=debug,info"),
            2 => EnvFilter::new("quote_harvest=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.site.base_url = base_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.to_string_lossy().into_owned();
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let pages = PageUrlBuilder::from_config(&config.site)?;

    println!("=== Quote-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Page path: {}", config.site.page_path);
    println!("  First page: {}", pages.page_url(1)?);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    match config.http.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.path);

    println!("\n✓ Configuration is valid");

    Ok(())
}
