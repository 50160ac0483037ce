//! Crawler module for page fetching and quote extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching without retries
//! - HTML parsing and quote extraction
//! - The pagination loop

mod coordinator;
mod fetcher;
mod parser;
mod quote;

pub use coordinator::{Coordinator, CrawledPage};
pub use fetcher::{build_http_client, fetch_page, fetch_url, FetchResult};
pub use parser::{ParsedPage, QuoteParser};
pub use quote::{Quote, QUOTE_FIELDS};

use crate::config::Config;
use crate::output::write_records;
use crate::HarvestError;
use std::path::Path;

/// Runs a complete harvest
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client and page URL template
/// 2. Walk the listing pages until the next-page marker disappears or a fetch fails
/// 3. Write every collected quote to `output_path` in one go
///
/// A fetch failure only ends the crawl early; whatever was collected is still
/// written.
///
/// # Returns
///
/// * `Ok(Vec<Quote>)` - The quotes that were written
/// * `Err(HarvestError)` - A malformed entry or an output failure
pub async fn harvest(config: &Config, output_path: &Path) -> Result<Vec<Quote>, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    let quotes = coordinator.run().await?;

    write_records(&quotes, output_path)?;
    tracing::info!("Wrote {} quotes to {}", quotes.len(), output_path.display());

    Ok(quotes)
}
