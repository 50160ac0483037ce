//! Crawler coordinator - the pagination loop
//!
//! The coordinator walks listing pages 1, 2, 3, ... one at a time:
//! - fetch page `n`; a failed fetch stops the crawl
//! - extract the quotes on it
//! - look for the next-page marker; continue with `n + 1` or stop
//!
//! Pages are produced lazily through [`Coordinator::next_page`];
//! [`Coordinator::run`] drains them into the accumulator.

use crate::config::{validate, Config};
use crate::crawler::parser::QuoteParser;
use crate::crawler::quote::Quote;
use crate::crawler::{build_http_client, fetch_page};
use crate::state::CrawlState;
use crate::url::PageUrlBuilder;
use crate::HarvestError;
use reqwest::Client;
use url::Url;

/// One processed listing page
#[derive(Debug, Clone)]
pub struct CrawledPage {
    /// 1-based page number
    pub number: u32,

    /// URL the page was requested from
    pub url: Url,

    /// Quotes found on the page, in document order
    pub quotes: Vec<Quote>,

    /// Whether the page carried a next-page marker
    pub has_next: bool,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    client: Client,
    pages: PageUrlBuilder,
    parser: QuoteParser,
    state: CrawlState,
    pages_processed: u32,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to fetch page 1
    /// * `Err(HarvestError::Config)` - The configuration failed validation
    /// * `Err(HarvestError)` - The HTTP client or selectors could not be built
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        validate(config)?;

        let client = build_http_client(&config.http)?;
        let pages = PageUrlBuilder::from_config(&config.site)?;
        Self::with_client(client, pages)
    }

    /// Creates a coordinator around an existing HTTP client
    pub fn with_client(client: Client, pages: PageUrlBuilder) -> Result<Self, HarvestError> {
        Ok(Self {
            client,
            pages,
            parser: QuoteParser::new()?,
            state: CrawlState::INITIAL,
            pages_processed: 0,
        })
    }

    /// Returns the current crawl state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Returns the number of pages fetched and extracted so far
    pub fn pages_processed(&self) -> u32 {
        self.pages_processed
    }

    /// Restarts the page sequence from page 1
    pub fn reset(&mut self) {
        self.state = CrawlState::INITIAL;
        self.pages_processed = 0;
    }

    /// Produces the next listing page, or `None` once the crawl has stopped
    ///
    /// A fetch failure stops the crawl without yielding the failed page.
    ///
    /// # Errors
    ///
    /// A malformed entry aborts the crawl with `HarvestError::MalformedEntry`
    /// and leaves the coordinator in `Extracting`. Further calls then fail with
    /// `HarvestError::InvalidTransition` until [`Coordinator::reset`].
    pub async fn next_page(&mut self) -> Result<Option<CrawledPage>, HarvestError> {
        if self.state.is_terminal() {
            return Ok(None);
        }

        let CrawlState::Fetching(number) = self.state else {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: CrawlState::Stopped,
            });
        };

        let url = self.pages.page_url(number)?;
        tracing::debug!("Fetching page {}: {}", number, url);

        let body = match fetch_page(&self.client, url.as_str()).await {
            Some(body) => body,
            None => {
                tracing::info!("Stopping crawl: page {} could not be fetched", number);
                self.transition(CrawlState::Stopped)?;
                return Ok(None);
            }
        };

        self.transition(CrawlState::Extracting(number))?;
        let parsed = self.parser.parse_page(&body)?;
        tracing::debug!("Page {}: {} quote(s)", number, parsed.quotes.len());

        self.transition(CrawlState::CheckingNext(number))?;
        self.pages_processed += 1;
        tracing::info!("Progress: {} page(s) processed", self.pages_processed);

        let next = match (parsed.has_next, number.checked_add(1)) {
            (true, Some(following)) => CrawlState::Fetching(following),
            _ => CrawlState::Stopped,
        };
        self.transition(next)?;

        Ok(Some(CrawledPage {
            number,
            url,
            quotes: parsed.quotes,
            has_next: parsed.has_next,
        }))
    }

    /// Runs the crawl to completion and returns every quote collected
    ///
    /// Quotes are ordered by page, then by position on the page.
    pub async fn run(&mut self) -> Result<Vec<Quote>, HarvestError> {
        tracing::info!("Starting crawl at {}", self.pages.base());

        let start_time = std::time::Instant::now();
        let mut quotes = Vec::new();

        while let Some(page) = self.next_page().await? {
            quotes.extend(page.quotes);
        }

        tracing::info!(
            "Crawl completed: {} pages, {} quotes in {:?}",
            self.pages_processed,
            quotes.len(),
            start_time.elapsed()
        );

        Ok(quotes)
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(&next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("{} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}
