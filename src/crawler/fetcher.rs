//! HTTP fetcher implementation
//!
//! One GET per listing page. Failures are classified, logged, and turned into
//! "no content"; nothing is retried.

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// No timeout is applied unless `request_timeout_secs` is set, so a hung
/// request hangs the crawl.
///
/// # Example
///
/// ```no_run
/// use quote_harvest::config::HttpConfig;
/// use quote_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx, body read | `Success` |
/// | HTTP non-2xx | `HttpError` |
/// | Timeout, connection refused, DNS, TLS, body read failure | `NetworkError` |
///
/// The body is decoded with the charset from the `Content-Type` header,
/// falling back to UTF-8; undecodable bytes become U+FFFD. A `<meta charset>`
/// declaration inside the document is not consulted.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                format!("Request timeout: {}", e)
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Fetches a listing page, returning its body or `None` on any failure
///
/// Failures are reported with a warning and never raised to the caller.
pub async fn fetch_page(client: &Client, url: &str) -> Option<String> {
    match fetch_url(client, url).await {
        FetchResult::Success {
            final_url,
            status_code,
            body,
        } => {
            tracing::debug!(
                "Fetched {} (HTTP {}, {} bytes)",
                final_url,
                status_code,
                body.len()
            );
            Some(body)
        }
        FetchResult::HttpError { status_code } => {
            tracing::warn!("Content does not exist: HTTP {} for {}", status_code, url);
            None
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Content does not exist: {} ({})", error, url);
            None
        }
    }
}
