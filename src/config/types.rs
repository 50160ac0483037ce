use serde::Deserialize;

/// Default site crawled when no configuration is supplied
pub const DEFAULT_BASE_URL: &str = "https://quotes.toscrape.com";

/// Default page path template, relative to the base URL
pub const DEFAULT_PAGE_PATH: &str = "page/{page}/";

/// Placeholder replaced by the page number in `page-path`
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Default CSV output path
pub const DEFAULT_OUTPUT_PATH: &str = "quotes.csv";

/// Main configuration structure for Quote-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root of the listing, e.g. "https://quotes.toscrape.com"
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Path of page N relative to the base URL; must contain `{page}`
    #[serde(rename = "page-path", default = "default_page_path")]
    pub page_path: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds. Requests never time out when unset.
    #[serde(rename = "request-timeout-secs", default)]
    pub request_timeout_secs: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV file written at the end of the crawl
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_path: default_page_path(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_path() -> String {
    DEFAULT_PAGE_PATH.to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}
