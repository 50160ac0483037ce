//! Page URL construction
//!
//! Listing pages are addressed as `{base_url}` joined with the configured page
//! path template, where `{page}` is replaced by the 1-based page number.

use crate::config::{SiteConfig, PAGE_PLACEHOLDER};
use crate::ConfigError;
use url::Url;

/// Builds the URL of each numbered listing page
#[derive(Debug, Clone)]
pub struct PageUrlBuilder {
    base: Url,
    page_path: String,
}

impl PageUrlBuilder {
    /// Creates a builder from a base URL and a page path template
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the listing, e.g. "https://quotes.toscrape.com"
    /// * `page_path` - Template containing `{page}`, e.g. "page/{page}/"
    ///
    /// A template without the placeholder would address the same page for
    /// every number, so it is rejected.
    pub fn new(base_url: &str, page_path: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e))
        })?;

        if !page_path.contains(PAGE_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "page-path must contain the {} placeholder, got '{}'",
                PAGE_PLACEHOLDER, page_path
            )));
        }

        Ok(Self {
            base,
            page_path: page_path.to_string(),
        })
    }

    /// Creates a builder from the site section of the configuration
    pub fn from_config(site: &SiteConfig) -> Result<Self, ConfigError> {
        Self::new(&site.base_url, &site.page_path)
    }

    /// Returns the URL for the given page number
    ///
    /// The path is resolved against the base with standard relative
    /// reference rules, so a template starting with `/` replaces the base path.
    ///
    /// # Example
    ///
    /// ```
    /// use quote_harvest::url::PageUrlBuilder;
    ///
    /// let builder = PageUrlBuilder::new("https://quotes.toscrape.com", "page/{page}/").unwrap();
    /// assert_eq!(
    ///     builder.page_url(3).unwrap().as_str(),
    ///     "https://quotes.toscrape.com/page/3/"
    /// );
    /// ```
    pub fn page_url(&self, page: u32) -> Result<Url, url::ParseError> {
        let path = self.page_path.replace(PAGE_PLACEHOLDER, &page.to_string());
        self.base.join(&path)
    }

    /// Returns the base URL
    pub fn base(&self) -> &Url {
        &self.base
    }
}
