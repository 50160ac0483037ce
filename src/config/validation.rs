use crate::config::types::{Config, HttpConfig, OutputConfig, SiteConfig, PAGE_PLACEHOLDER};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use HTTP or HTTPS scheme",
            config.base_url
        )));
    }

    if !config.page_path.contains(PAGE_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "page-path must contain the {} placeholder, got '{}'",
            PAGE_PLACEHOLDER, config.page_path
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
