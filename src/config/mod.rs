//! Configuration module for Quote-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so a crawl can run without one.
//!
//! # Example
//!
//! ```no_run
//! use quote_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, OutputConfig, SiteConfig, DEFAULT_BASE_URL, DEFAULT_OUTPUT_PATH,
    DEFAULT_PAGE_PATH, PAGE_PLACEHOLDER,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
