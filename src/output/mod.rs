//! Output module for writing harvested quotes
//!
//! Quotes are written once, at the end of the crawl, as a CSV file with a
//! `text,author,tags` header.

mod csv_writer;

pub use csv_writer::{parse_tags, read_records, render_tags, write_records};
