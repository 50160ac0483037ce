//! State module for tracking crawl progress
//!
//! The pagination driver is a small state machine; `CrawlState` names its
//! states and decides which transitions are legal.

mod crawl_state;

pub use crawl_state::CrawlState;
