//! Crawl state definitions for the pagination driver
//!
//! Each active state carries the 1-based number of the page it concerns.

use std::fmt;

/// Represents the current state of the pagination loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Page `n` is about to be (or is being) requested
    Fetching(u32),

    /// Page `n` was fetched and its entries are being extracted
    Extracting(u32),

    /// Entries of page `n` were collected; looking for the next-page marker
    CheckingNext(u32),

    /// No further pages will be requested
    Stopped,
}

impl CrawlState {
    /// The state every crawl starts in
    pub const INITIAL: Self = Self::Fetching(1);

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// | From | To |
    /// |------|----|
    /// | `Fetching(n)` | `Extracting(n)`, `Stopped` |
    /// | `Extracting(n)` | `CheckingNext(n)` |
    /// | `CheckingNext(n)` | `Fetching(n + 1)`, `Stopped` |
    /// | `Stopped` | nothing |
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Fetching(a), Self::Extracting(b)) => a == b,
            (Self::Fetching(_), Self::Stopped) => true,
            (Self::Extracting(a), Self::CheckingNext(b)) => a == b,
            (Self::CheckingNext(a), Self::Fetching(b)) => a.checked_add(1) == Some(*b),
            (Self::CheckingNext(_), Self::Stopped) => true,
            _ => false,
        }
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetching(n) => write!(f, "fetching page {}", n),
            Self::Extracting(n) => write!(f, "extracting page {}", n),
            Self::CheckingNext(n) => write!(f, "checking for page after {}", n),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}
