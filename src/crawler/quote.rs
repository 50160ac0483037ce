//! The record extracted from each quote block

use std::fmt;

/// Column names of a quote, in output order
pub const QUOTE_FIELDS: [&str; 3] = ["text", "author", "tags"];

/// One quote extracted from a listing page
///
/// Field order matches [`QUOTE_FIELDS`] and the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// The quoted text, as it appears on the page
    pub text: String,

    /// Who the quote is attributed to
    pub author: String,

    /// Category labels in document order; may be empty
    pub tags: Vec<String>,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            tags,
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Tags: {:?}", self.tags)?;
        writeln!(f, "{}", self.text)
    }
}
