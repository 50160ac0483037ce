//! HTML parser for extracting quotes and the next-page marker
//!
//! The page shape is fixed:
//! - each entry is an element with class `quote`
//! - inside it, exactly one `.text` and one `.author`, plus zero or more `.tag`
//! - an element with class `next` anywhere on the page means more pages follow

use crate::crawler::quote::Quote;
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};

const ENTRY_SELECTOR: &str = ".quote";
const TEXT_SELECTOR: &str = ".text";
const AUTHOR_SELECTOR: &str = ".author";
const TAG_SELECTOR: &str = ".tag";
const NEXT_SELECTOR: &str = ".next";

/// Everything extracted from one listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    /// Quotes in document order
    pub quotes: Vec<Quote>,

    /// Whether a next-page marker is present
    pub has_next: bool,
}

/// Compiled selectors for the listing page shape
#[derive(Debug, Clone)]
pub struct QuoteParser {
    entry: Selector,
    text: Selector,
    author: Selector,
    tag: Selector,
    next: Selector,
}

impl QuoteParser {
    /// Compiles the fixed selectors
    pub fn new() -> Result<Self, HarvestError> {
        Ok(Self {
            entry: compile(ENTRY_SELECTOR)?,
            text: compile(TEXT_SELECTOR)?,
            author: compile(AUTHOR_SELECTOR)?,
            tag: compile(TAG_SELECTOR)?,
            next: compile(NEXT_SELECTOR)?,
        })
    }

    /// Parses a page once and extracts both the quotes and the next-page flag
    pub fn parse_page(&self, html: &str) -> Result<ParsedPage, HarvestError> {
        let document = Html::parse_document(html);

        Ok(ParsedPage {
            quotes: self.quotes_in(&document)?,
            has_next: self.next_in(&document),
        })
    }

    /// Extracts one quote per entry, in document order
    ///
    /// A page with no entries yields an empty vector.
    ///
    /// # Errors
    ///
    /// `HarvestError::MalformedEntry` if any entry does not contain exactly
    /// one `.text` element and exactly one `.author` element.
    ///
    /// # Example
    ///
    /// ```
    /// use quote_harvest::crawler::QuoteParser;
    ///
    /// let html = r#"<div class="quote">
    ///     <span class="text">Hello</span>
    ///     <small class="author">World</small>
    ///     <a class="tag">greeting</a>
    /// </div>"#;
    /// let quotes = QuoteParser::new().unwrap().extract_records(html).unwrap();
    /// assert_eq!(quotes[0].author, "World");
    /// assert_eq!(quotes[0].tags, vec!["greeting".to_string()]);
    /// ```
    pub fn extract_records(&self, html: &str) -> Result<Vec<Quote>, HarvestError> {
        self.quotes_in(&Html::parse_document(html))
    }

    /// Reports whether the page has a next-page marker
    pub fn has_next_page(&self, html: &str) -> bool {
        self.next_in(&Html::parse_document(html))
    }

    fn quotes_in(&self, document: &Html) -> Result<Vec<Quote>, HarvestError> {
        document
            .select(&self.entry)
            .enumerate()
            .map(|(index, entry)| self.parse_entry(index, entry))
            .collect()
    }

    fn next_in(&self, document: &Html) -> bool {
        document.select(&self.next).next().is_some()
    }

    fn parse_entry(&self, index: usize, entry: ElementRef<'_>) -> Result<Quote, HarvestError> {
        let text = single_text(entry, &self.text, index, "text")?;
        let author = single_text(entry, &self.author, index, "author")?;
        let tags = entry.select(&self.tag).map(element_text).collect();

        Ok(Quote { text, author, tags })
    }
}

/// Returns the text of the only element matching `selector` inside `entry`
fn single_text(
    entry: ElementRef<'_>,
    selector: &Selector,
    index: usize,
    field: &'static str,
) -> Result<String, HarvestError> {
    let mut matches = entry.select(selector);

    match (matches.next(), matches.count()) {
        (Some(element), 0) => Ok(element_text(element)),
        (first, rest) => Err(HarvestError::MalformedEntry {
            index,
            field,
            found: usize::from(first.is_some()) + rest,
        }),
    }
}

/// Concatenates all descendant text nodes, untrimmed
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn compile(css: &str) -> Result<Selector, HarvestError> {
    Selector::parse(css).map_err(|e| HarvestError::Selector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}
