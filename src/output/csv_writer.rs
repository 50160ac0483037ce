use crate::crawler::{Quote, QUOTE_FIELDS};
use crate::HarvestError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Writes quotes to a CSV file, replacing any existing file
///
/// The first row is the header `text,author,tags`; each quote follows as one
/// row. The tag list is rendered into a single cell by [`render_tags`].
/// Fields are quoted only when they contain a delimiter, quote, or newline.
///
/// Rows go to a `<path>.partial` sibling first, which is renamed over `path`
/// once everything is flushed. A failed write never leaves a truncated file
/// at `path`.
///
/// # Errors
///
/// Any I/O failure is returned as-is and is fatal; no recovery is attempted.
pub fn write_records(quotes: &[Quote], path: &Path) -> Result<(), HarvestError> {
    let staging = staging_path(path);

    let result = write_rows(quotes, &staging)
        .and_then(|()| std::fs::rename(&staging, path).map_err(HarvestError::from));
    if result.is_err() {
        let _ = std::fs::remove_file(&staging);
    }

    result
}

fn write_rows(quotes: &[Quote], path: &Path) -> Result<(), HarvestError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(QUOTE_FIELDS)?;
    for quote in quotes {
        writer.write_record([
            quote.text.as_str(),
            quote.author.as_str(),
            render_tags(&quote.tags).as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// `quotes.csv` -> `quotes.csv.partial`
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".partial");
    PathBuf::from(name)
}

/// Reads a file produced by [`write_records`] back into quotes
pub fn read_records(path: &Path) -> Result<Vec<Quote>, HarvestError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?;
    if headers.iter().ne(QUOTE_FIELDS) {
        return Err(HarvestError::InvalidRecord {
            line: 1,
            message: format!("unexpected header {:?}", headers),
        });
    }

    let mut quotes = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());

        let (Some(text), Some(author), Some(tags)) = (record.get(0), record.get(1), record.get(2))
        else {
            return Err(HarvestError::InvalidRecord {
                line,
                message: format!(
                    "expected {} fields, found {}",
                    QUOTE_FIELDS.len(),
                    record.len()
                ),
            });
        };

        let tags = parse_tags(tags).ok_or_else(|| HarvestError::InvalidRecord {
            line,
            message: format!("unreadable tags cell {:?}", tags),
        })?;

        quotes.push(Quote::new(text, author, tags));
    }

    Ok(quotes)
}

/// Renders a tag list into one cell, e.g. `["life", "inspirational"]`
pub fn render_tags(tags: &[String]) -> String {
    format!("{:?}", tags)
}

/// Parses a cell produced by [`render_tags`]
///
/// Returns `None` if the cell is not a bracketed list of double-quoted,
/// comma-separated strings using Rust debug escapes.
pub fn parse_tags(cell: &str) -> Option<Vec<String>> {
    let inner = cell.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut tags = Vec::new();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        match chars.next() {
            None if tags.is_empty() => return Some(tags),
            Some('"') => {}
            _ => return None,
        }

        let mut tag = String::new();
        loop {
            match chars.next()? {
                '"' => break,
                '\\' => tag.push(unescape(&mut chars)?),
                c => tag.push(c),
            }
        }
        tags.push(tag);

        match chars.next() {
            None => return Some(tags),
            Some(',') => {}
            _ => return None,
        }
    }
}

/// Decodes the character following a backslash in a debug-rendered string
fn unescape(chars: &mut impl Iterator<Item = char>) -> Option<char> {
    match chars.next()? {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '0' => Some('\0'),
        c @ ('\\' | '"' | '\'') => Some(c),
        'u' => {
            if chars.next()? != '{' {
                return None;
            }
            let hex: String = chars.take_while(|&c| c != '}').collect();
            char::from_u32(u32::from_str_radix(&hex, 16).ok()?)
        }
        _ => None,
    }
}
