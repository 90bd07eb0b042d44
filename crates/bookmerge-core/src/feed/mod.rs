//! Parser for the book feed's plain-text object dump
//!
//! The feed publishes its volumes as a PHP-style object dump. Entries of the
//! top-level `[items] => Array` are introduced by a line indented with exactly
//! twelve spaces (`[N] => stdClass Object`); nested arrays are indented deeper
//! and so never split an entry. Fields are taken from the first match inside
//! each entry.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{BookmergeError, Result};
use crate::record::BookRecord;

/// Title given to entries that carry none
pub const MISSING_TITLE: &str = "No Title";

const ITEMS_MARKER: &str = "[items] => Array";

lazy_static! {
    static ref ENTRY_START: Regex =
        Regex::new(r"\n {12}\[\d+\] => stdClass Object\s*\(").unwrap();
    static ref TITLE: Regex = Regex::new(r"\[title\] => ([^\n]+)").unwrap();
    static ref AUTHORS: Regex = Regex::new(r"(?s)\[authors\] => Array\s*\((.*?)\)").unwrap();
    static ref ARRAY_ITEM: Regex = Regex::new(r"\[\d+\] => ([^\n]+)").unwrap();
    static ref DESCRIPTION: Regex =
        Regex::new(r"(?s)\[description\] => (.*?)\n\s*\[industryIdentifiers\]").unwrap();
    static ref THUMBNAIL: Regex = Regex::new(r"\[thumbnail\] => (http[^\n]+)").unwrap();
    static ref LANGUAGE: Regex = Regex::new(r"\[language\] => ([^\n]+)").unwrap();
    static ref PUBLISHED_DATE: Regex = Regex::new(r"\[publishedDate\] => ([^\n]+)").unwrap();
    static ref ISBN_13: Regex =
        Regex::new(r"\[type\] => ISBN_13\s+\[identifier\] => ([^\n]+)").unwrap();
}

/// Parse every top-level entry of a feed dump into a record.
///
/// Fails only when the dump has no `[items] => Array` section; individual
/// entries with missing fields yield empty values.
pub fn parse_feed_dump(text: &str) -> Result<Vec<BookRecord>> {
    let start = text.find(ITEMS_MARKER).ok_or_else(|| {
        BookmergeError::InvalidInput(format!("feed dump has no `{}` section", ITEMS_MARKER))
    })?;
    let items = &text[start..];

    let starts: Vec<usize> = ENTRY_START.find_iter(items).map(|m| m.start()).collect();
    let records: Vec<BookRecord> = starts
        .iter()
        .enumerate()
        .map(|(i, &from)| {
            let to = starts.get(i + 1).copied().unwrap_or(items.len());
            parse_entry(i, &items[from..to])
        })
        .collect();

    tracing::info!("Found {} books in feed dump", records.len());
    Ok(records)
}

fn parse_entry(index: usize, entry: &str) -> BookRecord {
    let title = first_capture(&TITLE, entry).unwrap_or_else(|| {
        tracing::warn!("Feed entry #{} has no title", index);
        MISSING_TITLE.to_string()
    });

    let authors = AUTHORS
        .captures(entry)
        .and_then(|caps| caps.get(1))
        .map(|block| {
            ARRAY_ITEM
                .captures_iter(block.as_str())
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    BookRecord {
        title,
        authors,
        description: first_capture(&DESCRIPTION, entry).unwrap_or_default(),
        thumbnail: first_capture(&THUMBNAIL, entry).unwrap_or_default(),
        language: first_capture(&LANGUAGE, entry).unwrap_or_default(),
        published_date: first_capture(&PUBLISHED_DATE, entry).unwrap_or_default(),
        isbn13: first_capture(&ISBN_13, entry).unwrap_or_default(),
    }
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
