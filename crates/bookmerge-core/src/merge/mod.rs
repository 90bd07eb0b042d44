//! Merge policy for a cluster of editions
//!
//! The first edition is the base. Each remaining field choice is an independent
//! reducer over the whole cluster:
//!
//! - publication date: lexicographically smallest non-empty value
//! - description: longest (by characters), first one wins ties
//! - thumbnail: first non-empty
//! - everything else: base edition

use std::borrow::Borrow;

use crate::record::{BookRecord, MergedEdition, MergedRecord};

/// Title recorded for an edition that has none
const UNKNOWN_TITLE: &str = "Unknown";

/// Merge a cluster of editions (in input order) into one record.
///
/// A single edition passes through unchanged with no edition list.
pub fn consolidate_editions<R: Borrow<BookRecord>>(editions: &[R]) -> MergedRecord {
    let Some(base) = editions.first() else {
        return MergedRecord::default();
    };

    let mut merged = base.borrow().clone();
    if editions.len() == 1 {
        return MergedRecord::unmerged(merged);
    }

    if let Some(date) = earliest_published_date(editions) {
        merged.published_date = date.to_string();
    }
    if let Some(description) = longest_description(editions) {
        merged.description = description.to_string();
    }
    if let Some(thumbnail) = first_thumbnail(editions) {
        merged.thumbnail = thumbnail.to_string();
    }

    MergedRecord {
        record: merged,
        merged_editions: merged_editions(editions),
    }
}

/// Smallest non-empty `published_date` by string order.
///
/// Matches chronological order only when the dates share a precision;
/// `"2020"` sorts before `"2020-01-15"` whichever was actually earlier.
pub fn earliest_published_date<R: Borrow<BookRecord>>(editions: &[R]) -> Option<&str> {
    editions
        .iter()
        .map(|e| e.borrow().published_date.as_str())
        .filter(|d| !d.is_empty())
        .min()
}

/// Longest description by character count; ties keep the earliest
pub fn longest_description<R: Borrow<BookRecord>>(editions: &[R]) -> Option<&str> {
    editions
        .iter()
        .map(|e| e.borrow().description.as_str())
        .fold(None::<(&str, usize)>, |best, description| {
            let len = description.chars().count();
            match best {
                Some((_, best_len)) if best_len >= len => best,
                _ => Some((description, len)),
            }
        })
        .map(|(description, _)| description)
}

/// First non-empty thumbnail in cluster order
pub fn first_thumbnail<R: Borrow<BookRecord>>(editions: &[R]) -> Option<&str> {
    editions
        .iter()
        .map(|e| e.borrow().thumbnail.as_str())
        .find(|t| !t.is_empty())
}

/// One `{title, isbn13}` entry per edition, in cluster order
pub fn merged_editions<R: Borrow<BookRecord>>(editions: &[R]) -> Vec<MergedEdition> {
    editions
        .iter()
        .map(|e| {
            let e = e.borrow();
            MergedEdition {
                title: if e.title.is_empty() {
                    UNKNOWN_TITLE.to_string()
                } else {
                    e.title.clone()
                },
                isbn13: e.isbn13.clone(),
            }
        })
        .collect()
}
