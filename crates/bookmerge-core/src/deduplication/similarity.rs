//! Similarity scoring for deduplication

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use super::normalization::{clean, strip_subtitle};
use crate::config::MatchConfig;
use crate::record::BookRecord;

/// Description similarity when either side has no fingerprint
const NEUTRAL_DESCRIPTION_SCORE: f64 = 0.5;

/// Hex characters kept from the description digest
const FINGERPRINT_LEN: usize = 12;

/// Jaccard similarity of the cleaned, whitespace-split token sets.
///
/// Two blank strings are a perfect match (1.0), not a division by zero.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let clean_a = clean(a);
    let clean_b = clean(b);
    let set_a: HashSet<&str> = clean_a.split_whitespace().collect();
    let set_b: HashSet<&str> = clean_b.split_whitespace().collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union as f64
}

/// Character-level similarity of the cleaned strings with their tokens sorted.
///
/// Returns `2 * M / T` where `M` is the length of the longest common
/// subsequence and `T` is the combined length. Two blank strings score 1.0.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let sorted_a = sorted_tokens(a);
    let sorted_b = sorted_tokens(b);
    if sorted_a.is_empty() && sorted_b.is_empty() {
        return 1.0;
    }
    rapidfuzz::fuzz::ratio(sorted_a.chars(), sorted_b.chars())
}

fn sorted_tokens(s: &str) -> String {
    let cleaned = clean(s);
    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Short stable hash of a description's leading significant words.
///
/// Keeps cleaned tokens longer than three characters, takes the first
/// `n_words` in their original order and hashes them. Returns an empty string
/// when no such words exist, meaning "no fingerprint available".
pub fn short_fingerprint(text: &str, n_words: usize) -> String {
    let cleaned = clean(text);
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .take(n_words)
        .collect();

    if words.is_empty() {
        return String::new();
    }

    let digest = Sha256::digest(words.join(" ").as_bytes());
    let mut fingerprint = hex::encode(digest);
    fingerprint.truncate(FINGERPRINT_LEN);
    fingerprint
}

/// 1.0 for equal fingerprints, 0.0 for different ones, neutral when either is missing
pub fn description_similarity(fingerprint_a: &str, fingerprint_b: &str) -> f64 {
    if fingerprint_a.is_empty() || fingerprint_b.is_empty() {
        NEUTRAL_DESCRIPTION_SCORE
    } else if fingerprint_a == fingerprint_b {
        1.0
    } else {
        0.0
    }
}

/// Weighted blend of title, author and description similarity
/// using the default weights (0.40 / 0.40 / 0.20).
pub fn similarity_score(a: &BookRecord, b: &BookRecord) -> f64 {
    weighted_similarity(a, b, &MatchConfig::default())
}

/// Weighted blend of title, author and description similarity.
///
/// Titles are compared without subtitles; authors are compared as joined strings.
pub fn weighted_similarity(a: &BookRecord, b: &BookRecord, config: &MatchConfig) -> f64 {
    let title = token_set_ratio(strip_subtitle(&a.title), strip_subtitle(&b.title));
    let author = token_sort_ratio(&a.joined_authors(), &b.joined_authors());
    let description = description_similarity(
        &short_fingerprint(&a.description, config.fingerprint_words),
        &short_fingerprint(&b.description, config.fingerprint_words),
    );

    config.title_weight * title
        + config.author_weight * author
        + config.description_weight * description
}
