//! Deduplication algorithms for detecting editions of the same work
//!
//! This module provides normalization, similarity scoring, pair
//! classification and the clustering pass that consolidates editions.

mod classification;
mod normalization;
mod orchestration;
mod similarity;

pub use classification::{
    classify_pair, work_key, Classifier, MatchPath, PairDecision, PairVerdict,
};
pub use normalization::{clean, strip_leading_article, strip_subtitle};
pub use orchestration::{consolidate, consolidate_with, find_clusters};
pub use similarity::{
    description_similarity, short_fingerprint, similarity_score, token_set_ratio,
    token_sort_ratio, weighted_similarity,
};
