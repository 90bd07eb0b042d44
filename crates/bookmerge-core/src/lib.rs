//! bookmerge-core: record linkage for book feeds
//!
//! Book feeds list the same work many times over: hardcover, paperback, ebook,
//! audiobook, reissues. This library decides which records describe the same
//! underlying work and folds them into one record that still remembers each
//! edition.
//!
//! - **Normalization**: case/punctuation folding, subtitle and leading-article stripping
//! - **Similarity**: token-set and token-sort ratios, description fingerprints, weighted score
//! - **Classification**: exact work-key match gated by a score floor, plus a fuzzy rescue path
//! - **Consolidation**: single forward pass clustering and a deterministic merge policy
//!
//! Around the core sit the stages of the feed tool it came out of: a parser for
//! the feed's object dump, display selection (language filter, newest first,
//! recent releases), and JSON/HTML export.
//!
//! ```text
//! records → classify pairs → clusters → merged records → listing → export
//! ```

pub mod config;
pub mod deduplication;
pub mod error;
pub mod export;
pub mod feed;
pub mod listing;
pub mod merge;
pub mod record;

pub use config::{BookmergeConfig, ConfigError, ListingConfig, MatchConfig};
pub use deduplication::{
    classify_pair, consolidate, work_key, Classifier, MatchPath, PairDecision, PairVerdict,
};
pub use error::{BookmergeError, Result};
pub use export::{export_html, export_json, ExportFormat};
pub use feed::parse_feed_dump;
pub use listing::{is_recent, select_for_display, Listing};
pub use merge::consolidate_editions;
pub use record::{parse_records, BookRecord, MergedEdition, MergedRecord};
