//! Pairwise same-work classification

use serde::{Deserialize, Serialize};

use super::normalization::{clean, strip_leading_article, strip_subtitle};
use super::similarity::{token_set_ratio, token_sort_ratio, weighted_similarity};
use crate::config::MatchConfig;
use crate::record::BookRecord;

/// Outcome of comparing two records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairVerdict {
    /// Both records describe the same work
    SameWork,
    /// Work keys agree but the content does not back them up
    Uncertain,
    /// Different works
    Different,
}

impl PairVerdict {
    /// Whether the pair should end up in the same cluster
    pub fn merges(self) -> bool {
        matches!(self, PairVerdict::SameWork)
    }
}

/// Which rule produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPath {
    /// Work keys are equal; the similarity score decided
    KeyMatch,
    /// Work keys differ but titles and authors are near-identical
    FuzzyRescue,
    /// Neither rule applied
    NoMatch,
}

/// A verdict together with how it was reached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDecision {
    pub verdict: PairVerdict,
    pub path: MatchPath,
    /// Similarity score, only computed on the key-match path
    pub score: Option<f64>,
}

/// Normalized `title::authors` key used as a coarse identity pre-filter
pub fn work_key(record: &BookRecord) -> String {
    let title = strip_leading_article(strip_subtitle(&record.title));
    format!("{}::{}", clean(title), clean(&record.joined_authors()))
}

/// Classify a pair with the default thresholds
pub fn classify_pair(a: &BookRecord, b: &BookRecord) -> PairVerdict {
    Classifier::default().classify_pair(a, b)
}

/// Same-work classifier with configurable thresholds
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: MatchConfig,
}

impl Classifier {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn classify_pair(&self, a: &BookRecord, b: &BookRecord) -> PairVerdict {
        self.explain_pair(a, b).verdict
    }

    /// Classify a pair and report which rule decided it.
    ///
    /// 1. Equal work keys: same work when the similarity score reaches the
    ///    threshold, otherwise uncertain.
    /// 2. Fuzzy rescue: full-title token-set ratio and joined-author
    ///    token-sort ratio both above their stricter thresholds.
    /// 3. Otherwise different.
    pub fn explain_pair(&self, a: &BookRecord, b: &BookRecord) -> PairDecision {
        if work_key(a) == work_key(b) {
            let score = weighted_similarity(a, b, &self.config);
            return PairDecision {
                verdict: self.verdict_for_key_match(score),
                path: MatchPath::KeyMatch,
                score: Some(score),
            };
        }

        if self.fuzzy_rescue(a, b) {
            return PairDecision {
                verdict: PairVerdict::SameWork,
                path: MatchPath::FuzzyRescue,
                score: None,
            };
        }

        PairDecision {
            verdict: PairVerdict::Different,
            path: MatchPath::NoMatch,
            score: None,
        }
    }

    /// Verdict for a pair whose work keys are equal
    pub fn verdict_for_key_match(&self, score: f64) -> PairVerdict {
        if score >= self.config.same_work_threshold {
            PairVerdict::SameWork
        } else {
            PairVerdict::Uncertain
        }
    }

    fn fuzzy_rescue(&self, a: &BookRecord, b: &BookRecord) -> bool {
        token_set_ratio(&a.title, &b.title) >= self.config.rescue_title_threshold
            && token_sort_ratio(&a.joined_authors(), &b.joined_authors())
                >= self.config.rescue_author_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, authors: &[&str]) -> BookRecord {
        BookRecord::new(title, authors.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn test_work_key() {
        assert_eq!(
            work_key(&record("The Fall: A Novel", &["J. Doe"])),
            "fall::j doe"
        );
        assert_eq!(
            work_key(&record("Leviathan Wakes (The Expanse)", &["Daniel Abraham", "Ty Franck"])),
            "leviathan wakes::daniel abraham ty franck"
        );
        assert_eq!(work_key(&BookRecord::default()), "::");
    }

    #[test]
    fn test_same_record_is_same_work() {
        let a = record("Dune", &["Frank Herbert"]);
        let decision = Classifier::default().explain_pair(&a, &a);
        assert_eq!(decision.verdict, PairVerdict::SameWork);
        assert_eq!(decision.path, MatchPath::KeyMatch);
    }

    #[test]
    fn test_edition_subtitle_is_same_work() {
        let a = record("Dune", &["Frank Herbert"]);
        let b = record("Dune: 60th Anniversary Edition", &["Frank Herbert"]);
        assert_eq!(classify_pair(&a, &b), PairVerdict::SameWork);
    }

    #[test]
    fn test_key_match_threshold_boundary() {
        let classifier = Classifier::default();
        assert_eq!(classifier.verdict_for_key_match(0.65), PairVerdict::SameWork);
        assert_eq!(classifier.verdict_for_key_match(0.6499999), PairVerdict::Uncertain);
    }

    #[test]
    fn test_fuzzy_rescue() {
        let a = record("The Fall", &["J. Doe"]);
        let b = record("Fall, The", &["J. Doe"]);
        assert_ne!(work_key(&a), work_key(&b));
        let decision = Classifier::default().explain_pair(&a, &b);
        assert_eq!(decision.verdict, PairVerdict::SameWork);
        assert_eq!(decision.path, MatchPath::FuzzyRescue);
        assert_eq!(decision.score, None);
    }

    #[test]
    fn test_different_works() {
        let a = record("Dune", &["Frank Herbert"]);
        let b = record("Neuromancer", &["William Gibson"]);
        let decision = Classifier::default().explain_pair(&a, &b);
        assert_eq!(decision.verdict, PairVerdict::Different);
        assert_eq!(decision.path, MatchPath::NoMatch);
    }

    #[test]
    fn test_verdict_merges() {
        assert!(PairVerdict::SameWork.merges());
        assert!(!PairVerdict::Uncertain.merges());
        assert!(!PairVerdict::Different.merges());
    }

    #[test]
    fn test_custom_threshold() {
        let classifier = Classifier::new(MatchConfig {
            same_work_threshold: 0.95,
            ..MatchConfig::default()
        });
        let a = record("Dune", &["Frank Herbert"]);
        // 0.9 without descriptions
        assert_eq!(classifier.classify_pair(&a, &a), PairVerdict::Uncertain);
    }
}
