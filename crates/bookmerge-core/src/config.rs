//! Configuration for bookmerge
//!
//! Matching thresholds and weights, plus the display settings used when
//! selecting and rendering the consolidated list. The defaults reproduce the
//! tuned behaviour of the feed tool; a TOML file may override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmergeConfig {
    /// Pair classification settings
    pub matching: MatchConfig,
    /// Display selection and rendering settings
    pub listing: ListingConfig,
}

/// Pair classification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum similarity score for a work-key match to count as the same work
    pub same_work_threshold: f64,
    /// Minimum token-set ratio of full titles on the fuzzy rescue path
    pub rescue_title_threshold: f64,
    /// Minimum token-sort ratio of joined authors on the fuzzy rescue path
    pub rescue_author_threshold: f64,
    /// Weight of the (subtitle-stripped) title token-set ratio
    pub title_weight: f64,
    /// Weight of the joined-author token-sort ratio
    pub author_weight: f64,
    /// Weight of the description fingerprint comparison
    pub description_weight: f64,
    /// Number of significant description words hashed into a fingerprint
    pub fingerprint_words: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            same_work_threshold: 0.65,
            rescue_title_threshold: 0.8,
            rescue_author_threshold: 0.9,
            title_weight: 0.40,
            author_weight: 0.40,
            description_weight: 0.20,
            fingerprint_words: 12,
        }
    }
}

/// Display selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Only records in this language are listed
    pub language: String,
    /// Placeholder titles that are never listed
    pub exclude_titles: Vec<String>,
    /// Releases this many days old (or newer, but not in the future) are flagged as new
    pub recent_days: u32,
    /// Search link for each listed record; `{title}` is replaced by the encoded title
    pub search_url_template: Option<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            exclude_titles: vec!["No Title".to_string(), "Untitled".to_string()],
            recent_days: 30,
            search_url_template: None,
        }
    }
}

impl BookmergeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read, parse and validate a TOML configuration file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matching.validate()
    }
}

impl MatchConfig {
    /// Validate thresholds and weights
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = [
            ("same_work_threshold", self.same_work_threshold),
            ("rescue_title_threshold", self.rescue_title_threshold),
            ("rescue_author_threshold", self.rescue_author_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange(format!(
                    "{} must be between 0.0 and 1.0",
                    name
                )));
            }
        }

        let weights = [
            ("title_weight", self.title_weight),
            ("author_weight", self.author_weight),
            ("description_weight", self.description_weight),
        ];
        for (name, value) in weights {
            if value < 0.0 || value.is_nan() {
                return Err(ConfigError::OutOfRange(format!(
                    "{} must not be negative",
                    name
                )));
            }
        }

        let total = self.title_weight + self.author_weight + self.description_weight;
        if (total - 1.0).abs() > 1e-9 {
            return Err(ConfigError::InvalidThresholds(format!(
                "weights must sum to 1.0, got {}",
                total
            )));
        }

        if self.fingerprint_words == 0 {
            return Err(ConfigError::OutOfRange(
                "fingerprint_words must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Values are invalid relative to each other
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),
    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    /// Configuration text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}
