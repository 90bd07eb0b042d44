//! Selection and ordering of consolidated records for display

use chrono::{Duration, NaiveDate};

use crate::config::ListingConfig;
use crate::record::MergedRecord;

/// Records chosen for display, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub records: Vec<MergedRecord>,
    /// Number of records dropped by the language and title filters
    pub filtered_out: usize,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Filter records by language and excluded titles, then order them by
/// publication date descending.
///
/// Dates compare as strings, so undated records end up last. The sort is
/// stable: records with equal dates keep their consolidated order.
pub fn select_for_display(records: Vec<MergedRecord>, config: &ListingConfig) -> Listing {
    let total = records.len();
    let mut kept: Vec<MergedRecord> = records
        .into_iter()
        .filter(|r| {
            r.record.language == config.language
                && !config.exclude_titles.iter().any(|t| *t == r.record.title)
        })
        .collect();

    kept.sort_by(|a, b| b.record.published_date.cmp(&a.record.published_date));

    let filtered_out = total - kept.len();
    tracing::info!(
        "Included {} books, filtered out {}",
        kept.len(),
        filtered_out
    );

    Listing {
        records: kept,
        filtered_out,
    }
}

/// Whether a publication date falls after the day `recent_days` ago, up to
/// and including `today`. Future dates are never recent.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM` and `YYYY`; partial dates stand for their
/// first day. Anything else is not recent.
pub fn is_recent(published_date: &str, today: NaiveDate, recent_days: u32) -> bool {
    let Some(date) = parse_published_date(published_date) else {
        return false;
    };
    let earliest = today - Duration::days(i64::from(recent_days));
    earliest < date && date <= today
}

fn parse_published_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01-01", value), "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BookRecord;

    fn merged(title: &str, language: &str, date: &str) -> MergedRecord {
        MergedRecord::unmerged(BookRecord {
            language: language.to_string(),
            published_date: date.to_string(),
            ..BookRecord::new(title, vec!["A. Writer".to_string()])
        })
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_filters_language_and_excluded_titles() {
        let records = vec![
            merged("Dune", "en", "1965"),
            merged("Der Schwarm", "de", "2004"),
            merged("No Title", "en", "2020"),
            merged("Untitled", "en", "2021"),
        ];
        let listing = select_for_display(records, &ListingConfig::default());
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.filtered_out, 3);
        assert_eq!(listing.records[0].record.title, "Dune");
    }

    #[test]
    fn test_sorted_newest_first_with_undated_last() {
        let records = vec![
            merged("Undated", "en", ""),
            merged("Old", "en", "1999-01-01"),
            merged("New", "en", "2024-05"),
            merged("Middle", "en", "2010"),
        ];
        let listing = select_for_display(records, &ListingConfig::default());
        let titles: Vec<&str> = listing
            .records
            .iter()
            .map(|r| r.record.title.as_str())
            .collect();
        assert_eq!(titles, vec!["New", "Middle", "Old", "Undated"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let records = vec![
            merged("First", "en", "2020"),
            merged("Second", "en", "2020"),
            merged("Third", "en", "2020"),
        ];
        let listing = select_for_display(records, &ListingConfig::default());
        let titles: Vec<&str> = listing
            .records
            .iter()
            .map(|r| r.record.title.as_str())
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_custom_language() {
        let config = ListingConfig {
            language: "de".to_string(),
            ..ListingConfig::default()
        };
        let records = vec![merged("Dune", "en", ""), merged("Der Schwarm", "de", "")];
        let listing = select_for_display(records, &config);
        assert_eq!(listing.records[0].record.title, "Der Schwarm");
        assert_eq!(listing.filtered_out, 1);
    }

    #[test]
    fn test_is_recent_full_dates() {
        let today = day(2024, 6, 15);
        assert!(is_recent("2024-06-15", today, 30));
        assert!(is_recent("2024-05-17", today, 30));
        assert!(!is_recent("2024-05-16", today, 30));
        assert!(!is_recent("2024-05-15", today, 30));
        assert!(!is_recent("2024-06-16", today, 30));
    }

    #[test]
    fn test_is_recent_partial_dates() {
        let today = day(2024, 6, 15);
        assert!(is_recent("2024-06", today, 30));
        assert!(!is_recent("2024-05", today, 30));
        assert!(is_recent("2024", day(2024, 1, 10), 30));
        assert!(!is_recent("2024", today, 30));
    }

    #[test]
    fn test_is_recent_unparseable() {
        let today = day(2024, 6, 15);
        assert!(!is_recent("", today, 30));
        assert!(!is_recent("June 2024", today, 30));
        assert!(!is_recent("2024-13-01", today, 30));
    }
}
