//! Subcommand implementations

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use bookmerge_core::deduplication::consolidate_with;
use bookmerge_core::{
    export_html, export_json, parse_feed_dump, parse_records, select_for_display, work_key,
    BookRecord, BookmergeConfig, Classifier, ExportFormat, MergedRecord,
};
use chrono::{Local, NaiveDate};

use crate::{ClassifyArgs, DedupeArgs, InputFormat, RenderArgs};

const STDIN_PATH: &str = "-";

/// Explicit config file, else the per-user file when it exists, else defaults
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<BookmergeConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    match path {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            BookmergeConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(BookmergeConfig::default()),
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bookmerge").join("config.toml"))
}

pub fn dedupe(args: &DedupeArgs, config: &BookmergeConfig) -> anyhow::Result<()> {
    let records = load_records(&args.input, args.format)?;
    let merged = consolidate_with(&records, &Classifier::new(config.matching.clone()));
    let today = Local::now().date_naive();
    let content = export_merged(merged, args.to, config, today)?;
    write_output(args.output.as_deref(), &content)
}

pub fn render(args: &RenderArgs, config: &BookmergeConfig) -> anyhow::Result<()> {
    let records = load_records(&args.input, args.format)?;
    let merged = if args.no_dedupe {
        records.into_iter().map(MergedRecord::unmerged).collect()
    } else {
        consolidate_with(&records, &Classifier::new(config.matching.clone()))
    };
    let today = Local::now().date_naive();
    let html = export_merged(merged, ExportFormat::Html, config, today)?;
    write_output(args.output.as_deref(), &html)
}

pub fn classify(args: &ClassifyArgs, config: &BookmergeConfig) -> anyhow::Result<()> {
    let records = load_records(&args.input, args.format)?;
    let report = describe_pair(&records, args.first, args.second, config)?;
    print!("{}", report);
    Ok(())
}

/// JSON carries every merged record; HTML carries the display listing only
fn export_merged(
    merged: Vec<MergedRecord>,
    format: ExportFormat,
    config: &BookmergeConfig,
    today: NaiveDate,
) -> anyhow::Result<String> {
    match format {
        ExportFormat::Json => Ok(export_json(&merged)?),
        ExportFormat::Html => {
            let listing = select_for_display(merged, &config.listing);
            Ok(export_html(&listing, &config.listing, today))
        }
    }
}

fn describe_pair(
    records: &[BookRecord],
    first: usize,
    second: usize,
    config: &BookmergeConfig,
) -> anyhow::Result<String> {
    let (Some(a), Some(b)) = (records.get(first), records.get(second)) else {
        bail!(
            "record positions {} and {} must both be below {}",
            first,
            second,
            records.len()
        );
    };

    let decision = Classifier::new(config.matching.clone()).explain_pair(a, b);
    let verdict = serde_json::to_value(decision.verdict)?;
    let path = serde_json::to_value(decision.path)?;
    let score = decision
        .score
        .map(|s| format!("{:.4}", s))
        .unwrap_or_else(|| "-".to_string());

    Ok(format!(
        "#{} {:?}\n    key: {}\n#{} {:?}\n    key: {}\nverdict: {}\npath: {}\nscore: {}\n",
        first,
        a.title,
        work_key(a),
        second,
        b.title,
        work_key(b),
        verdict.as_str().unwrap_or_default(),
        path.as_str().unwrap_or_default(),
        score
    ))
}

fn load_records(input: &Path, format: InputFormat) -> anyhow::Result<Vec<BookRecord>> {
    let text = read_input(input)?;
    let records = match format {
        InputFormat::Json => parse_records(&text)?,
        InputFormat::Feed => parse_feed_dump(&text)?,
    };
    tracing::info!("Read {} records from {}", records.len(), input.display());
    Ok(records)
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }

    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, author: &str, date: &str) -> BookRecord {
        BookRecord {
            language: "en".to_string(),
            published_date: date.to_string(),
            ..BookRecord::new(title, vec![author.to_string()])
        }
    }

    fn sample() -> Vec<BookRecord> {
        vec![
            record("Dune", "Frank Herbert", "1965-08-01"),
            record("Neuromancer", "William Gibson", "1984-07-01"),
            record("Dune: Deluxe Edition", "Frank Herbert", "2019-10-01"),
        ]
    }

    #[test]
    fn test_load_config_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[listing]\nlanguage = \"de\"\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.listing.language, "de");
        assert_eq!(config.matching.same_work_threshold, 0.65);
    }

    #[test]
    fn test_load_config_rejects_invalid_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[matching]\ntitle_weight = 0.9\n").unwrap();
        assert!(load_config(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("absent.toml").as_path())).is_err());
    }

    #[test]
    fn test_load_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, r#"[{"title": "Dune", "authors": "Frank Herbert"}]"#).unwrap();

        let records = load_records(&path, InputFormat::Json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].authors, vec!["Frank Herbert"]);
    }

    fn merge_sample() -> Vec<MergedRecord> {
        consolidate_with(&sample(), &Classifier::default())
    }

    #[test]
    fn test_export_merged_json() {
        let today = NaiveDate::from_ymd_opt(2019, 10, 20).unwrap();
        let json = export_merged(
            merge_sample(),
            ExportFormat::Json,
            &BookmergeConfig::default(),
            today,
        )
        .unwrap();
        let merged: Vec<MergedRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].edition_count(), 2);
    }

    #[test]
    fn test_export_merged_html_with_and_without_dedupe() {
        let today = NaiveDate::from_ymd_opt(2019, 10, 20).unwrap();
        let config = BookmergeConfig::default();

        let merged = export_merged(merge_sample(), ExportFormat::Html, &config, today).unwrap();
        assert_eq!(merged.matches("<h2>").count(), 2);
        assert!(merged.contains("Multiple editions merged (2 editions)"));

        let unmerged: Vec<MergedRecord> = sample().into_iter().map(MergedRecord::unmerged).collect();
        let raw = export_merged(unmerged, ExportFormat::Html, &config, today).unwrap();
        assert_eq!(raw.matches("<h2>").count(), 3);
        assert!(raw.contains(r#"<h2>Dune: Deluxe Edition<span class="new-badge">NEW</span></h2>"#));
    }

    #[test]
    fn test_describe_pair() {
        let report = describe_pair(&sample(), 0, 2, &BookmergeConfig::default()).unwrap();
        assert!(report.contains("key: dune::frank herbert"));
        assert!(report.contains("verdict: same_work"));
        assert!(report.contains("path: key_match"));
        assert!(report.contains("score: 0.9000"));

        let report = describe_pair(&sample(), 0, 1, &BookmergeConfig::default()).unwrap();
        assert!(report.contains("verdict: different"));
        assert!(report.contains("score: -"));
    }

    #[test]
    fn test_describe_pair_out_of_range() {
        assert!(describe_pair(&sample(), 0, 7, &BookmergeConfig::default()).is_err());
    }
}
