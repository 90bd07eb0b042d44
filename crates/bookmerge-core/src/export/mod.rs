//! Export pipelines for consolidated records

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::config::ListingConfig;
use crate::error::{BookmergeError, Result};
use crate::listing::{is_recent, Listing};
use crate::record::MergedRecord;

const UNKNOWN_AUTHOR: &str = "Unknown Author";
const NO_DESCRIPTION: &str = "No description available.";
const TITLE_PLACEHOLDER: &str = "{title}";

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Book Feed</title>
    <style>
        body { font-family: sans-serif; margin: 2em; }
        .book { border-bottom: 1px solid #ccc; padding: 1em 0; overflow: hidden; position: relative; }
        .book img { float: left; margin-right: 1em; max-width: 100px; }
        .book h2 { font-size: 1.2em; margin: 0 0 0.5em 0; }
        .book p { margin: 0.3em 0; }
        .clear { clear: both; }
        details { margin: 0.5em 0; font-size: 0.9em; }
        details summary { cursor: pointer; color: #666; }
        details ul { margin: 0.5em 0; padding-left: 1.5em; list-style-type: none; }
        details li { margin: 0.3em 0; }
        .isbn { color: #888; font-size: 0.85em; font-family: monospace; }
        .book.recent { background: linear-gradient(to right, #fffacd 0%, #ffffff 100%); border-left: 4px solid #ffd700; padding-left: 1em; }
        .new-badge { display: inline-block; background: #ffd700; color: #000; font-size: 0.7em; font-weight: bold; padding: 0.2em 0.5em; border-radius: 3px; margin-left: 0.5em; vertical-align: middle; }
    </style>
</head>
<body>
    <h1>Book Feed</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Html,
}

impl ExportFormat {
    /// Conventional file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = BookmergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(BookmergeError::InvalidInput(format!(
                "unknown export format: {}",
                other
            ))),
        }
    }
}

/// Export consolidated records as a pretty-printed JSON array
pub fn export_json(records: &[MergedRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Render a listing as a standalone HTML page.
///
/// Records published within `config.recent_days` of `today` get a NEW badge.
/// A search link is added only when `config.search_url_template` is set;
/// the title is form-encoded into its `{title}` placeholder.
pub fn export_html(listing: &Listing, config: &ListingConfig, today: NaiveDate) -> String {
    let mut html = String::from(PAGE_HEAD);
    for record in &listing.records {
        let recent = is_recent(&record.record.published_date, today, config.recent_days);
        html.push_str(&render_book(record, config, recent));
    }
    html.push_str(PAGE_TAIL);
    html
}

fn render_book(merged: &MergedRecord, config: &ListingConfig, recent: bool) -> String {
    let book = &merged.record;
    let title = escape_html(&book.title);
    let authors = if book.authors.is_empty() {
        UNKNOWN_AUTHOR.to_string()
    } else {
        escape_html(&book.joined_authors())
    };
    let description = if book.description.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        escape_html(&book.description)
    };

    let (recent_class, new_badge) = if recent {
        (" recent", r#"<span class="new-badge">NEW</span>"#)
    } else {
        ("", "")
    };

    let search_link = config
        .search_url_template
        .as_deref()
        .map(|template| {
            let url = template.replace(TITLE_PLACEHOLDER, &encode_query_value(&book.title));
            format!(
                "\n        <p><a href=\"{}\" target=\"_blank\">Search</a></p>",
                escape_html(&url)
            )
        })
        .unwrap_or_default();

    format!(
        r#"    <div class="book{recent_class}">
        <img src="{thumbnail}" alt="{title}">
        <h2>{title}{new_badge}</h2>
        <p><strong>Author:</strong> {authors}</p>
        <p><strong>Published:</strong> {published}</p>{search_link}{editions}
        <p>{description}</p>
        <div class="clear"></div>
    </div>
"#,
        thumbnail = escape_html(&book.thumbnail),
        published = escape_html(&book.published_date),
        editions = render_editions(merged),
    )
}

fn render_editions(merged: &MergedRecord) -> String {
    if !merged.is_merged() {
        return String::new();
    }

    let items: Vec<String> = merged
        .merged_editions
        .iter()
        .map(|edition| {
            let title = escape_html(&edition.title);
            if edition.isbn13.is_empty() {
                format!("                <li>{}</li>", title)
            } else {
                format!(
                    "                <li>{} <span class=\"isbn\">ISBN: {}</span></li>",
                    title,
                    escape_html(&edition.isbn13)
                )
            }
        })
        .collect();

    format!(
        "\n        <details>\n            <summary><em>Multiple editions merged ({} editions)</em></summary>\n            <ul>\n{}\n            </ul>\n        </details>",
        merged.merged_editions.len(),
        items.join("\n")
    )
}

/// Form-encode a query value; spaces become `+`
fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
