//! Book record domain model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BookmergeError, Result};

/// A single book record as scraped from a feed entry.
///
/// Every field may be empty. Records are read-only inputs to classification;
/// consolidation builds new [`MergedRecord`]s instead of editing them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub thumbnail: String,
    pub language: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    pub published_date: String,
    pub isbn13: String,
}

impl BookRecord {
    /// Create a record with a title and authors, all other fields empty
    pub fn new(title: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            title: title.into(),
            authors,
            ..Default::default()
        }
    }

    /// Authors joined with `", "` in their given order
    pub fn joined_authors(&self) -> String {
        self.authors.join(", ")
    }
}

/// One edition folded into a merged record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedEdition {
    pub title: String,
    pub isbn13: String,
}

/// A record in the consolidated output.
///
/// `merged_editions` lists every input record folded into this one, in input
/// order, and is empty when the record stood alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedRecord {
    #[serde(flatten)]
    pub record: BookRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_editions: Vec<MergedEdition>,
}

impl MergedRecord {
    /// Wrap a record that had no other editions
    pub fn unmerged(record: BookRecord) -> Self {
        Self {
            record,
            merged_editions: Vec::new(),
        }
    }

    pub fn is_merged(&self) -> bool {
        !self.merged_editions.is_empty()
    }

    /// Number of input records this output record stands for
    pub fn edition_count(&self) -> usize {
        self.merged_editions.len().max(1)
    }
}

/// Decode a JSON array of loosely typed book records.
///
/// Missing and `null` fields become empty. `authors` may be a list of strings
/// or a single string. Anything else is rejected with an error naming the
/// offending record.
pub fn parse_records(json: &str) -> Result<Vec<BookRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(BookmergeError::InvalidInput(format!(
                "expected a JSON array of records, found {}",
                json_kind(&other)
            )))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| record_from_value(index, item))
        .collect()
}

fn record_from_value(index: usize, value: &Value) -> Result<BookRecord> {
    let fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(BookmergeError::malformed(
                index,
                "",
                format!("expected an object, found {}", json_kind(other)),
            ))
        }
    };

    // Best-effort title for error messages, validated properly below
    let label = fields.get("title").and_then(Value::as_str).unwrap_or("");

    Ok(BookRecord {
        title: string_field(index, label, fields, "title")?,
        authors: authors_field(index, label, fields)?,
        description: string_field(index, label, fields, "description")?,
        thumbnail: string_field(index, label, fields, "thumbnail")?,
        language: string_field(index, label, fields, "language")?,
        published_date: string_field(index, label, fields, "publishedDate")?,
        isbn13: string_field(index, label, fields, "isbn13")?,
    })
}

fn string_field(
    index: usize,
    label: &str,
    fields: &Map<String, Value>,
    name: &str,
) -> Result<String> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(BookmergeError::malformed(
            index,
            label,
            format!("`{}` must be a string, found {}", name, json_kind(other)),
        )),
    }
}

fn authors_field(index: usize, label: &str, fields: &Map<String, Value>) -> Result<Vec<String>> {
    match fields.get("authors") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) if s.is_empty() => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(pos, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(BookmergeError::malformed(
                    index,
                    label,
                    format!(
                        "`authors[{}]` must be a string, found {}",
                        pos,
                        json_kind(other)
                    ),
                )),
            })
            .collect(),
        Some(other) => Err(BookmergeError::malformed(
            index,
            label,
            format!(
                "`authors` must be a list of strings or a string, found {}",
                json_kind(other)
            ),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
