//! Catalog payload schema
//!
//! Upstream JSON is decoded record by record. A record is either complete,
//! valid with some optional fields missing, or malformed (not an object, or
//! a known field with the wrong type). Malformed records are dropped by
//! callers; a payload without a `docs` array is rejected as a whole.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A book as returned by the general search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_publish_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,
    /// Fields passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookRecord {
    /// First listed author
    pub fn first_author(&self) -> Option<&str> {
        self.author_name
            .as_ref()
            .and_then(|names| names.first())
            .map(String::as_str)
    }
}

/// An author as returned by the author search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Records that can be decoded from a `docs` array
pub trait CatalogRecord: DeserializeOwned {
    /// Names of the optional fields this record lacks
    fn missing_fields(&self) -> Vec<&'static str>;
}

impl CatalogRecord for BookRecord {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.key.is_none() {
            missing.push("key");
        }
        if self.title.is_none() {
            missing.push("title");
        }
        if self.author_name.is_none() {
            missing.push("author_name");
        }
        if self.first_publish_year.is_none() {
            missing.push("first_publish_year");
        }
        if self.subject.is_none() {
            missing.push("subject");
        }
        if self.cover_i.is_none() {
            missing.push("cover_i");
        }
        missing
    }
}

impl CatalogRecord for AuthorRecord {
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.key.is_none() {
            missing.push("key");
        }
        if self.name.is_none() {
            missing.push("name");
        }
        missing
    }
}

/// Outcome of decoding one record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordDecode<T> {
    Complete(T),
    Partial { record: T, missing: Vec<&'static str> },
    Malformed(String),
}

impl<T> RecordDecode<T> {
    /// The decoded record, if any
    pub fn into_record(self) -> Option<T> {
        match self {
            RecordDecode::Complete(record) | RecordDecode::Partial { record, .. } => Some(record),
            RecordDecode::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, RecordDecode::Malformed(_))
    }
}

/// Decode a single record
pub fn decode_record<T: CatalogRecord>(value: Value) -> RecordDecode<T> {
    if !value.is_object() {
        return RecordDecode::Malformed("expected an object".to_string());
    }

    match serde_json::from_value::<T>(value) {
        Ok(record) => {
            let missing = record.missing_fields();
            if missing.is_empty() {
                RecordDecode::Complete(record)
            } else {
                RecordDecode::Partial { record, missing }
            }
        }
        Err(e) => RecordDecode::Malformed(e.to_string()),
    }
}

/// Payload-level decode failures
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response has no `docs` array")]
    MissingDocs,
}

/// A decoded `docs` payload
#[derive(Debug)]
pub struct DecodedDocs<T> {
    pub num_found: Option<u64>,
    pub start: Option<u64>,
    pub records: Vec<RecordDecode<T>>,
}

impl<T> DecodedDocs<T> {
    /// Number of malformed records
    pub fn malformed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_malformed()).count()
    }

    /// Number of records with missing optional fields
    pub fn partial_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, RecordDecode::Partial { .. }))
            .count()
    }

    /// Valid records in upstream order
    pub fn into_records(self) -> Vec<T> {
        self.records
            .into_iter()
            .filter_map(RecordDecode::into_record)
            .collect()
    }
}

/// Decode a catalog response body carrying a `docs` array
pub fn decode_docs<T: CatalogRecord>(text: &str) -> Result<DecodedDocs<T>, DecodeError> {
    let mut value: Value = serde_json::from_str(text)?;

    let docs = match value.get_mut("docs").map(Value::take) {
        Some(Value::Array(docs)) => docs,
        _ => return Err(DecodeError::MissingDocs),
    };

    Ok(DecodedDocs {
        num_found: value.get("numFound").and_then(Value::as_u64),
        start: value.get("start").and_then(Value::as_u64),
        records: docs.into_iter().map(decode_record).collect(),
    })
}

/// Body of the book search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<BookRecord>,
}

impl From<DecodedDocs<BookRecord>> for SearchPage {
    fn from(decoded: DecodedDocs<BookRecord>) -> Self {
        let num_found = decoded.num_found;
        let start = decoded.start.unwrap_or(0);
        let docs = decoded.into_records();

        Self {
            num_found: num_found.unwrap_or(docs.len() as u64),
            start,
            docs,
        }
    }
}
