//! Book query construction
//!
//! Translates the recognized search parameters into a single validated
//! catalog query. Exactly one primary field is kept, chosen by the
//! precedence title > author > subject > isbn.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field a search is keyed on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Title,
    Author,
    Subject,
    Isbn,
}

impl SearchType {
    /// All types, in primary-field precedence order
    pub const PRECEDENCE: [SearchType; 4] = [
        SearchType::Title,
        SearchType::Author,
        SearchType::Subject,
        SearchType::Isbn,
    ];

    /// Catalog query parameter name for this field
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Title => "title",
            SearchType::Author => "author",
            SearchType::Subject => "subject",
            SearchType::Isbn => "isbn",
        }
    }

    /// Parse a type selector, falling back to `Title` for unknown values
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SearchType::Title),
            "author" => Ok(SearchType::Author),
            "subject" => Ok(SearchType::Subject),
            "isbn" => Ok(SearchType::Isbn),
            other => Err(QueryError::UnknownType(other.to_string())),
        }
    }
}

/// Query validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("one of title, author, subject or isbn is required")]
    MissingPrimaryField,

    #[error("unknown search type: {0}")]
    UnknownType(String),
}

/// Optional filters applied on top of the primary field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.language.is_none()
    }

    /// Drop blank values and trim the rest
    pub fn normalized(self) -> Self {
        Self {
            year: non_blank(self.year),
            language: non_blank(self.language),
        }
    }
}

/// Decode a query string, keeping the first value of a repeated key
pub fn first_values(raw: Option<&str>) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        values
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    values
}

/// Parameters accepted by the book search endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub isbn: Option<String>,
    pub year: Option<String>,
    pub language: Option<String>,
}

impl BookParams {
    /// Parameters from a raw query string; unknown keys are ignored
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut values = first_values(raw);
        Self {
            title: values.remove("title"),
            author: values.remove("author"),
            subject: values.remove("subject"),
            isbn: values.remove("isbn"),
            year: values.remove("year"),
            language: values.remove("language"),
        }
    }

    fn field(&self, kind: SearchType) -> Option<&String> {
        match kind {
            SearchType::Title => self.title.as_ref(),
            SearchType::Author => self.author.as_ref(),
            SearchType::Subject => self.subject.as_ref(),
            SearchType::Isbn => self.isbn.as_ref(),
        }
    }
}

/// A validated catalog query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    /// Primary field the search is keyed on
    pub field: SearchType,
    /// Trimmed, non-empty search term
    pub value: String,
    /// Optional filters
    pub filters: SearchFilters,
}

impl BookQuery {
    /// Create a query for one field. Blank values are rejected.
    pub fn new(field: SearchType, value: &str) -> Result<Self, QueryError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(QueryError::MissingPrimaryField);
        }
        Ok(Self {
            field,
            value: value.to_string(),
            filters: SearchFilters::default(),
        })
    }

    /// Set filters
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters.normalized();
        self
    }

    /// Build a query from request parameters, keeping the first present
    /// primary field in precedence order.
    pub fn from_params(params: &BookParams) -> Result<Self, QueryError> {
        let (field, value) = SearchType::PRECEDENCE
            .iter()
            .find_map(|kind| {
                params
                    .field(*kind)
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (*kind, v))
            })
            .ok_or(QueryError::MissingPrimaryField)?;

        let filters = SearchFilters {
            year: params.year.clone(),
            language: params.language.clone(),
        };

        Ok(Self::new(field, value)?.with_filters(filters))
    }

    /// Catalog query parameters: the primary field, then filters
    pub fn catalog_params(&self) -> Vec<(String, String)> {
        let mut params = vec![(self.field.as_str().to_string(), self.value.clone())];
        if let Some(ref year) = self.filters.year {
            params.push(("first_publish_year".to_string(), year.clone()));
        }
        if let Some(ref language) = self.filters.language {
            params.push(("language".to_string(), language.clone()));
        }
        params
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
