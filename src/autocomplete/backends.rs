//! Suggestion backends, one per search type

use super::{Suggestion, SuggestionKey};
use crate::catalog::schema::{decode_docs, AuthorRecord, BookRecord};
use crate::catalog::OpenLibrary;
use crate::network::HttpClient;
use crate::query::SearchType;
use anyhow::Result;
use async_trait::async_trait;

/// Trait for suggestion backends
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Fetch at most `limit` suggestions for a non-empty query
    async fn suggest(
        &self,
        client: &HttpClient,
        catalog: &OpenLibrary,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>>;
}

/// Get the backend serving a search type
pub fn get_backend(kind: SearchType) -> Box<dyn SuggestionBackend> {
    match kind {
        SearchType::Author => Box::new(Authors),
        other => Box::new(Works { kind: other }),
    }
}

/// Author search backend
pub struct Authors;

#[async_trait]
impl SuggestionBackend for Authors {
    fn name(&self) -> &str {
        "authors"
    }

    async fn suggest(
        &self,
        client: &HttpClient,
        catalog: &OpenLibrary,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>> {
        let request = catalog.suggestion_request(query, SearchType::Author, limit);
        let response = client.execute(request).await?;

        if !response.is_success() {
            anyhow::bail!("author search returned HTTP {}", response.status);
        }

        let suggestions = decode_docs::<AuthorRecord>(&response.text)?
            .into_records()
            .into_iter()
            .filter_map(author_suggestion)
            .take(limit)
            .collect();

        Ok(suggestions)
    }
}

/// Works search backend, filtered on title, subject or isbn
pub struct Works {
    kind: SearchType,
}

#[async_trait]
impl SuggestionBackend for Works {
    fn name(&self) -> &str {
        "works"
    }

    async fn suggest(
        &self,
        client: &HttpClient,
        catalog: &OpenLibrary,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>> {
        let request = catalog.suggestion_request(query, self.kind, limit);
        let response = client.execute(request).await?;

        if !response.is_success() {
            anyhow::bail!("{} search returned HTTP {}", self.kind, response.status);
        }

        let suggestions = decode_docs::<BookRecord>(&response.text)?
            .into_records()
            .into_iter()
            .filter_map(|record| work_suggestion(record, self.kind))
            .take(limit)
            .collect();

        Ok(suggestions)
    }
}

/// Authors without a name have nothing to display and are skipped
fn author_suggestion(record: AuthorRecord) -> Option<Suggestion> {
    let name = record.name?;
    Some(Suggestion {
        key: SuggestionKey::from_upstream(record.key),
        title: name.clone(),
        kind: SearchType::Author,
        author: Some(name),
        cover_i: None,
        year: None,
    })
}

/// Works without a title are skipped
fn work_suggestion(record: BookRecord, kind: SearchType) -> Option<Suggestion> {
    let author = record.first_author().map(String::from);
    let title = record.title?;
    Some(Suggestion {
        key: SuggestionKey::from_upstream(record.key),
        title,
        kind,
        author,
        cover_i: record.cover_i,
        year: record.first_publish_year,
    })
}
