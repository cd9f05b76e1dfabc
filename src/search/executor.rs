//! Book search execution

use crate::catalog::schema::{decode_docs, BookRecord, DecodeError};
use crate::catalog::{OpenLibrary, SearchPage};
use crate::network::HttpClient;
use crate::query::BookQuery;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upstream failures. Never shown to callers verbatim.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] anyhow::Error),

    #[error("catalog returned HTTP {0}")]
    Status(u16),

    #[error("catalog payload rejected: {0}")]
    Malformed(#[from] DecodeError),
}

/// Executes book searches against the catalog
pub struct BookSearch {
    client: HttpClient,
    catalog: OpenLibrary,
}

impl BookSearch {
    pub fn new(client: HttpClient, catalog: OpenLibrary) -> Self {
        Self { client, catalog }
    }

    /// Run one search. Exactly one upstream request is made; there is no retry.
    pub async fn execute(&self, query: &BookQuery) -> Result<SearchPage, SearchError> {
        let start = Instant::now();
        let request = self.catalog.search_request(query);

        info!("Searching catalog by {} for '{}'", query.field, query.value);

        let response = self.client.execute(request).await?;
        if !response.is_success() {
            return Err(SearchError::Status(response.status));
        }

        let decoded = decode_docs::<BookRecord>(&response.text)?;

        let malformed = decoded.malformed_count();
        if malformed > 0 {
            warn!("Dropped {} malformed catalog records", malformed);
        }
        debug!(
            "Decoded {} records ({} partial) in {:?}",
            decoded.records.len(),
            decoded.partial_count(),
            start.elapsed()
        );

        Ok(SearchPage::from(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SearchFilters, SearchType};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search_for(server: &MockServer) -> BookSearch {
        BookSearch::new(HttpClient::new().unwrap(), OpenLibrary::new(server.uri()))
    }

    #[tokio::test]
    async fn test_execute_forwards_query_and_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("subject", "fantasy"))
            .and(query_param("first_publish_year", "1954"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "numFound": 1,
                "start": 0,
                "docs": [{ "key": "/works/OL27448W", "title": "The Lord of the Rings" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = BookQuery::new(SearchType::Subject, "fantasy")
            .unwrap()
            .with_filters(SearchFilters {
                year: Some("1954".to_string()),
                language: None,
            });

        let page = search_for(&server).execute(&query).await.unwrap();
        assert_eq!(page.docs.len(), 1);
        assert_eq!(page.docs[0].title.as_deref(), Some("The Lord of the Rings"));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let query = BookQuery::new(SearchType::Title, "dune").unwrap();
        let err = search_for(&server).execute(&query).await.unwrap_err();
        assert!(matches!(err, SearchError::Status(502)));
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "busy" })))
            .mount(&server)
            .await;

        let query = BookQuery::new(SearchType::Title, "dune").unwrap();
        let err = search_for(&server).execute(&query).await.unwrap_err();
        assert!(matches!(err, SearchError::Malformed(DecodeError::MissingDocs)));
    }
}
