//! Open Library endpoints
//!
//! Uses the public search API: `/search.json` for works and
//! `/search/authors.json` for authors.

use crate::network::OutboundRequest;
use crate::query::{BookQuery, SearchType};

/// Cover image service
pub const COVERS_URL: &str = "https://covers.openlibrary.org/b/id";

/// Fields requested when building suggestions from works
const SUGGESTION_FIELDS: &str = "key,title,author_name,cover_i,first_publish_year";

/// Open Library catalog
#[derive(Debug, Clone)]
pub struct OpenLibrary {
    base_url: String,
}

impl OpenLibrary {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// General search endpoint
    pub fn search_url(&self) -> String {
        format!("{}/search.json", self.base_url)
    }

    /// Author search endpoint
    pub fn author_search_url(&self) -> String {
        format!("{}/search/authors.json", self.base_url)
    }

    /// Book search request for a validated query
    pub fn search_request(&self, query: &BookQuery) -> OutboundRequest {
        let mut request = OutboundRequest::get(self.search_url());
        request.params = query.catalog_params();
        request
    }

    /// Suggestion request for a partial query
    pub fn suggestion_request(&self, query: &str, kind: SearchType, limit: usize) -> OutboundRequest {
        match kind {
            SearchType::Author => OutboundRequest::get(self.author_search_url())
                .param("q", query)
                .param("limit", limit.to_string()),
            _ => OutboundRequest::get(self.search_url())
                .param(kind.as_str(), query)
                .param("fields", SUGGESTION_FIELDS)
                .param("limit", limit.to_string()),
        }
    }
}

impl Default for OpenLibrary {
    fn default() -> Self {
        Self::new("https://openlibrary.org")
    }
}

/// Medium-size cover image URL
pub fn cover_url(cover_id: i64) -> String {
    format!("{}/{}-M.jpg", COVERS_URL, cover_id)
}
