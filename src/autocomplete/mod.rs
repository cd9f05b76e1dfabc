//! Autocomplete suggestions
//!
//! Maps a partial query and a search type onto the matching catalog
//! endpoint and reshapes the results into uniform suggestion records.
//! Suggestions are best-effort: failures produce an empty list.

mod backends;

pub use backends::{get_backend, SuggestionBackend};

use crate::catalog::OpenLibrary;
use crate::network::HttpClient;
use crate::query::SearchType;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, error};

/// Maximum number of suggestions returned for a query
pub const MAX_SUGGESTIONS: usize = 5;

/// Prefix marking keys generated locally
const SYNTHESIZED_PREFIX: &str = "generated:";

/// Identifier of a suggestion.
///
/// Synthesized keys only keep list entries apart within one response;
/// they are not unique across calls and must not be stored or compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SuggestionKey {
    /// Key supplied by the catalog
    Catalog(String),
    /// Key generated because the catalog supplied none
    Synthesized(String),
}

impl SuggestionKey {
    /// Use the catalog key when present, otherwise synthesize one
    pub fn from_upstream(key: Option<String>) -> Self {
        match key {
            Some(key) if !key.is_empty() => SuggestionKey::Catalog(key),
            _ => SuggestionKey::synthesize(),
        }
    }

    pub fn synthesize() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        SuggestionKey::Synthesized(id)
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, SuggestionKey::Synthesized(_))
    }
}

impl Serialize for SuggestionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SuggestionKey::Catalog(key) => serializer.serialize_str(key),
            SuggestionKey::Synthesized(id) => {
                serializer.serialize_str(&format!("{}{}", SYNTHESIZED_PREFIX, id))
            }
        }
    }
}

impl<'de> Deserialize<'de> for SuggestionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.strip_prefix(SYNTHESIZED_PREFIX) {
            Some(id) => SuggestionKey::Synthesized(id.to_string()),
            None => SuggestionKey::Catalog(raw),
        })
    }
}

/// A single autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub key: SuggestionKey,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SearchType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_i: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
}

/// Body of the autocomplete endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SearchType>,
}

/// Fetch suggestions for a partial query.
///
/// Blank queries return an empty list without contacting the catalog.
/// Upstream errors are logged and also yield an empty list.
pub async fn fetch_suggestions(
    client: &HttpClient,
    catalog: &OpenLibrary,
    query: &str,
    kind: SearchType,
) -> Vec<Suggestion> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let backend = get_backend(kind);
    match backend.suggest(client, catalog, query, MAX_SUGGESTIONS).await {
        Ok(mut suggestions) => {
            suggestions.truncate(MAX_SUGGESTIONS);
            debug!(
                "{} backend returned {} suggestions for '{}'",
                backend.name(),
                suggestions.len(),
                query
            );
            suggestions
        }
        Err(e) => {
            error!("Suggestion lookup for '{}' failed: {:#}", query, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_key_serialization() {
        let catalog = SuggestionKey::Catalog("/works/OL45804W".to_string());
        assert_eq!(serde_json::to_value(&catalog).unwrap(), json!("/works/OL45804W"));

        let synthesized = SuggestionKey::synthesize();
        let encoded = serde_json::to_string(&synthesized).unwrap();
        assert!(encoded.starts_with("\"generated:"));
        let decoded: SuggestionKey = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, synthesized);
    }

    #[test]
    fn test_from_upstream() {
        assert!(!SuggestionKey::from_upstream(Some("OL1A".to_string())).is_synthesized());
        assert!(SuggestionKey::from_upstream(Some(String::new())).is_synthesized());
        assert!(SuggestionKey::from_upstream(None).is_synthesized());
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let catalog = OpenLibrary::new(server.uri());
        assert!(fetch_suggestions(&client, &catalog, "   ", SearchType::Title)
            .await
            .is_empty());
        assert!(fetch_suggestions(&client, &catalog, "", SearchType::Author)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_results_are_capped() {
        let server = MockServer::start().await;
        let docs: Vec<_> = (0..8)
            .map(|i| json!({ "key": format!("/works/OL{}W", i), "title": format!("Book {}", i) }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("title", "book"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "docs": docs })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let catalog = OpenLibrary::new(server.uri());
        let suggestions = fetch_suggestions(&client, &catalog, "book", SearchType::Title).await;
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0].title, "Book 0");
    }

    #[tokio::test]
    async fn test_author_results_are_capped() {
        let server = MockServer::start().await;
        let docs: Vec<_> = (0..9)
            .map(|i| json!({ "key": format!("OL{}A", i), "name": format!("Author {}", i) }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/search/authors.json"))
            .and(query_param("q", "auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "docs": docs })))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let catalog = OpenLibrary::new(server.uri());
        let suggestions = fetch_suggestions(&client, &catalog, "auth", SearchType::Author).await;
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert!(suggestions.iter().all(|s| s.kind == SearchType::Author));
        assert_eq!(suggestions[4].title, "Author 4");
    }

    #[tokio::test]
    async fn test_upstream_failure_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let catalog = OpenLibrary::new(server.uri());
        let suggestions = fetch_suggestions(&client, &catalog, "har", SearchType::Author).await;
        assert!(suggestions.is_empty());
    }
}
