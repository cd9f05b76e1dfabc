//! Search orchestration
//!
//! Runs reducer effects: book fetches go through the `BookApi`, history
//! changes go to storage. State is only locked while the reducer runs,
//! never across a fetch.

use super::api::BookApi;
use super::history::SearchHistory;
use super::state::{update, Action, Effect, SearchOutcome, SearchParams, UiState};
use super::storage::Storage;
use crate::config::ClientSettings;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Drives searches and owns the client state
pub struct SearchOrchestrator {
    api: Arc<dyn BookApi>,
    storage: Arc<dyn Storage>,
    state: Mutex<UiState>,
}

impl SearchOrchestrator {
    /// Create an orchestrator, loading the stored history once
    pub fn new(api: Arc<dyn BookApi>, storage: Arc<dyn Storage>, settings: &ClientSettings) -> Self {
        let history = SearchHistory::load(storage.as_ref(), settings.history_cap);
        debug!("Loaded {} history entries", history.len());

        Self {
            api,
            storage,
            state: Mutex::new(UiState::new(history, settings.max_display_results)),
        }
    }

    /// Current state
    pub async fn snapshot(&self) -> UiState {
        self.state.lock().await.clone()
    }

    pub async fn submit(&self, params: SearchParams) {
        self.dispatch(Action::Submit(params)).await;
    }

    pub async fn select_history(&self, index: usize) {
        self.dispatch(Action::SelectHistory(index)).await;
    }

    pub async fn select_category(&self, index: usize) {
        self.dispatch(Action::SelectCategory(index)).await;
    }

    pub async fn remove_history(&self, index: usize) {
        self.dispatch(Action::RemoveHistory(index)).await;
    }

    pub async fn clear_history(&self) {
        self.dispatch(Action::ClearHistory).await;
    }

    /// Apply an action and run its effects to completion
    pub async fn dispatch(&self, action: Action) {
        let mut effects: VecDeque<Effect> = self.apply(action).await.into();

        while let Some(effect) = effects.pop_front() {
            match effect {
                Effect::FetchBooks { generation, params } => {
                    let outcome = self.fetch(&params).await;
                    effects.extend(self.apply(Action::Resolved { generation, outcome }).await);
                }
                Effect::PersistHistory => {
                    let history = self.state.lock().await.history.clone();
                    if let Err(e) = history.save(self.storage.as_ref()) {
                        warn!("Failed to persist search history: {}", e);
                    }
                }
                Effect::ClearStorage => {
                    if let Err(e) = SearchHistory::clear_storage(self.storage.as_ref()) {
                        warn!("Failed to clear stored search history: {}", e);
                    }
                }
            }
        }
    }

    async fn fetch(&self, params: &SearchParams) -> SearchOutcome {
        info!("Searching {} '{}'", params.kind, params.query);
        match self.api.search_books(params).await {
            Ok(page) => SearchOutcome::Found(page.docs),
            Err(e) => {
                error!("Book search for '{}' failed: {}", params.query, e);
                SearchOutcome::Failed
            }
        }
    }

    async fn apply(&self, action: Action) -> Vec<Effect> {
        let mut state = self.state.lock().await;

        if let Action::Resolved { generation, .. } = action {
            if generation != state.generation() {
                debug!(
                    "Discarding response for generation {} (latest is {})",
                    generation,
                    state.generation()
                );
            }
        }

        let (next, effects) = update(std::mem::take(&mut *state), action, Utc::now());
        *state = next;
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::Suggestion;
    use crate::catalog::{BookRecord, SearchPage};
    use crate::client::api::{ClientError, ProxyApi};
    use crate::client::history::HISTORY_KEY;
    use crate::client::state::{SearchStatus, FAILURE_MESSAGE};
    use crate::client::storage::MemoryStorage;
    use crate::client::View;
    use crate::config::Settings;
    use crate::network::HttpClient;
    use crate::query::SearchType;
    use crate::web::{create_router, AppState};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_test::assert_ok;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Answers every query with a fixed number of books after a per-query delay
    struct FakeApi {
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }

        fn books_for(query: &str) -> Vec<BookRecord> {
            let count = match query {
                "nothing" => 0,
                "slow" => 4,
                _ => 2,
            };
            (0..count)
                .map(|i| BookRecord {
                    title: Some(format!("{} {}", query, i)),
                    ..Default::default()
                })
                .collect()
        }
    }

    #[async_trait]
    impl BookApi for FakeApi {
        async fn search_books(&self, params: &SearchParams) -> Result<SearchPage, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match params.query.as_str() {
                "broken" => return Err(ClientError::Status(500)),
                "slow" => tokio::time::sleep(Duration::from_millis(500)).await,
                _ => tokio::time::sleep(Duration::from_millis(10)).await,
            }
            Ok(SearchPage {
                docs: Self::books_for(&params.query),
                ..Default::default()
            })
        }

        async fn suggest(&self, _query: &str, _kind: SearchType) -> Result<Vec<Suggestion>, ClientError> {
            Ok(vec![])
        }
    }

    fn orchestrator(api: Arc<FakeApi>, storage: Arc<MemoryStorage>) -> SearchOrchestrator {
        SearchOrchestrator::new(api, storage, &ClientSettings::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_persists_history() {
        let api = Arc::new(FakeApi::new());
        let storage = Arc::new(MemoryStorage::new());
        let orch = orchestrator(api.clone(), storage.clone());

        orch.submit(SearchParams::new("dune", SearchType::Title)).await;

        let state = orch.snapshot().await;
        assert_eq!(state.status, SearchStatus::Success);
        assert_eq!(state.books.len(), 2);

        let raw = assert_ok!(storage.get(HISTORY_KEY)).unwrap();
        assert!(raw.contains("\"query\":\"dune\""));

        // A new orchestrator picks the stored history up
        let reloaded = orchestrator(api, storage);
        assert_eq!(reloaded.snapshot().await.history.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_is_never_dispatched() {
        let api = Arc::new(FakeApi::new());
        let orch = orchestrator(api.clone(), Arc::new(MemoryStorage::new()));

        orch.submit(SearchParams::new("   ", SearchType::Author)).await;

        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(orch.snapshot().await.status, SearchStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_shows_generic_message() {
        let api = Arc::new(FakeApi::new());
        let storage = Arc::new(MemoryStorage::new());
        let orch = orchestrator(api, storage.clone());

        orch.submit(SearchParams::new("broken", SearchType::Title)).await;

        let state = orch.snapshot().await;
        assert_eq!(state.error(), Some(FAILURE_MESSAGE));
        assert!(state.history.is_empty());
        assert!(assert_ok!(storage.get(HISTORY_KEY)).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_submission_wins() {
        let api = Arc::new(FakeApi::new());
        let orch = orchestrator(api.clone(), Arc::new(MemoryStorage::new()));

        tokio::join!(
            orch.submit(SearchParams::new("slow", SearchType::Title)),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                orch.submit(SearchParams::new("fast", SearchType::Title)).await;
            }
        );

        let state = orch.snapshot().await;
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert_eq!(state.params.unwrap().query, "fast");
        assert_eq!(state.books, FakeApi::books_for("fast"));
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history.entries()[0].query, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_operations() {
        let storage = Arc::new(MemoryStorage::new());
        let orch = orchestrator(Arc::new(FakeApi::new()), storage.clone());

        orch.select_category(0).await;
        orch.submit(SearchParams::new("emma", SearchType::Title)).await;
        assert_eq!(orch.snapshot().await.history.len(), 2);

        orch.select_history(1).await;
        let state = orch.snapshot().await;
        assert_eq!(state.history.entries()[0].query, "fiction");
        assert_eq!(state.history.len(), 2);

        orch.remove_history(0).await;
        let raw = assert_ok!(storage.get(HISTORY_KEY)).unwrap();
        assert!(!raw.contains("fiction"));

        orch.clear_history().await;
        assert!(orch.snapshot().await.history.is_empty());
        assert!(assert_ok!(storage.get(HISTORY_KEY)).is_none());
    }

    #[tokio::test]
    async fn test_end_to_end_through_proxy() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("title", "dune"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "numFound": 3,
                "start": 0,
                "docs": [
                    { "key": "/works/OL893415W", "title": "Dune", "author_name": ["Frank Herbert"], "cover_i": 11481354 },
                    { "key": "/works/OL893416W", "title": "Dune Messiah" },
                    { "key": "/works/OL893417W", "title": "Children of Dune" }
                ]
            })))
            .expect(1)
            .mount(&upstream)
            .await;

        let mut settings = Settings::default();
        settings.upstream.base_url = upstream.uri();
        let app = create_router(AppState::from_settings(settings).unwrap());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let proxy_addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = ProxyApi::new(HttpClient::new().unwrap(), &format!("http://{}", proxy_addr)).unwrap();
        let storage = Arc::new(MemoryStorage::new());
        let orch = SearchOrchestrator::new(Arc::new(api), storage, &ClientSettings::default());

        orch.submit(SearchParams::new("dune", SearchType::Title)).await;

        let state = orch.snapshot().await;
        assert_eq!(state.status, SearchStatus::Success);
        assert!(state.error().is_none());
        assert_eq!(state.books.len(), 3);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history.entries()[0].result_count, 3);

        let html = View::new().unwrap().render_results(&state).unwrap();
        assert_eq!(html.matches("class=\"book-card\"").count(), 3);
    }
}
