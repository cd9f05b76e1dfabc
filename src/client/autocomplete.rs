//! Debounced autocomplete
//!
//! Each keystroke supersedes the previous one: the pending timer is
//! aborted and the panel generation is bumped, so a fetch that still
//! completes for an older keystroke is discarded.

use super::api::BookApi;
use super::state::SearchParams;
use crate::autocomplete::{Suggestion, MAX_SUGGESTIONS};
use crate::config::ClientSettings;
use crate::query::SearchType;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default quiet period before suggestions are fetched
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Dropdown state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionPanel {
    pub query: String,
    pub kind: SearchType,
    pub suggestions: Vec<Suggestion>,
    pub open: bool,
    generation: u64,
}

/// Watches keystrokes and keeps the suggestion dropdown current
pub struct AutocompleteController {
    api: Arc<dyn BookApi>,
    delay: Duration,
    panel: Arc<Mutex<SuggestionPanel>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl AutocompleteController {
    pub fn new(api: Arc<dyn BookApi>) -> Self {
        Self::with_delay(api, DEFAULT_DEBOUNCE)
    }

    /// Controller using the configured debounce
    pub fn from_settings(api: Arc<dyn BookApi>, settings: &ClientSettings) -> Self {
        Self::with_delay(api, Duration::from_millis(settings.debounce_ms))
    }

    pub fn with_delay(api: Arc<dyn BookApi>, delay: Duration) -> Self {
        Self {
            api,
            delay,
            panel: Arc::new(Mutex::new(SuggestionPanel::default())),
            pending: Mutex::new(None),
        }
    }

    /// Current dropdown state
    pub async fn panel(&self) -> SuggestionPanel {
        self.panel.lock().await.clone()
    }

    /// Handle a change of the input text
    pub async fn on_input(&self, query: &str) {
        // Held until the new timer is installed so keystrokes apply in order
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let (generation, kind) = {
            let mut panel = self.panel.lock().await;
            panel.query = query.to_string();
            panel.generation += 1;
            if query.trim().is_empty() {
                panel.suggestions.clear();
                panel.open = false;
            }
            (panel.generation, panel.kind)
        };

        if !query.trim().is_empty() {
            *pending = Some(self.schedule(generation, query.to_string(), kind));
        }
    }

    /// Switch the search type and refresh suggestions for the current text
    pub async fn set_type(&self, kind: SearchType) {
        let query = {
            let mut panel = self.panel.lock().await;
            panel.kind = kind;
            panel.query.clone()
        };
        self.on_input(&query).await;
    }

    /// Close the dropdown, e.g. on a click outside it
    pub async fn dismiss(&self) {
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let mut panel = self.panel.lock().await;
        panel.open = false;
        panel.generation += 1;
    }

    /// Pick a suggestion. Returns the search to run with its title.
    pub async fn choose(&self, index: usize) -> Option<SearchParams> {
        let mut panel = self.panel.lock().await;
        let suggestion = panel.suggestions.get(index)?.clone();

        panel.query = suggestion.title.clone();
        panel.open = false;
        panel.generation += 1;

        Some(SearchParams::new(suggestion.title, panel.kind))
    }

    fn schedule(&self, generation: u64, query: String, kind: SearchType) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let panel = Arc::clone(&self.panel);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let result = api.suggest(&query, kind).await;

            let mut panel = panel.lock().await;
            if panel.generation != generation {
                debug!("Discarding suggestions for superseded query '{}'", query);
                return;
            }

            match result {
                Ok(mut suggestions) => {
                    suggestions.truncate(MAX_SUGGESTIONS);
                    panel.open = !suggestions.is_empty();
                    panel.suggestions = suggestions;
                }
                Err(e) => {
                    warn!("Suggestions for '{}' failed: {}", query, e);
                    panel.suggestions.clear();
                    panel.open = false;
                }
            }
        })
    }
}
