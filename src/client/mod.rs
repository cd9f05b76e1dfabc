//! Client side of Book Finder
//!
//! Search state, history persistence and debounced autocomplete that
//! talk to the proxy through [`BookApi`], plus HTML rendering of that state.

pub mod api;
pub mod autocomplete;
pub mod history;
pub mod orchestrator;
pub mod state;
pub mod storage;
pub mod view;

pub use api::{BookApi, ClientError, ProxyApi};
pub use autocomplete::{AutocompleteController, SuggestionPanel, DEFAULT_DEBOUNCE};
pub use history::{HistoryEntry, SearchHistory, DEFAULT_HISTORY_CAP, HISTORY_KEY};
pub use orchestrator::SearchOrchestrator;
pub use state::{
    update, Action, Category, Effect, SearchOutcome, SearchParams, SearchStatus, UiState,
    MAX_DISPLAY_RESULTS, POPULAR_CATEGORIES,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use view::View;
