//! Client search state
//!
//! `update` is a pure reducer: it takes the current state and an action and
//! returns the next state plus the effects the caller must perform. Every
//! submission bumps a generation counter and only the response carrying the
//! current generation is applied.

use super::history::{HistoryEntry, SearchHistory};
use crate::catalog::BookRecord;
use crate::query::{SearchFilters, SearchType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum records shown for one search
pub const MAX_DISPLAY_RESULTS: usize = 20;

pub const NO_RESULTS_MESSAGE: &str = "No results found. Try a different search term.";
pub const FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Parameters of one search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: SearchType,
    #[serde(default)]
    pub filters: SearchFilters,
}

impl SearchParams {
    pub fn new(query: impl Into<String>, kind: SearchType) -> Self {
        Self {
            query: query.into(),
            kind,
            filters: SearchFilters::default(),
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters.normalized();
        self
    }

    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

impl From<&HistoryEntry> for SearchParams {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            query: entry.query.clone(),
            kind: entry.kind,
            filters: entry.filters.clone(),
        }
    }
}

/// Shortcut search shown on the empty page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub query: &'static str,
    pub kind: SearchType,
}

pub const POPULAR_CATEGORIES: [Category; 6] = [
    Category { name: "Fiction", query: "fiction", kind: SearchType::Subject },
    Category { name: "Science", query: "science", kind: SearchType::Subject },
    Category { name: "History", query: "history", kind: SearchType::Subject },
    Category { name: "Fantasy", query: "fantasy", kind: SearchType::Subject },
    Category { name: "Biography", query: "biography", kind: SearchType::Subject },
    Category { name: "Self-Help", query: "self-help", kind: SearchType::Subject },
];

/// Where the current search stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(&'static str),
}

/// Result of a book fetch
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<BookRecord>),
    Failed,
}

/// Inputs to the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Submit(SearchParams),
    Resolved { generation: u64, outcome: SearchOutcome },
    SelectHistory(usize),
    SelectCategory(usize),
    RemoveHistory(usize),
    ClearHistory,
}

/// Work requested by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchBooks { generation: u64, params: SearchParams },
    PersistHistory,
    ClearStorage,
}

/// Complete client search state
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Parameters of the latest submitted search
    pub params: Option<SearchParams>,
    pub status: SearchStatus,
    /// Displayed records
    pub books: Vec<BookRecord>,
    pub history: SearchHistory,
    pub display_limit: usize,
    generation: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(SearchHistory::default(), MAX_DISPLAY_RESULTS)
    }
}

impl UiState {
    pub fn new(history: SearchHistory, display_limit: usize) -> Self {
        Self {
            params: None,
            status: SearchStatus::Idle,
            books: Vec::new(),
            history,
            display_limit,
            generation: 0,
        }
    }

    /// Generation of the latest submission
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn error(&self) -> Option<&'static str> {
        match self.status {
            SearchStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// True before anything was searched
    pub fn is_pristine(&self) -> bool {
        self.params.is_none()
    }
}

/// Apply an action. `now` stamps new history entries.
pub fn update(mut state: UiState, action: Action, now: DateTime<Utc>) -> (UiState, Vec<Effect>) {
    match action {
        Action::Submit(params) => submit(state, params),
        Action::SelectHistory(index) => match state.history.get(index).map(SearchParams::from) {
            Some(params) => submit(state, params),
            None => (state, vec![]),
        },
        Action::SelectCategory(index) => match POPULAR_CATEGORIES.get(index) {
            Some(category) => submit(state, SearchParams::new(category.query, category.kind)),
            None => (state, vec![]),
        },
        Action::Resolved { generation, outcome } => {
            if generation != state.generation || !state.is_loading() {
                return (state, vec![]);
            }
            resolve(state, outcome, now)
        }
        Action::RemoveHistory(index) => {
            let effects = match state.history.remove(index) {
                Some(_) => vec![Effect::PersistHistory],
                None => vec![],
            };
            (state, effects)
        }
        Action::ClearHistory => {
            state.history.clear();
            (state, vec![Effect::ClearStorage])
        }
    }
}

fn submit(mut state: UiState, params: SearchParams) -> (UiState, Vec<Effect>) {
    if params.is_blank() {
        return (state, vec![]);
    }

    state.generation += 1;
    state.status = SearchStatus::Loading;
    state.books.clear();
    state.params = Some(params.clone());

    let effect = Effect::FetchBooks {
        generation: state.generation,
        params,
    };
    (state, vec![effect])
}

fn resolve(mut state: UiState, outcome: SearchOutcome, now: DateTime<Utc>) -> (UiState, Vec<Effect>) {
    let mut books = match outcome {
        SearchOutcome::Found(books) if !books.is_empty() => books,
        SearchOutcome::Found(_) => {
            state.status = SearchStatus::Error(NO_RESULTS_MESSAGE);
            return (state, vec![]);
        }
        SearchOutcome::Failed => {
            state.status = SearchStatus::Error(FAILURE_MESSAGE);
            return (state, vec![]);
        }
    };

    books.truncate(state.display_limit);
    state.status = SearchStatus::Success;

    let Some(params) = state.params.clone() else {
        state.books = books;
        return (state, vec![]);
    };

    state.history.record(HistoryEntry {
        query: params.query,
        kind: params.kind,
        timestamp: now,
        filters: params.filters,
        result_count: books.len(),
    });
    state.books = books;

    (state, vec![Effect::PersistHistory])
}
