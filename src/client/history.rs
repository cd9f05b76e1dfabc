//! Search history
//!
//! Most recent first, at most one entry per (query, type), optionally
//! capped. Persisted as a JSON array under a single storage key.

use super::storage::{Storage, StorageError};
use crate::query::{SearchFilters, SearchType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Storage key holding the history
pub const HISTORY_KEY: &str = "searchHistory";

/// Default history bound
pub const DEFAULT_HISTORY_CAP: Option<usize> = Some(5);

/// A completed search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: SearchType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub result_count: usize,
}

impl HistoryEntry {
    fn same_search(&self, query: &str, kind: SearchType) -> bool {
        self.query == query && self.kind == kind
    }
}

/// Ordered search history
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
    cap: Option<usize>,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}

impl SearchHistory {
    pub fn new(cap: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    /// Build from stored entries, dropping later duplicates and
    /// anything past the cap
    pub fn from_entries(entries: Vec<HistoryEntry>, cap: Option<usize>) -> Self {
        let mut history = Self::new(cap);
        for entry in entries {
            if !history
                .entries
                .iter()
                .any(|e| e.same_search(&entry.query, entry.kind))
            {
                history.entries.push(entry);
            }
        }
        history.enforce_cap();
        history
    }

    /// Add an entry at the front, replacing any entry for the same search
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries
            .retain(|e| !e.same_search(&entry.query, entry.kind));
        self.entries.insert(0, entry);
        self.enforce_cap();
    }

    /// Remove the entry at `index`
    pub fn remove(&mut self, index: usize) -> Option<HistoryEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    fn enforce_cap(&mut self) {
        if let Some(cap) = self.cap {
            self.entries.truncate(cap);
        }
    }

    /// Read the stored history. Unreadable or malformed content is logged
    /// and replaced by an empty history.
    pub fn load(storage: &dyn Storage, cap: Option<usize>) -> Self {
        match Self::try_load(storage, cap) {
            Ok(history) => history,
            Err(e) => {
                warn!("Resetting search history: {}", e);
                Self::new(cap)
            }
        }
    }

    fn try_load(storage: &dyn Storage, cap: Option<usize>) -> Result<Self, StorageError> {
        let entries = match storage.get(HISTORY_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<HistoryEntry>>(&raw)?,
            None => Vec::new(),
        };
        Ok(Self::from_entries(entries, cap))
    }

    /// Write the whole history
    pub fn save(&self, storage: &dyn Storage) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.entries)?;
        storage.set(HISTORY_KEY, &raw)
    }

    /// Delete the stored history
    pub fn clear_storage(storage: &dyn Storage) -> Result<(), StorageError> {
        storage.remove(HISTORY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::storage::MemoryStorage;
    use chrono::TimeZone;

    fn entry(query: &str, kind: SearchType, minute: u32) -> HistoryEntry {
        HistoryEntry {
            query: query.to_string(),
            kind,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            filters: SearchFilters::default(),
            result_count: 10,
        }
    }

    #[test]
    fn test_record_dedups_by_query_and_type() {
        let mut history = SearchHistory::new(None);
        history.record(entry("dune", SearchType::Title, 0));
        history.record(entry("dune", SearchType::Subject, 1));
        history.record(entry("emma", SearchType::Title, 2));
        history.record(entry("dune", SearchType::Title, 3));

        let entries = history.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].query, "dune");
        assert_eq!(entries[0].kind, SearchType::Title);
        assert_eq!(entries[0].timestamp.format("%M").to_string(), "03");
        assert_eq!(entries[1].query, "emma");
        assert_eq!(entries[2].kind, SearchType::Subject);
    }

    #[test]
    fn test_cap() {
        let mut capped = SearchHistory::new(Some(5));
        let mut uncapped = SearchHistory::new(None);
        for i in 0..8 {
            capped.record(entry(&format!("q{}", i), SearchType::Title, i));
            uncapped.record(entry(&format!("q{}", i), SearchType::Title, i));
        }
        assert_eq!(capped.len(), 5);
        assert_eq!(capped.entries()[0].query, "q7");
        assert_eq!(capped.entries()[4].query, "q3");
        assert_eq!(uncapped.len(), 8);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut history = SearchHistory::default();
        history.record(entry("a", SearchType::Title, 0));
        history.record(entry("b", SearchType::Title, 1));

        assert_eq!(history.remove(5), None);
        assert_eq!(history.remove(0).unwrap().query, "b");
        assert_eq!(history.len(), 1);

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let mut history = SearchHistory::default();
        history.record(entry("dune", SearchType::Title, 0));
        history.save(&storage).unwrap();

        let raw = storage.get(HISTORY_KEY).unwrap().unwrap();
        assert!(raw.contains("\"resultCount\":10"));
        assert!(raw.contains("\"type\":\"title\""));

        let loaded = SearchHistory::load(&storage, Some(5));
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_load_tolerates_older_entries() {
        let storage = MemoryStorage::new();
        storage
            .set(
                HISTORY_KEY,
                r#"[{"query":"dune","type":"title","timestamp":"2024-05-01T12:00:00.000Z"},
                    {"query":"dune","type":"title","timestamp":"2024-04-01T12:00:00.000Z"}]"#,
            )
            .unwrap();

        let loaded = SearchHistory::load(&storage, Some(5));
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries()[0].result_count, 0);
        assert!(loaded.entries()[0].filters.is_empty());
    }

    #[test]
    fn test_load_malformed_resets() {
        let storage = MemoryStorage::new();
        storage.set(HISTORY_KEY, "{not json").unwrap();
        assert!(SearchHistory::load(&storage, Some(5)).is_empty());

        storage.set(HISTORY_KEY, r#"[{"query": 3}]"#).unwrap();
        assert!(SearchHistory::load(&storage, None).is_empty());
    }

    #[test]
    fn test_load_applies_cap() {
        let storage = MemoryStorage::new();
        let mut history = SearchHistory::new(None);
        for i in 0..7 {
            history.record(entry(&format!("q{}", i), SearchType::Author, i));
        }
        history.save(&storage).unwrap();

        assert_eq!(SearchHistory::load(&storage, Some(5)).len(), 5);
        assert_eq!(SearchHistory::load(&storage, None).len(), 7);
    }
}
