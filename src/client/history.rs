use std::sync::Arc;

use super::storage::{Storage, StorageResult};

/// Local storage key holding the JSON array of recent searches.
pub const HISTORY_KEY: &str = "searchHistory";
pub const MAX_HISTORY: usize = 10;

/// Persistence behind the search history, swappable for any backend.
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> StorageResult<Vec<String>>;
    fn save(&self, entries: &[String]) -> StorageResult<()>;
    fn clear(&self) -> StorageResult<()>;
}

/// Stores the history as JSON under [`HISTORY_KEY`].
pub struct LocalHistoryStore {
    storage: Arc<dyn Storage>,
}

impl LocalHistoryStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl HistoryStore for LocalHistoryStore {
    fn load(&self) -> StorageResult<Vec<String>> {
        match self.storage.get_item(HISTORY_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[String]) -> StorageResult<()> {
        self.storage
            .set_item(HISTORY_KEY, &serde_json::to_string(entries)?)
    }

    fn clear(&self) -> StorageResult<()> {
        self.storage.remove_item(HISTORY_KEY)
    }
}

/// Most-recent-first, deduplicated list of past queries, capped at [`MAX_HISTORY`].
pub struct SearchHistory {
    store: Arc<dyn HistoryStore>,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Unreadable history is treated as empty rather than failing the search bar.
    pub fn entries(&self) -> Vec<String> {
        match self.store.load() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring unreadable search history: {}", e);
                Vec::new()
            }
        }
    }

    pub fn record(&self, query: &str) -> StorageResult<Vec<String>> {
        let query = query.trim();
        let mut entries = self.entries();
        if query.is_empty() {
            return Ok(entries);
        }

        entries.retain(|entry| entry != query);
        entries.insert(0, query.to_string());
        entries.truncate(MAX_HISTORY);

        self.store.save(&entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.store.clear()
    }
}
