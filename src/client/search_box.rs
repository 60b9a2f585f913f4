use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::history::SearchHistory;
use super::rate_limit::Debouncer;
use crate::media_types::{MediaKind, WordSuggestion};
use crate::suggestions::SuggestionApi;

/// Quiet period before the suggestion API is queried.
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(500);

/// Header search bar: free text with autocomplete and recent searches.
pub struct SearchBox {
    query: String,
    kind: MediaKind,
    suggestions: Arc<Mutex<Vec<WordSuggestion>>>,
    history: SearchHistory,
    debouncer: Debouncer,
    api: Arc<dyn SuggestionApi>,
}

impl SearchBox {
    pub fn new(api: Arc<dyn SuggestionApi>, history: SearchHistory) -> Self {
        Self {
            query: String::new(),
            kind: MediaKind::Photos,
            suggestions: Arc::new(Mutex::new(Vec::new())),
            history,
            debouncer: Debouncer::new(SUGGESTION_DEBOUNCE),
            api,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: MediaKind) {
        self.kind = kind;
    }

    pub fn suggestions(&self) -> Vec<WordSuggestion> {
        self.suggestions
            .lock()
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.entries()
    }

    fn set_suggestions(slot: &Mutex<Vec<WordSuggestion>>, value: Vec<WordSuggestion>) {
        if let Ok(mut list) = slot.lock() {
            *list = value;
        }
    }

    /// Text changed. Returns the handle of the scheduled lookup, if any.
    pub fn on_input(&mut self, text: &str) -> Option<JoinHandle<()>> {
        self.query = text.to_string();
        let prefix = text.trim().to_string();

        if prefix.is_empty() {
            self.debouncer.cancel();
            Self::set_suggestions(&self.suggestions, Vec::new());
            return None;
        }

        let api = self.api.clone();
        let slot = self.suggestions.clone();
        Some(self.debouncer.call(move |token| async move {
            let result = api.suggest(&prefix).await;

            // Checked under the lock so a concurrent clear cannot be overwritten.
            let Ok(mut list) = slot.lock() else {
                return;
            };
            if !token.is_current() {
                log::debug!("Discarding suggestions for superseded prefix {:?}", prefix);
                return;
            }
            match result {
                Ok(words) => *list = words,
                Err(e) => {
                    log::warn!("Suggestion lookup for {:?} failed: {}", prefix, e);
                    list.clear();
                }
            }
        }))
    }

    /// Records the query and returns the results path to navigate to.
    pub fn submit(&mut self) -> Option<String> {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return None;
        }

        self.debouncer.cancel();
        Self::set_suggestions(&self.suggestions, Vec::new());
        if let Err(e) = self.history.record(&query) {
            log::warn!("Failed to save search history: {}", e);
        }

        Some(format!(
            "{}/{}",
            self.kind.search_path(),
            urlencoding::encode(&query)
        ))
    }

    /// Picks a suggestion or history entry and submits it.
    pub fn select(&mut self, query: &str) -> Option<String> {
        self.query = query.to_string();
        self.submit()
    }

    pub fn clear_history(&self) {
        if let Err(e) = self.history.clear() {
            log::warn!("Failed to clear search history: {}", e);
        }
    }
}
