use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::client::storage::Storage;
use crate::http_client::ApiError;

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

struct CachedResponse {
    data: Value,
    stored_at: Instant,
}

#[derive(Serialize, Deserialize)]
struct PersistedResponse {
    data: Value,
    timestamp: i64,
}

/// Time-boxed response cache keyed by the exact request URL.
///
/// Entries are never evicted early and the map has no size bound; a stale
/// entry is simply refetched. With a fallback storage attached, successful
/// responses are mirrored there and served when the network fails.
pub struct FetchCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedResponse>>,
    fallback: Option<Arc<dyn Storage>>,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, storage: Arc<dyn Storage>) -> Self {
        self.fallback = Some(storage);
        self
    }

    /// Returns the cached value if it is still within the TTL.
    pub fn get(&self, url: &str) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(url)?;
        if entry.stored_at.elapsed() < self.ttl {
            log::debug!("Fetch cache hit for {}", url);
            Some(entry.data.clone())
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(&self, url: &str, data: &Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                url.to_string(),
                CachedResponse {
                    data: data.clone(),
                    stored_at: Instant::now(),
                },
            );
        }

        if let Some(storage) = &self.fallback {
            let persisted = PersistedResponse {
                data: data.clone(),
                timestamp: chrono::Utc::now().timestamp_millis(),
            };
            let result = serde_json::to_string(&persisted)
                .map_err(Into::into)
                .and_then(|json| storage.set_item(url, &json));
            if let Err(e) = result {
                log::warn!("Failed to persist cached response for {}: {}", url, e);
            }
        }
    }

    fn persisted(&self, url: &str) -> Option<Value> {
        let storage = self.fallback.as_ref()?;
        let json = storage.get_item(url).ok()??;
        serde_json::from_str::<PersistedResponse>(&json)
            .map(|persisted| persisted.data)
            .ok()
    }

    pub async fn get_or_fetch<F, Fut>(&self, url: &str, fetch: F) -> Result<Value, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ApiError>>,
    {
        if let Some(data) = self.get(url) {
            return Ok(data);
        }

        log::debug!("Fetch cache miss for {}", url);
        match fetch().await {
            Ok(data) => {
                self.store(url, &data);
                Ok(data)
            }
            Err(e) => {
                log::error!("Fetch error for {}: {}", url, e);
                match self.persisted(url) {
                    Some(data) => {
                        log::info!("Serving persisted response for {}", url);
                        Ok(data)
                    }
                    None => Err(e),
                }
            }
        }
    }
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
