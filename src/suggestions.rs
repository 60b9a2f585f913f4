use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::fetch_cache::FetchCache;
use crate::http_client::{ApiError, HttpClient};
use crate::media_types::WordSuggestion;

/// Number of autocomplete candidates shown under the search bar.
pub const MAX_SUGGESTIONS: usize = 6;

#[async_trait]
pub trait SuggestionApi: Send + Sync {
    async fn suggest(&self, prefix: &str) -> Result<Vec<WordSuggestion>, ApiError>;
}

/// Word-suggestion client for the Datamuse `/sug` endpoint.
pub struct DatamuseClient {
    http: HttpClient,
    base: Url,
    cache: FetchCache,
}

impl DatamuseClient {
    pub fn new(http: HttpClient, config: &UpstreamConfig, cache_ttl: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            http,
            base: Url::parse(&config.suggestion_api_uri)?,
            cache: FetchCache::new(cache_ttl),
        })
    }

    pub fn suggestion_url(&self, prefix: &str) -> Result<Url, ApiError> {
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse_with_params(&format!("{}/sug", base), [("s", prefix)])?)
    }
}

#[async_trait]
impl SuggestionApi for DatamuseClient {
    async fn suggest(&self, prefix: &str) -> Result<Vec<WordSuggestion>, ApiError> {
        let url = self.suggestion_url(prefix)?;
        let key = url.to_string();

        let data = self
            .cache
            .get_or_fetch(&key, || self.http.get_json(url, Vec::new()))
            .await?;

        let mut suggestions: Vec<WordSuggestion> = serde_json::from_value(data)?;
        suggestions.truncate(MAX_SUGGESTIONS);
        Ok(suggestions)
    }
}
