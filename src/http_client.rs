use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Upstream returned status {0}")]
    Status(u16),
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Refusing to follow cursor outside the media API: {0}")]
    ForeignCursor(String),
    #[error("Background task failed: {0}")]
    Task(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status(404))
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Task(err.to_string())
    }
}

/// Raw bytes of a remote resource plus the content type it was served with.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Fetches arbitrary remote resources for the download proxy.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<RemoteFile, ApiError>;
}

/// Blocking ureq agent driven from the tokio blocking pool.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }

    pub async fn get_text(
        &self,
        url: Url,
        headers: Vec<(&'static str, String)>,
    ) -> Result<String, ApiError> {
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || {
            let mut request = agent.get(url.as_str());
            for (name, value) in headers {
                request = request.header(name, value);
            }

            let mut response = request.call()?;
            let status = response.status();
            if !status.is_success() {
                log::warn!("GET {} returned {}", url, status);
                return Err(ApiError::Status(status.as_u16()));
            }

            Ok(response.body_mut().read_to_string()?)
        })
        .await?
    }

    pub async fn get_json<T>(
        &self,
        url: Url,
        headers: Vec<(&'static str, String)>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let body = self.get_text(url, headers).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_bytes(&self, url: Url) -> Result<RemoteFile, ApiError> {
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || {
            let mut response = agent.get(url.as_str()).call()?;
            let status = response.status();
            if !status.is_success() {
                log::warn!("GET {} returned {}", url, status);
                return Err(ApiError::Status(status.as_u16()));
            }

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            // Media files routinely exceed ureq's default body limit.
            let bytes = response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_vec()?;

            Ok(RemoteFile {
                bytes,
                content_type,
            })
        })
        .await?
    }
}

#[async_trait]
impl RemoteFetcher for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<RemoteFile, ApiError> {
        self.get_bytes(url.clone()).await
    }
}
