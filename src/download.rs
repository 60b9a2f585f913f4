use url::Url;

use crate::http_client::{ApiError, RemoteFetcher};

pub const FALLBACK_FILENAME: &str = "file";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Missing URL")]
    MissingUrl,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to fetch remote file: {0}")]
    Upstream(#[from] ApiError),
}

/// A remote file ready to be served as an attachment.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

impl DownloadedFile {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Validates the `url` query parameter. Only absolute http(s) URLs pass.
pub fn parse_target(raw: Option<&str>) -> Result<Url, DownloadError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(DownloadError::MissingUrl);
    }

    let url = Url::parse(raw).map_err(|e| DownloadError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DownloadError::InvalidUrl(format!(
            "unsupported scheme {}",
            other
        ))),
    }
}

/// Last path segment of the URL, or [`FALLBACK_FILENAME`] when there is none.
pub fn attachment_filename(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    let decoded = urlencoding::decode(segment)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    let name: String = decoded
        .chars()
        .filter(|c| *c != '"' && *c != '\\' && !c.is_control())
        .collect();

    if name.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        name
    }
}

pub async fn fetch_attachment(
    fetcher: &dyn RemoteFetcher,
    raw: Option<&str>,
) -> Result<DownloadedFile, DownloadError> {
    let url = parse_target(raw)?;
    let remote = fetcher.fetch(&url).await?;

    Ok(DownloadedFile {
        bytes: remote.bytes,
        content_type: remote
            .content_type
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
        filename: attachment_filename(&url),
    })
}
