use async_trait::async_trait;
use url::Url;

use crate::config::UpstreamConfig;
use crate::filters::FilterState;
use crate::http_client::{ApiError, HttpClient};
use crate::media_types::{
    MediaKind, MediaRecord, Photo, PhotoSearchResponse, SearchPage, Video, VideoSearchResponse,
};

/// Upper bound the media API accepts for `per_page`.
const MAX_PER_PAGE: u32 = 80;

/// Where pages of `T` come from: a first page for a query, then cursors.
#[async_trait]
pub trait PageSource<T: MediaRecord>: Send + Sync {
    async fn first_page(&self, query: &str, filters: &FilterState)
        -> Result<SearchPage<T>, ApiError>;

    async fn page_at(&self, cursor: &str) -> Result<SearchPage<T>, ApiError>;
}

#[async_trait]
pub trait RecordSource<T: MediaRecord>: Send + Sync {
    async fn record(&self, id: u64) -> Result<T, ApiError>;
}

/// Everything the server routes read from the media API.
pub trait MediaCatalog:
    PageSource<Photo> + PageSource<Video> + RecordSource<Photo> + RecordSource<Video>
{
}

impl<C> MediaCatalog for C where
    C: PageSource<Photo> + PageSource<Video> + RecordSource<Photo> + RecordSource<Video>
{
}

/// Client for the Pexels-shaped media API.
#[derive(Clone)]
pub struct PexelsClient {
    http: HttpClient,
    base: Url,
    api_key: String,
    per_page: u32,
}

impl PexelsClient {
    pub fn new(http: HttpClient, config: &UpstreamConfig, per_page: u32) -> Result<Self, ApiError> {
        Ok(Self {
            http,
            base: Url::parse(&config.media_api_uri)?,
            api_key: config.media_api_key.clone(),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }

    pub fn search_url(
        &self,
        kind: MediaKind,
        query: &str,
        filters: &FilterState,
    ) -> Result<Url, ApiError> {
        let path = match kind {
            MediaKind::Photos => "/v1/search",
            MediaKind::Videos => "/videos/search",
        };

        let mut params: Vec<(&str, String)> = vec![("query", query.to_string())];
        params.extend(filters.search_params(kind));
        params.push(("per_page", self.per_page.to_string()));

        Ok(Url::parse_with_params(self.endpoint(path)?.as_str(), params)?)
    }

    pub fn record_url(&self, kind: MediaKind, id: u64) -> Result<Url, ApiError> {
        match kind {
            MediaKind::Photos => self.endpoint(&format!("/v1/photos/{}", id)),
            MediaKind::Videos => self.endpoint(&format!("/videos/videos/{}", id)),
        }
    }

    /// Next-page cursors are opaque URLs; only ones on the API's own origin are followed.
    pub fn cursor_url(&self, cursor: &str) -> Result<Url, ApiError> {
        let url = Url::parse(cursor)?;
        if url.origin() != self.base.origin() {
            return Err(ApiError::ForeignCursor(cursor.to_string()));
        }
        Ok(url)
    }

    fn auth_headers(&self) -> Vec<(&'static str, String)> {
        vec![("Authorization", self.api_key.clone())]
    }

    pub async fn search_photos(
        &self,
        query: &str,
        filters: &FilterState,
    ) -> Result<SearchPage<Photo>, ApiError> {
        let url = self.search_url(MediaKind::Photos, query, filters)?;
        log::debug!("Searching photos: {}", url);
        let response: PhotoSearchResponse = self.http.get_json(url, self.auth_headers()).await?;
        Ok(response.into())
    }

    pub async fn search_videos(
        &self,
        query: &str,
        filters: &FilterState,
    ) -> Result<SearchPage<Video>, ApiError> {
        let url = self.search_url(MediaKind::Videos, query, filters)?;
        log::debug!("Searching videos: {}", url);
        let response: VideoSearchResponse = self.http.get_json(url, self.auth_headers()).await?;
        Ok(response.into())
    }

    pub async fn photo_page(&self, cursor: &str) -> Result<SearchPage<Photo>, ApiError> {
        let url = self.cursor_url(cursor)?;
        let response: PhotoSearchResponse = self.http.get_json(url, self.auth_headers()).await?;
        Ok(response.into())
    }

    pub async fn video_page(&self, cursor: &str) -> Result<SearchPage<Video>, ApiError> {
        let url = self.cursor_url(cursor)?;
        let response: VideoSearchResponse = self.http.get_json(url, self.auth_headers()).await?;
        Ok(response.into())
    }

    pub async fn get_photo(&self, id: u64) -> Result<Photo, ApiError> {
        let url = self.record_url(MediaKind::Photos, id)?;
        self.http.get_json(url, self.auth_headers()).await
    }

    pub async fn get_video(&self, id: u64) -> Result<Video, ApiError> {
        let url = self.record_url(MediaKind::Videos, id)?;
        self.http.get_json(url, self.auth_headers()).await
    }
}

#[async_trait]
impl PageSource<Photo> for PexelsClient {
    async fn first_page(
        &self,
        query: &str,
        filters: &FilterState,
    ) -> Result<SearchPage<Photo>, ApiError> {
        self.search_photos(query, filters).await
    }

    async fn page_at(&self, cursor: &str) -> Result<SearchPage<Photo>, ApiError> {
        self.photo_page(cursor).await
    }
}

#[async_trait]
impl PageSource<Video> for PexelsClient {
    async fn first_page(
        &self,
        query: &str,
        filters: &FilterState,
    ) -> Result<SearchPage<Video>, ApiError> {
        self.search_videos(query, filters).await
    }

    async fn page_at(&self, cursor: &str) -> Result<SearchPage<Video>, ApiError> {
        self.video_page(cursor).await
    }
}

#[async_trait]
impl RecordSource<Photo> for PexelsClient {
    async fn record(&self, id: u64) -> Result<Photo, ApiError> {
        self.get_photo(id).await
    }
}

#[async_trait]
impl RecordSource<Video> for PexelsClient {
    async fn record(&self, id: u64) -> Result<Video, ApiError> {
        self.get_video(id).await
    }
}
