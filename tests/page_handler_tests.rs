use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use warp::http::StatusCode;
use warp::Reply;

use image_studio::config::{Config, UpstreamConfig};
use image_studio::filters::{FilterState, Orientation};
use image_studio::handlers_api::{next_photos, search_videos, CursorQuery};
use image_studio::handlers_pages::{photo_page, photos_page, video_page, videos_page};
use image_studio::http_client::ApiError;
use image_studio::media_api::{MediaCatalog, PageSource, RecordSource};
use image_studio::media_types::{Photo, PhotoSrc, SearchPage, Video};
use image_studio::warp_helpers::{handle_rejection, ValidationError};

/// Catalog that records what it was asked and answers from fixed outcomes.
#[derive(Default)]
struct FakeCatalog {
    fail_with: Option<u16>,
    searches: Mutex<Vec<(String, FilterState)>>,
    cursors: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    fn outcome<T>(&self, value: T) -> Result<T, ApiError> {
        match self.fail_with {
            Some(status) => Err(ApiError::Status(status)),
            None => Ok(value),
        }
    }
}

#[async_trait]
impl PageSource<Photo> for FakeCatalog {
    async fn first_page(
        &self,
        query: &str,
        filters: &FilterState,
    ) -> Result<SearchPage<Photo>, ApiError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), filters.clone()));
        self.outcome(SearchPage::empty())
    }

    async fn page_at(&self, cursor: &str) -> Result<SearchPage<Photo>, ApiError> {
        self.cursors.lock().unwrap().push(cursor.to_string());
        self.outcome(SearchPage::empty())
    }
}

#[async_trait]
impl PageSource<Video> for FakeCatalog {
    async fn first_page(
        &self,
        query: &str,
        filters: &FilterState,
    ) -> Result<SearchPage<Video>, ApiError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.to_string(), filters.clone()));
        self.outcome(SearchPage::empty())
    }

    async fn page_at(&self, cursor: &str) -> Result<SearchPage<Video>, ApiError> {
        self.cursors.lock().unwrap().push(cursor.to_string());
        self.outcome(SearchPage::empty())
    }
}

#[async_trait]
impl RecordSource<Photo> for FakeCatalog {
    async fn record(&self, id: u64) -> Result<Photo, ApiError> {
        let photo = Photo {
            id,
            width: 10,
            height: 10,
            url: "https://www.pexels.com/photo/1/".to_string(),
            photographer: "Jane".to_string(),
            photographer_url: "https://www.pexels.com/@jane".to_string(),
            photographer_id: 1,
            avg_color: None,
            src: PhotoSrc {
                original: "https://images.pexels.com/photos/1/o.jpeg".to_string(),
                ..PhotoSrc::default()
            },
            alt: Some("A photo".to_string()),
            liked: false,
        };
        self.outcome(photo)
    }
}

#[async_trait]
impl RecordSource<Video> for FakeCatalog {
    async fn record(&self, _id: u64) -> Result<Video, ApiError> {
        Err(ApiError::Status(self.fail_with.unwrap_or(404)))
    }
}

fn config() -> Arc<Config> {
    Arc::new(Config {
        port: 3000,
        host: "127.0.0.1".to_string(),
        public_url: "http://localhost:3000".to_string(),
        per_page: 20,
        suggestion_cache_ttl_secs: 600,
        upstream: UpstreamConfig {
            media_api_uri: "https://api.pexels.com".to_string(),
            media_api_key: "key".to_string(),
            suggestion_api_uri: "https://api.datamuse.com".to_string(),
            request_timeout_secs: 30,
        },
    })
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn test_search_page_passes_decoded_query_and_filters() {
    let fake = Arc::new(FakeCatalog::default());
    let catalog: Arc<dyn MediaCatalog> = fake.clone();

    let response = photos_page(
        "red%20cars".to_string(),
        "orientation=landscape".to_string(),
        catalog,
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    let searches = fake.searches.lock().unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].0, "red cars");
    assert_eq!(
        searches[0].1,
        FilterState {
            orientation: Some(Orientation::Landscape),
            ..FilterState::default()
        }
    );
}

#[tokio::test]
async fn test_search_page_redirects_to_canonical_filters() {
    let fake = Arc::new(FakeCatalog::default());
    let catalog: Arc<dyn MediaCatalog> = fake.clone();

    let response = photos_page(
        "nature".to_string(),
        "orientation=&color=%23ff0000&size=".to_string(),
        catalog.clone(),
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/search/nature?color=FF0000");

    let response = videos_page(
        "red%20cars".to_string(),
        "ref=home&size=zzz&orientation=square".to_string(),
        catalog,
    )
    .await
    .unwrap()
    .into_response();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        "/search/videos/red%20cars?orientation=square&ref=home"
    );
    assert!(fake.searches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_page_survives_upstream_failure() {
    let catalog: Arc<dyn MediaCatalog> = Arc::new(FakeCatalog::failing(500));

    let response = photos_page("nature".to_string(), String::new(), catalog)
        .await
        .unwrap()
        .into_response();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.headers()["content-type"],
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn test_record_pages_map_upstream_status() {
    let catalog: Arc<dyn MediaCatalog> = Arc::new(FakeCatalog::default());

    let ok = photo_page(7, catalog.clone(), config()).await.unwrap().into_response();
    assert_eq!(ok.status(), StatusCode::OK);

    let missing = video_page(7, catalog, config()).await.unwrap().into_response();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let broken: Arc<dyn MediaCatalog> = Arc::new(FakeCatalog::failing(503));
    let unavailable = video_page(7, broken, config()).await.unwrap().into_response();
    assert_eq!(unavailable.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_next_page_requires_cursor() {
    let fake = Arc::new(FakeCatalog::default());
    let catalog: Arc<dyn MediaCatalog> = fake.clone();

    let rejection = match next_photos(CursorQuery { cursor: None }, catalog.clone()).await {
        Ok(_) => panic!("missing cursor must be rejected"),
        Err(rejection) => rejection,
    };
    assert!(rejection.find::<ValidationError>().is_some());
    assert!(fake.cursors.lock().unwrap().is_empty());

    let cursor = "https://api.pexels.com/v1/search/?page=2&query=nature";
    next_photos(
        CursorQuery {
            cursor: Some(cursor.to_string()),
        },
        catalog,
    )
    .await
    .unwrap();
    assert_eq!(fake.cursors.lock().unwrap().as_slice(), [cursor]);
}

#[tokio::test]
async fn test_api_search_failure_is_bad_gateway() {
    let catalog: Arc<dyn MediaCatalog> = Arc::new(FakeCatalog::failing(500));

    let rejection = match search_videos(params(&[("query", "ocean")]), catalog).await {
        Ok(_) => panic!("upstream failure must be rejected"),
        Err(rejection) => rejection,
    };
    let response = handle_rejection(rejection).await.unwrap().into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
