use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;
use warp::http::StatusCode;
use warp::Reply;

use image_studio::handlers_download::{download_file, DownloadQuery};
use image_studio::http_client::{ApiError, RemoteFetcher, RemoteFile};
use image_studio::warp_helpers::{handle_rejection, UpstreamError, ValidationError};

struct StubFetcher {
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
    response: fn() -> Result<RemoteFile, ApiError>,
}

impl StubFetcher {
    fn new(response: fn() -> Result<RemoteFile, ApiError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
            response,
        })
    }
}

#[async_trait]
impl RemoteFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<RemoteFile, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        (self.response)()
    }
}

fn jpeg() -> Result<RemoteFile, ApiError> {
    Ok(RemoteFile {
        bytes: vec![0xFF, 0xD8, 0xFF],
        content_type: Some("image/jpeg".to_string()),
    })
}

fn untyped() -> Result<RemoteFile, ApiError> {
    Ok(RemoteFile {
        bytes: b"data".to_vec(),
        content_type: None,
    })
}

fn server_error() -> Result<RemoteFile, ApiError> {
    Err(ApiError::Status(500))
}

fn query(url: Option<&str>) -> DownloadQuery {
    DownloadQuery {
        url: url.map(str::to_string),
    }
}

#[tokio::test]
async fn test_download_sets_attachment_headers() {
    let fetcher = StubFetcher::new(jpeg);
    let url = "https://images.pexels.com/photos/2014422/pexels-photo-2014422.jpeg?auto=compress";

    let response = download_file(query(Some(url)), fetcher.clone())
        .await
        .unwrap()
        .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"pexels-photo-2014422.jpeg\""
    );
    assert_eq!(fetcher.requested.lock().unwrap().as_slice(), [url]);
}

#[tokio::test]
async fn test_download_defaults_content_type_and_filename() {
    let fetcher = StubFetcher::new(untyped);

    let response = download_file(query(Some("https://videos.pexels.com/")), fetcher)
        .await
        .unwrap()
        .into_response();

    assert_eq!(response.headers()["content-type"], "application/octet-stream");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"file\""
    );
}

#[tokio::test]
async fn test_missing_url_is_rejected_without_fetching() {
    let fetcher = StubFetcher::new(jpeg);

    for missing in [None, Some(""), Some("   ")] {
        let rejection = match download_file(query(missing), fetcher.clone()).await {
            Ok(_) => panic!("download without url must be rejected"),
            Err(rejection) => rejection,
        };
        assert_eq!(
            rejection.find::<ValidationError>().map(|e| e.message.as_str()),
            Some("Missing URL")
        );

        let response = handle_rejection(rejection).await.unwrap().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_non_http_url_is_rejected() {
    let fetcher = StubFetcher::new(jpeg);

    for bad in ["ftp://example.com/a.jpg", "javascript:alert(1)", "/relative/path.png"] {
        let rejection = match download_file(query(Some(bad)), fetcher.clone()).await {
            Ok(_) => panic!("{} must be rejected", bad),
            Err(rejection) => rejection,
        };
        assert!(rejection.find::<ValidationError>().is_some());
    }

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upstream_failure_maps_to_bad_gateway() {
    let fetcher = StubFetcher::new(server_error);

    let rejection = match download_file(query(Some("https://images.pexels.com/a.jpeg")), fetcher).await {
        Ok(_) => panic!("upstream failure must be rejected"),
        Err(rejection) => rejection,
    };
    assert!(rejection.find::<UpstreamError>().is_some());

    let response = handle_rejection(rejection).await.unwrap().into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
