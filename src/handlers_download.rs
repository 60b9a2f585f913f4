use serde::Deserialize;
use std::sync::Arc;
use warp::{reject, Filter, Rejection, Reply};

use crate::download::{fetch_attachment, DownloadError};
use crate::http_client::RemoteFetcher;
use crate::warp_helpers::{with_fetcher, UpstreamError, ValidationError};

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub url: Option<String>,
}

/// Streams a remote media file back as an attachment so the browser saves it
/// instead of navigating to it.
pub async fn download_file(
    query: DownloadQuery,
    fetcher: Arc<dyn RemoteFetcher>,
) -> Result<impl Reply, Rejection> {
    match fetch_attachment(fetcher.as_ref(), query.url.as_deref()).await {
        Ok(file) => {
            let disposition = file.content_disposition();
            let reply = warp::reply::with_header(file.bytes, "content-type", file.content_type);
            let reply = warp::reply::with_header(reply, "content-disposition", disposition);
            Ok(reply)
        }
        Err(DownloadError::Upstream(e)) => {
            log::error!("Download of {:?} failed: {}", query.url, e);
            Err(reject::custom(UpstreamError {
                message: DownloadError::Upstream(e).to_string(),
            }))
        }
        Err(e) => {
            log::warn!("Rejected download request: {}", e);
            Err(reject::custom(ValidationError {
                message: e.to_string(),
            }))
        }
    }
}

pub fn build_download_routes(
    fetcher: Arc<dyn RemoteFetcher>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(warp::path("download"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<DownloadQuery>())
        .and(with_fetcher(fetcher))
        .and_then(download_file)
}
