use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;

use warp::{reject, Filter, Rejection, Reply};

use crate::config::Config;
use crate::http_client::{ApiError, RemoteFetcher};
use crate::media_api::MediaCatalog;
use crate::suggestions::SuggestionApi;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub timestamp: String,
}

/// The media or suggestion API failed; the message is safe to show.
#[derive(Debug)]
pub struct UpstreamError {
    pub message: String,
}

impl reject::Reject for UpstreamError {}

impl From<ApiError> for UpstreamError {
    fn from(err: ApiError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct NotFoundError {
    pub what: &'static str,
}

impl reject::Reject for NotFoundError {}

#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
}

impl reject::Reject for ValidationError {}

/// Maps an API failure onto the rejection the error handler understands.
pub fn upstream_rejection(err: ApiError, what: &'static str) -> Rejection {
    if err.is_not_found() {
        return reject::custom(NotFoundError { what });
    }
    if let ApiError::ForeignCursor(_) | ApiError::InvalidUrl(_) = err {
        return reject::custom(ValidationError {
            message: err.to_string(),
        });
    }
    log::error!("Upstream request for {} failed: {}", what, err);
    reject::custom(UpstreamError::from(err))
}

pub fn with_catalog(
    catalog: Arc<dyn MediaCatalog>,
) -> impl Filter<Extract = (Arc<dyn MediaCatalog>,), Error = Infallible> + Clone {
    warp::any().map(move || catalog.clone())
}

pub fn with_suggestions(
    suggestions: Arc<dyn SuggestionApi>,
) -> impl Filter<Extract = (Arc<dyn SuggestionApi>,), Error = Infallible> + Clone {
    warp::any().map(move || suggestions.clone())
}

pub fn with_fetcher(
    fetcher: Arc<dyn RemoteFetcher>,
) -> impl Filter<Extract = (Arc<dyn RemoteFetcher>,), Error = Infallible> + Clone {
    warp::any().map(move || fetcher.clone())
}

pub fn with_config(
    config: Arc<Config>,
) -> impl Filter<Extract = (Arc<Config>,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;
    let timestamp = chrono::Utc::now().to_rfc3339();

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(not_found) = err.find::<NotFoundError>() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = format!("{} not found", not_found.what);
    } else if let Some(validation_error) = err.find::<ValidationError>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = validation_error.message.clone();
    } else if let Some(upstream_error) = err.find::<UpstreamError>() {
        code = warp::http::StatusCode::BAD_GATEWAY;
        message = upstream_error.message.clone();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method not allowed".to_string();
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal server error".to_string();
    }

    let error_response = ErrorResponse {
        error: message,
        code: code.as_u16(),
        timestamp,
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&error_response),
        code,
    ))
}

pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "OPTIONS"])
}
