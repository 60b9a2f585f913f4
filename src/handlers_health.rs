use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Reply};

use crate::config::Config;
use crate::warp_helpers::with_config;

pub async fn health_check() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// Ready once a media API key is configured; without one every search fails.
pub async fn ready_check(config: Arc<Config>) -> Result<impl Reply, Infallible> {
    let has_key = !config.upstream.media_api_key.is_empty();
    let (status, code) = if has_key {
        ("ready", StatusCode::OK)
    } else {
        ("missing media API key", StatusCode::SERVICE_UNAVAILABLE)
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({
            "status": status,
            "media_api": config.upstream.media_api_uri,
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
        code,
    ))
}

pub fn build_health_routes(
    config: Arc<Config>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let ready = warp::path("ready")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_config(config))
        .and_then(ready_check);

    health.or(ready)
}
