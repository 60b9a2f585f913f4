use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use warp::{reject, Filter, Rejection, Reply};

use crate::filters::FilterState;
use crate::media_api::{MediaCatalog, PageSource, RecordSource};
use crate::media_types::{MediaRecord, Photo, Video};
use crate::suggestions::SuggestionApi;
use crate::warp_helpers::{upstream_rejection, with_catalog, with_suggestions, ValidationError};

#[derive(Debug, Deserialize)]
pub struct CursorQuery {
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub s: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

fn required(value: Option<&str>, name: &str) -> Result<String, Rejection> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(reject::custom(ValidationError {
            message: format!("Missing {}", name),
        })),
    }
}

async fn first_page<T, S>(
    source: &S,
    params: &HashMap<String, String>,
) -> Result<impl Reply, Rejection>
where
    T: MediaRecord + Serialize,
    S: PageSource<T> + ?Sized,
{
    let query = required(params.get("query").map(String::as_str), "query")?;
    let filters = FilterState::from_query_map(params);

    let page = source
        .first_page(&query, &filters)
        .await
        .map_err(|e| upstream_rejection(e, T::KIND.title()))?;
    Ok(warp::reply::json(&page))
}

async fn next_page<T, S>(source: &S, query: &CursorQuery) -> Result<impl Reply, Rejection>
where
    T: MediaRecord + Serialize,
    S: PageSource<T> + ?Sized,
{
    let cursor = required(query.cursor.as_deref(), "cursor")?;

    let page = source
        .page_at(&cursor)
        .await
        .map_err(|e| upstream_rejection(e, T::KIND.title()))?;
    Ok(warp::reply::json(&page))
}

async fn record<T, S>(source: &S, id: u64) -> Result<impl Reply, Rejection>
where
    T: MediaRecord + Serialize,
    S: RecordSource<T> + ?Sized,
{
    let item = source
        .record(id)
        .await
        .map_err(|e| upstream_rejection(e, T::KIND.label()))?;
    Ok(warp::reply::json(&item))
}

pub async fn search_photos(
    params: HashMap<String, String>,
    catalog: Arc<dyn MediaCatalog>,
) -> Result<impl Reply, Rejection> {
    first_page::<Photo, _>(catalog.as_ref(), &params).await
}

pub async fn search_videos(
    params: HashMap<String, String>,
    catalog: Arc<dyn MediaCatalog>,
) -> Result<impl Reply, Rejection> {
    first_page::<Video, _>(catalog.as_ref(), &params).await
}

pub async fn next_photos(
    query: CursorQuery,
    catalog: Arc<dyn MediaCatalog>,
) -> Result<impl Reply, Rejection> {
    next_page::<Photo, _>(catalog.as_ref(), &query).await
}

pub async fn next_videos(
    query: CursorQuery,
    catalog: Arc<dyn MediaCatalog>,
) -> Result<impl Reply, Rejection> {
    next_page::<Video, _>(catalog.as_ref(), &query).await
}

pub async fn get_photo(id: u64, catalog: Arc<dyn MediaCatalog>) -> Result<impl Reply, Rejection> {
    record::<Photo, _>(catalog.as_ref(), id).await
}

pub async fn get_video(id: u64, catalog: Arc<dyn MediaCatalog>) -> Result<impl Reply, Rejection> {
    record::<Video, _>(catalog.as_ref(), id).await
}

/// Empty prefixes answer with an empty list instead of hitting the API.
pub async fn get_suggestions(
    query: SuggestionQuery,
    suggestions: Arc<dyn SuggestionApi>,
) -> Result<impl Reply, Rejection> {
    let prefix = query.s.as_deref().map(str::trim).unwrap_or_default();
    if prefix.is_empty() {
        return Ok(warp::reply::json(&SuggestionsResponse {
            suggestions: Vec::new(),
        }));
    }

    let words = suggestions
        .suggest(prefix)
        .await
        .map_err(|e| upstream_rejection(e, "Suggestions"))?;

    Ok(warp::reply::json(&SuggestionsResponse {
        suggestions: words.into_iter().map(|w| w.word).collect(),
    }))
}

pub fn build_api_routes(
    catalog: Arc<dyn MediaCatalog>,
    suggestions: Arc<dyn SuggestionApi>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let photos_search = warp::path("api")
        .and(warp::path("photos"))
        .and(warp::path("search"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_catalog(catalog.clone()))
        .and_then(search_photos);

    let videos_search = warp::path("api")
        .and(warp::path("videos"))
        .and(warp::path("search"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_catalog(catalog.clone()))
        .and_then(search_videos);

    let photos_next = warp::path("api")
        .and(warp::path("photos"))
        .and(warp::path("next"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<CursorQuery>())
        .and(with_catalog(catalog.clone()))
        .and_then(next_photos);

    let videos_next = warp::path("api")
        .and(warp::path("videos"))
        .and(warp::path("next"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<CursorQuery>())
        .and(with_catalog(catalog.clone()))
        .and_then(next_videos);

    let photo_get = warp::path("api")
        .and(warp::path("photos"))
        .and(warp::path::param::<u64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and_then(get_photo);

    let video_get = warp::path("api")
        .and(warp::path("videos"))
        .and(warp::path::param::<u64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_catalog(catalog))
        .and_then(get_video);

    let suggestion_list = warp::path("api")
        .and(warp::path("suggestions"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<SuggestionQuery>())
        .and(with_suggestions(suggestions))
        .and_then(get_suggestions);

    photos_search
        .or(videos_search)
        .or(photos_next)
        .or(videos_next)
        .or(photo_get)
        .or(video_get)
        .or(suggestion_list)
}
