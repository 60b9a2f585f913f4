use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::{StatusCode, Uri};
use warp::{reject, Filter, Rejection, Reply};

use crate::config::Config;
use crate::filters::{canonical_query, with_query};
use crate::media_api::{MediaCatalog, PageSource, RecordSource};
use crate::media_types::{MediaKind, Photo, Video};
use crate::pages::{self, Card, SearchOutcome};
use crate::warp_helpers::{with_catalog, with_config, ValidationError};

/// Header search form submission.
#[derive(Debug, Deserialize)]
pub struct SearchFormQuery {
    pub q: Option<String>,
    pub kind: Option<MediaKind>,
}

/// Path segments may arrive still percent-encoded; undecodable ones are kept as-is.
pub fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn html_page(body: String, status: StatusCode) -> Box<dyn Reply> {
    Box::new(warp::reply::with_status(warp::reply::html(body), status))
}

pub async fn home_page() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::html(pages::render_home()))
}

/// Turns `/search?q=..&kind=..` into the canonical results path.
pub async fn search_redirect(form: SearchFormQuery) -> Result<impl Reply, Rejection> {
    let query = form.q.as_deref().map(str::trim).unwrap_or_default();
    let location = if query.is_empty() {
        "/".to_string()
    } else {
        let kind = form.kind.unwrap_or(MediaKind::Photos);
        format!("{}/{}", kind.search_path(), urlencoding::encode(query))
    };

    let uri: Uri = location.parse().map_err(|_| {
        reject::custom(ValidationError {
            message: "Invalid search query".to_string(),
        })
    })?;
    Ok(warp::redirect::see_other(uri))
}

async fn search_page<T, S>(source: &S, raw_query: &str, query_string: &str) -> Box<dyn Reply>
where
    T: Card,
    S: PageSource<T> + ?Sized,
{
    let query = decode_segment(raw_query);
    let (filters, canonical) = canonical_query(query_string);

    if canonical != query_string {
        let path = format!("{}/{}", T::KIND.search_path(), urlencoding::encode(&query));
        let location = with_query(&path, &canonical);
        match location.parse::<Uri>() {
            Ok(uri) => return Box::new(warp::redirect::see_other(uri)),
            Err(e) => log::warn!("Cannot redirect to {:?}: {}", location, e),
        }
    }

    match source.first_page(&query, &filters).await {
        Ok(page) => html_page(
            pages::render_search(&query, &filters, SearchOutcome::Loaded(&page)),
            StatusCode::OK,
        ),
        Err(e) => {
            log::error!("Failed to load {} for {:?}: {}", T::KIND.plural(), query, e);
            html_page(
                pages::render_search::<T>(&query, &filters, SearchOutcome::Failed),
                StatusCode::BAD_GATEWAY,
            )
        }
    }
}

/// Non-canonical filter queries (empty fields, `#` colors, odd order) are
/// redirected before anything is fetched.
pub async fn photos_page(
    raw_query: String,
    query_string: String,
    catalog: Arc<dyn MediaCatalog>,
) -> Result<Box<dyn Reply>, Rejection> {
    Ok(search_page::<Photo, _>(catalog.as_ref(), &raw_query, &query_string).await)
}

pub async fn videos_page(
    raw_query: String,
    query_string: String,
    catalog: Arc<dyn MediaCatalog>,
) -> Result<Box<dyn Reply>, Rejection> {
    Ok(search_page::<Video, _>(catalog.as_ref(), &raw_query, &query_string).await)
}

async fn record_page<T, S>(
    source: &S,
    id: u64,
    render: impl FnOnce(&T) -> String,
) -> Box<dyn Reply>
where
    T: Card,
    S: RecordSource<T> + ?Sized,
{
    match source.record(id).await {
        Ok(item) => html_page(render(&item), StatusCode::OK),
        Err(e) if e.is_not_found() => html_page(pages::render_not_found(), StatusCode::NOT_FOUND),
        Err(e) => {
            log::error!("Failed to load {} {}: {}", T::KIND.singular(), id, e);
            html_page(pages::render_unavailable(T::KIND), StatusCode::BAD_GATEWAY)
        }
    }
}

pub async fn photo_page(
    id: u64,
    catalog: Arc<dyn MediaCatalog>,
    config: Arc<Config>,
) -> Result<Box<dyn Reply>, Rejection> {
    let render = |photo: &Photo| pages::render_photo(photo, &config.public_url);
    Ok(record_page(catalog.as_ref(), id, render).await)
}

pub async fn video_page(
    id: u64,
    catalog: Arc<dyn MediaCatalog>,
    config: Arc<Config>,
) -> Result<Box<dyn Reply>, Rejection> {
    let render = |video: &Video| pages::render_video(video, &config.public_url);
    Ok(record_page(catalog.as_ref(), id, render).await)
}

/// HTML 404 for any GET outside `/api`; API paths keep the JSON error.
pub async fn not_found_page(path: warp::path::FullPath) -> Result<impl Reply, Rejection> {
    if path.as_str().starts_with("/api/") {
        return Err(reject::not_found());
    }
    Ok(warp::reply::with_status(
        warp::reply::html(pages::render_not_found()),
        StatusCode::NOT_FOUND,
    ))
}

pub fn build_page_routes(
    catalog: Arc<dyn MediaCatalog>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let home = warp::path::end().and(warp::get()).and_then(home_page);
    let query_string = warp::query::raw()
        .or(warp::any().map(String::new))
        .unify();

    let search_form = warp::path("search")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<SearchFormQuery>())
        .and_then(search_redirect);

    let videos_search = warp::path("search")
        .and(warp::path("videos"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(query_string.clone())
        .and(with_catalog(catalog.clone()))
        .and_then(videos_page);

    let photos_search = warp::path("search")
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(query_string)
        .and(with_catalog(catalog.clone()))
        .and_then(photos_page);

    let photo = warp::path("photo")
        .and(warp::path::param::<u64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_catalog(catalog.clone()))
        .and(with_config(config.clone()))
        .and_then(photo_page);

    let video = warp::path("video")
        .and(warp::path::param::<u64>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_catalog(catalog))
        .and(with_config(config))
        .and_then(video_page);

    home.or(search_form)
        .or(videos_search)
        .or(photos_search)
        .or(photo)
        .or(video)
}

pub fn build_fallback_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
{
    warp::get()
        .and(warp::path::full())
        .and_then(not_found_page)
}
