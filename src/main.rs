use log::{error, info, warn};
use std::net::{IpAddr, TcpListener};
use std::sync::Arc;
use warp::Filter;

use image_studio::config::Config;
use image_studio::handlers_api::build_api_routes;
use image_studio::handlers_download::build_download_routes;
use image_studio::handlers_health::build_health_routes;
use image_studio::handlers_pages::{build_fallback_route, build_page_routes};
use image_studio::http_client::{HttpClient, RemoteFetcher};
use image_studio::media_api::{MediaCatalog, PexelsClient};
use image_studio::suggestions::{DatamuseClient, SuggestionApi};
use image_studio::warp_helpers::{cors, handle_rejection};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Arc::new(Config::from_env()?);
    let port = config.port;
    let host: IpAddr = config.host.parse()?;

    info!("Starting Image Studio on {}:{}", host, port);
    info!("Media API: {}", config.upstream.media_api_uri);
    info!("Suggestion API: {}", config.upstream.suggestion_api_uri);

    if !is_port_available(host, port) {
        error!(
            "Port {} is already in use. Please stop any existing Image Studio instances or use a different port.",
            port
        );
        error!("You can check what's using the port with: lsof -i :{}", port);
        return Err(format!("Port {} is already in use", port).into());
    }

    let (catalog, suggestions, fetcher) = initialize_services(&config)?;

    let health_routes = build_health_routes(config.clone());
    let api_routes = build_api_routes(catalog.clone(), suggestions);
    let download_routes = build_download_routes(fetcher);
    let page_routes = build_page_routes(catalog, config.clone());

    let routes = health_routes
        .or(api_routes)
        .or(download_routes)
        .or(page_routes)
        .or(build_fallback_route())
        .with(cors())
        .with(warp::log("image_studio"))
        .recover(handle_rejection);

    info!(
        "Server started successfully, listening on {}",
        config.public_url
    );

    warp::serve(routes).run((host, port)).await;

    Ok(())
}

fn is_port_available(host: IpAddr, port: u16) -> bool {
    TcpListener::bind((host, port)).is_ok()
}

type Services = (
    Arc<dyn MediaCatalog>,
    Arc<dyn SuggestionApi>,
    Arc<dyn RemoteFetcher>,
);

fn initialize_services(config: &Config) -> Result<Services, Box<dyn std::error::Error>> {
    let http = HttpClient::new(config.upstream.request_timeout());

    let pexels = PexelsClient::new(http.clone(), &config.upstream, config.per_page)?;
    if !pexels.has_api_key() {
        warn!("PEXELS_API_KEY is not set; searches will be rejected by the media API");
    }

    let datamuse = DatamuseClient::new(
        http.clone(),
        &config.upstream,
        config.suggestion_cache_ttl(),
    )?;
    info!(
        "Suggestion cache TTL: {}s",
        config.suggestion_cache_ttl_secs
    );

    let catalog: Arc<dyn MediaCatalog> = Arc::new(pexels);
    let suggestions: Arc<dyn SuggestionApi> = Arc::new(datamuse);
    let fetcher: Arc<dyn RemoteFetcher> = Arc::new(http);
    Ok((catalog, suggestions, fetcher))
}
