pub mod client;
pub mod config;
pub mod download;
pub mod fetch_cache;
pub mod filters;
pub mod format;
pub mod forms;
pub mod handlers_api;
pub mod handlers_download;
pub mod handlers_health;
pub mod handlers_pages;
pub mod http_client;
pub mod media_api;
pub mod media_types;
pub mod pages;
pub mod share;
pub mod suggestions;
pub mod warp_helpers;
