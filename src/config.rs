use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub media_api_uri: String,
    pub media_api_key: String,
    pub suggestion_api_uri: String,
    pub request_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub public_url: String,
    pub per_page: u32,
    pub suggestion_cache_ttl_secs: u64,
    pub upstream: UpstreamConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let port: u16 = env::var("IMAGE_STUDIO_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        Ok(Config {
            port,
            host: env::var("IMAGE_STUDIO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            public_url: env::var("IMAGE_STUDIO_PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port))
                .trim_end_matches('/')
                .to_string(),
            per_page: env::var("IMAGE_STUDIO_PER_PAGE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            suggestion_cache_ttl_secs: env::var("IMAGE_STUDIO_SUGGESTION_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()?,
            upstream: UpstreamConfig {
                media_api_uri: env::var("PEXELS_API_URI")
                    .unwrap_or_else(|_| "https://api.pexels.com".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                media_api_key: env::var("PEXELS_API_KEY").unwrap_or_default(),
                suggestion_api_uri: env::var("DATAMUSE_API_URI")
                    .unwrap_or_else(|_| "https://api.datamuse.com".to_string())
                    .trim_end_matches('/')
                    .to_string(),
                request_timeout_secs: env::var("IMAGE_STUDIO_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
            },
        })
    }

    pub fn suggestion_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.suggestion_cache_ttl_secs)
    }
}
