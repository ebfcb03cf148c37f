use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Deployment
    pub environment: String,
    pub port: u16,

    // Translation provider
    pub provider_api_url: String,
    pub provider_api_key: String,
    pub provider_timeout_secs: u64,

    // Translation cache
    pub cache_capacity: usize,

    // Optional shared key for the translate endpoints
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),

            // Translation provider
            provider_api_url: std::env::var("TRANSLATION_API_URL")
                .context("TRANSLATION_API_URL not set")?,
            provider_api_key: std::env::var("TRANSLATION_API_KEY")
                .context("TRANSLATION_API_KEY not set")?,
            provider_timeout_secs: std::env::var("TRANSLATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            // Cache
            cache_capacity: std::env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4096),

            // Endpoint auth (disabled when unset)
            api_key: std::env::var("API_KEY").ok().filter(|v| !v.is_empty()),
        })
    }

    /// Whether the service runs in production (controls the Secure cookie flag).
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
