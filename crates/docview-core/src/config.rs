//! Configuration module
//!
//! Client configuration is read from the environment (a `.env` file is
//! loaded first when present). `from_lookup` takes any key lookup so tests
//! never touch the process environment.

use std::env;
use std::path::PathBuf;

use crate::cache_types::CacheBackend;
use crate::url_kind::{UrlPatterns, DEFAULT_STORAGE_HOSTS};

const DEFAULT_API_URL: &str = "http://localhost:5000";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const CACHE_CAPACITY: usize = 256;
const VIEWPORT_WIDTH: u32 = 1280;

/// Configuration shared by the client, cache and preview crates.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend origin, without trailing slash
    pub api_url: String,
    pub environment: String,
    pub request_timeout_secs: u64,
    pub cache_backend: CacheBackend,
    pub cache_path: Option<PathBuf>,
    pub cache_capacity: usize,
    pub storage_hosts: Vec<String>,
    pub credentials_path: Option<PathBuf>,
    pub viewport_width: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            environment: "development".to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            cache_backend: CacheBackend::Memory,
            cache_path: None,
            cache_capacity: CACHE_CAPACITY,
            storage_hosts: DEFAULT_STORAGE_HOSTS.iter().map(|h| h.to_string()).collect(),
            credentials_path: None,
            viewport_width: VIEWPORT_WIDTH,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `api_url` with defaults for everything else.
    pub fn with_api_url(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("DOCVIEW_API_URL")
            .or_else(|| get("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let environment = get("DOCVIEW_ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let request_timeout_secs = match get("DOCVIEW_REQUEST_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| {
                anyhow::anyhow!("DOCVIEW_REQUEST_TIMEOUT_SECS must be a valid number")
            })?,
            None => REQUEST_TIMEOUT_SECS,
        };

        let cache_backend = match get("DOCVIEW_CACHE_BACKEND") {
            Some(v) => v.parse()?,
            None => CacheBackend::Memory,
        };

        let cache_capacity = match get("DOCVIEW_CACHE_CAPACITY") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("DOCVIEW_CACHE_CAPACITY must be a valid number"))?,
            None => CACHE_CAPACITY,
        };

        let storage_hosts = get("DOCVIEW_STORAGE_HOSTS")
            .map(|s| {
                s.split(',')
                    .map(|h| h.trim().to_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| DEFAULT_STORAGE_HOSTS.iter().map(|h| h.to_string()).collect());

        let viewport_width = match get("DOCVIEW_VIEWPORT_WIDTH") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("DOCVIEW_VIEWPORT_WIDTH must be a valid number"))?,
            None => VIEWPORT_WIDTH,
        };

        let config = ClientConfig {
            api_url,
            environment,
            request_timeout_secs,
            cache_backend,
            cache_path: get("DOCVIEW_CACHE_PATH").map(PathBuf::from),
            cache_capacity,
            storage_hosts,
            credentials_path: get("DOCVIEW_CREDENTIALS_PATH").map(PathBuf::from),
            viewport_width,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the client is configured for production
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn url_patterns(&self) -> UrlPatterns {
        UrlPatterns::new(&self.api_url, self.storage_hosts.clone())
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "DOCVIEW_API_URL must be an http(s) URL, got '{}'",
                self.api_url
            ));
        }

        if self.is_production() && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "DOCVIEW_API_URL must use https in production"
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "DOCVIEW_REQUEST_TIMEOUT_SECS must be greater than zero"
            ));
        }

        match self.cache_backend {
            CacheBackend::Memory => {
                if self.cache_capacity == 0 {
                    return Err(anyhow::anyhow!(
                        "DOCVIEW_CACHE_CAPACITY must be greater than zero"
                    ));
                }
            }
            CacheBackend::File => {
                if self.cache_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "DOCVIEW_CACHE_PATH must be set when using the file cache backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
