//! Cache abstraction trait
//!
//! This module defines the UrlCache trait that all cache backends implement.

use crate::CacheBackend;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Cache operation errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

impl From<CacheError> for docview_core::DocviewError {
    fn from(err: CacheError) -> Self {
        docview_core::DocviewError::Cache(err.to_string())
    }
}

/// Key/value cache for resolved content URLs
///
/// Values are opaque strings. Backends may drop an entry once its `ttl` has
/// elapsed; callers that need an exact freshness rule store their own
/// timestamp inside the value. Concurrent writers race, last write wins.
#[async_trait]
pub trait UrlCache: Send + Sync {
    /// Fetch the raw value stored under `key`, if present and not evicted
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Get the cache backend type
    fn backend_type(&self) -> CacheBackend;
}
