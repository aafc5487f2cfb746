#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use docview_cache::{CacheBackend, CacheError, CacheResult, MemoryUrlCache, UrlCache};
use docview_client::{ApiClient, StaticCredentials};
use docview_core::{FixedClock, UrlPatterns};
use docview_preview::{Dispatcher, UrlResolver};
use std::sync::Arc;
use std::time::Duration;

/// Fixed "now" for TTL tests (2023-11-14T22:13:20Z).
pub const NOW: i64 = 1_700_000_000_000;

pub const TOKEN: &str = "test-token";

pub fn memory_cache() -> Arc<dyn UrlCache> {
    Arc::new(MemoryUrlCache::new(64).unwrap())
}

/// Resolver pointed at `backend_url`, authenticated with `TOKEN`.
pub fn resolver(backend_url: &str, cache: Arc<dyn UrlCache>, clock: Arc<FixedClock>) -> UrlResolver {
    let client = ApiClient::new(backend_url, Arc::new(StaticCredentials::new(TOKEN))).unwrap();
    UrlResolver::new(
        client,
        cache,
        UrlPatterns::with_default_storage_hosts(backend_url),
    )
    .with_clock(clock)
}

pub struct TestDispatcher {
    pub dispatcher: Dispatcher,
    pub cache: Arc<dyn UrlCache>,
    pub clock: Arc<FixedClock>,
}

pub fn dispatcher(backend_url: &str) -> TestDispatcher {
    let cache = memory_cache();
    let clock = Arc::new(FixedClock::new(NOW));
    TestDispatcher {
        dispatcher: Dispatcher::new(resolver(backend_url, cache.clone(), clock.clone())),
        cache,
        clock,
    }
}

/// Cache whose every operation fails.
#[derive(Debug, Default)]
pub struct BrokenCache;

#[async_trait]
impl UrlCache for BrokenCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Backend("unavailable".to_string()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Backend("unavailable".to_string()))
    }

    async fn invalidate(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Backend("unavailable".to_string()))
    }

    fn backend_type(&self) -> CacheBackend {
        CacheBackend::Memory
    }
}
