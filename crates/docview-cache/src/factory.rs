use crate::{CacheBackend, CacheError, CacheResult, FileUrlCache, MemoryUrlCache, UrlCache};
use docview_core::ClientConfig;
use std::sync::Arc;

/// Create a cache backend based on configuration
pub async fn create_cache(config: &ClientConfig) -> CacheResult<Arc<dyn UrlCache>> {
    match config.cache_backend {
        CacheBackend::Memory => {
            let cache = MemoryUrlCache::new(config.cache_capacity)?;
            tracing::debug!(capacity = config.cache_capacity, "Using in-memory URL cache");
            Ok(Arc::new(cache))
        }
        CacheBackend::File => {
            let path = config.cache_path.clone().ok_or_else(|| {
                CacheError::Config("DOCVIEW_CACHE_PATH not configured".to_string())
            })?;
            let cache = FileUrlCache::new(path).await?;
            tracing::debug!(path = %cache.path().display(), "Using file URL cache");
            Ok(Arc::new(cache))
        }
    }
}
