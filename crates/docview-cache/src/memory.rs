use crate::traits::{CacheError, CacheResult, UrlCache};
use crate::CacheBackend;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Slot {
    value: String,
    expires_at: Instant,
}

/// In-process LRU cache; entries vanish with the process, like a tab session.
pub struct MemoryUrlCache {
    entries: Mutex<LruCache<String, Slot>>,
}

impl MemoryUrlCache {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> CacheResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            CacheError::Config("Memory cache capacity must be greater than zero".to_string())
        })?;
        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    fn lock(&self) -> CacheResult<std::sync::MutexGuard<'_, LruCache<String, Slot>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Backend("Memory cache lock poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UrlCache for MemoryUrlCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.lock()?;
        let expired = match entries.get(key) {
            Some(slot) if slot.expires_at > Instant::now() => return Ok(Some(slot.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .unwrap_or_else(|| Instant::now() + Duration::from_secs(365 * 24 * 3600));
        self.lock()?.put(key.to_string(), Slot { value, expires_at });
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.lock()?.pop(key);
        Ok(())
    }

    fn backend_type(&self) -> CacheBackend {
        CacheBackend::Memory
    }
}
