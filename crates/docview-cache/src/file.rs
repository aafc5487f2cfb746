use crate::traits::{CacheError, CacheResult, UrlCache};
use crate::CacheBackend;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileSlot {
    value: String,
    expires_at_ms: i64,
}

type SlotMap = BTreeMap<String, FileSlot>;

/// JSON-file cache
///
/// The file is re-read on every operation so separate processes pointing at
/// the same path share entries. There is no cross-process lock; the last
/// writer wins.
pub struct FileUrlCache {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    guard: Mutex<()>,
}

impl FileUrlCache {
    /// Create a FileUrlCache instance
    ///
    /// # Arguments
    /// * `path` - JSON file holding the entries (e.g., "/tmp/docview/session.json");
    ///   parent directories are created
    pub async fn new(path: impl Into<PathBuf>) -> CacheResult<Self> {
        let path = path.into();

        if path.is_dir() {
            return Err(CacheError::Config(format!(
                "Cache path {} is a directory",
                path.display()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                CacheError::Config(format!(
                    "Failed to create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(FileUrlCache {
            path,
            guard: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    async fn load(&self) -> CacheResult<SlotMap> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SlotMap::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Cache file is corrupt, starting empty"
                );
                Ok(SlotMap::new())
            }
        }
    }

    /// Write to a sibling temp file, then rename over the target
    async fn store(&self, map: &SlotMap) -> CacheResult<()> {
        let data = serde_json::to_vec(map)?;
        let tmp_path = self.path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UrlCache for FileUrlCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let _guard = self.guard.lock().await;
        let mut map = self.load().await?;
        let now = Self::now_ms();

        let fresh = map
            .get(key)
            .map(|slot| (slot.expires_at_ms > now).then(|| slot.value.clone()));

        match fresh {
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => {
                map.remove(key);
                self.store(&map).await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let _guard = self.guard.lock().await;
        let mut map = self.load().await?;
        let now = Self::now_ms();

        // drop anything already expired while we hold the file
        map.retain(|_, slot| slot.expires_at_ms > now);

        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        map.insert(
            key.to_string(),
            FileSlot {
                value,
                expires_at_ms: now.saturating_add(ttl_ms),
            },
        );
        self.store(&map).await
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        let _guard = self.guard.lock().await;
        let mut map = self.load().await?;
        if map.remove(key).is_some() {
            self.store(&map).await?;
        }
        Ok(())
    }

    fn backend_type(&self) -> CacheBackend {
        CacheBackend::File
    }
}
