//! Turns a backend-provided content reference into something directly loadable.
//!
//! Signed URLs are cached for 50 minutes under a per-document key. Image
//! stream endpoints need the bearer token, so they are fetched here and handed
//! back as a local blob. Relative `/api/...` paths are joined onto the backend
//! origin and never cached.

use crate::cancel::cancellable;
use crate::content::BlobRef;
use base64::Engine;
use docview_cache::UrlCache;
use docview_client::ApiClient;
use docview_core::constants::{signed_url_key, SIGNED_URL_TTL_MS};
use docview_core::{classify_url, Clock, DocviewError, DocviewResult, SystemClock, UrlPatterns};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Persisted form of a cached signed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlCacheEntry {
    pub url: String,
    /// Milliseconds since the Unix epoch when the entry was stored.
    pub timestamp: i64,
}

impl SignedUrlCacheEntry {
    /// Milliseconds since the entry was stored. `None` when the timestamp is
    /// in the future or too far away to subtract.
    pub fn age_millis(&self, now_millis: i64) -> Option<i64> {
        now_millis
            .checked_sub(self.timestamp)
            .filter(|age| *age >= 0)
    }

    pub fn is_fresh(&self, now_millis: i64) -> bool {
        matches!(self.age_millis(now_millis), Some(age) if age < SIGNED_URL_TTL_MS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlSource {
    /// Relative API path joined onto the backend origin
    RelativeApi,
    /// Reused from the signed-URL cache
    Cached,
    /// Freshly stored in the signed-URL cache
    Fresh,
    /// Neither backend nor storage; used as-is
    Passthrough,
}

#[derive(Debug, Clone)]
pub enum ResolvedUrl {
    /// No reference yet; caller shows a loading state.
    Empty,
    Url { url: String, source: UrlSource },
    Blob(BlobRef),
    /// Authenticated fetch failed; the caller decides how to present it.
    FetchFailed { status: Option<u16>, message: String },
}

impl ResolvedUrl {
    pub fn url(&self) -> Option<&str> {
        match self {
            ResolvedUrl::Url { url, .. } => Some(url),
            ResolvedUrl::Blob(blob) => Some(&blob.object_url),
            _ => None,
        }
    }
}

/// Resolves raw content URLs against the backend, the cache and the clock.
pub struct UrlResolver {
    client: ApiClient,
    cache: Arc<dyn UrlCache>,
    patterns: UrlPatterns,
    clock: Arc<dyn Clock>,
}

impl UrlResolver {
    pub fn new(client: ApiClient, cache: Arc<dyn UrlCache>, patterns: UrlPatterns) -> Self {
        Self {
            client,
            cache,
            patterns,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn patterns(&self) -> &UrlPatterns {
        &self.patterns
    }

    /// Resolve under the document's signed-URL cache key.
    pub async fn resolve(
        &self,
        raw_url: Option<&str>,
        document_id: &str,
        mime_type: &str,
        cancel: &CancellationToken,
    ) -> DocviewResult<ResolvedUrl> {
        self.resolve_keyed(raw_url, &signed_url_key(document_id), mime_type, cancel)
            .await
    }

    /// Resolve under an explicit cache key.
    #[tracing::instrument(skip(self, raw_url, cancel))]
    pub async fn resolve_keyed(
        &self,
        raw_url: Option<&str>,
        cache_key: &str,
        mime_type: &str,
        cancel: &CancellationToken,
    ) -> DocviewResult<ResolvedUrl> {
        if cancel.is_cancelled() {
            return Err(DocviewError::Cancelled);
        }

        let raw = match raw_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(raw) => raw,
            None => return Ok(ResolvedUrl::Empty),
        };

        let kind = classify_url(raw, &self.patterns);

        if kind.is_stream_endpoint && is_image_mime(mime_type) {
            let absolute = if kind.is_relative_api_path {
                self.absolute(raw)
            } else {
                raw.to_string()
            };
            // The token only goes to the backend itself.
            let authenticated = kind.is_relative_api_path || kind.is_backend_url;
            return self
                .fetch_blob(&absolute, mime_type, authenticated, cancel)
                .await;
        }

        if kind.is_relative_api_path {
            return Ok(ResolvedUrl::Url {
                url: self.absolute(raw),
                source: UrlSource::RelativeApi,
            });
        }

        if kind.is_cacheable_signed() {
            return Ok(self.cached_signed_url(cache_key, raw).await);
        }

        Ok(ResolvedUrl::Url {
            url: raw.to_string(),
            source: UrlSource::Passthrough,
        })
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.patterns.backend_origin(), path)
    }

    async fn fetch_blob(
        &self,
        url: &str,
        mime_type: &str,
        authenticated: bool,
        cancel: &CancellationToken,
    ) -> DocviewResult<ResolvedUrl> {
        let fetched = cancellable(cancel, self.client.fetch_url(url, authenticated)).await?;

        match fetched {
            Ok(body) => {
                let content_type = body
                    .content_type
                    .filter(|ct| is_image_mime(ct))
                    .unwrap_or_else(|| mime_type.to_string());
                let encoded = base64::engine::general_purpose::STANDARD.encode(&body.bytes);
                tracing::debug!(size = body.bytes.len(), "Fetched image through stream endpoint");
                Ok(ResolvedUrl::Blob(BlobRef {
                    object_url: format!("data:{};base64,{}", content_type, encoded),
                    content_type,
                    size: body.bytes.len(),
                    bytes: body.bytes,
                }))
            }
            Err(DocviewError::Cancelled) => Err(DocviewError::Cancelled),
            Err(e) => {
                tracing::warn!(error = %e, "Authenticated image fetch failed");
                Ok(ResolvedUrl::FetchFailed {
                    status: e.status(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Cache lookup for a signed URL. Backend errors degrade to the raw URL.
    async fn cached_signed_url(&self, cache_key: &str, raw: &str) -> ResolvedUrl {
        let now = self.clock.now_millis();

        match self.cache.get(cache_key).await {
            Ok(Some(stored)) => {
                match serde_json::from_str::<SignedUrlCacheEntry>(&stored) {
                    Ok(entry) if entry.is_fresh(now) => {
                        tracing::debug!(age_ms = ?entry.age_millis(now), "Signed URL cache hit");
                        return ResolvedUrl::Url {
                            url: entry.url,
                            source: UrlSource::Cached,
                        };
                    }
                    Ok(entry) => {
                        tracing::debug!(
                            age_ms = ?entry.age_millis(now),
                            "Signed URL cache entry expired or out of range"
                        );
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Discarding malformed signed URL cache entry");
                    }
                }
                if let Err(e) = self.cache.invalidate(cache_key).await {
                    tracing::warn!(error = %e, "Failed to invalidate signed URL cache entry");
                }
            }
            Ok(None) => {
                tracing::debug!("Signed URL cache miss");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Signed URL cache read failed, using raw URL");
                return ResolvedUrl::Url {
                    url: raw.to_string(),
                    source: UrlSource::Fresh,
                };
            }
        }

        let entry = SignedUrlCacheEntry {
            url: raw.to_string(),
            timestamp: now,
        };
        match serde_json::to_string(&entry) {
            Ok(serialized) => {
                let ttl = Duration::from_millis(SIGNED_URL_TTL_MS as u64);
                if let Err(e) = self.cache.set(cache_key, serialized, ttl).await {
                    tracing::warn!(error = %e, "Failed to store signed URL");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize signed URL entry"),
        }

        ResolvedUrl::Url {
            url: raw.to_string(),
            source: UrlSource::Fresh,
        }
    }
}

fn is_image_mime(mime_type: &str) -> bool {
    mime_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
