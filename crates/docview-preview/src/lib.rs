//! Docview Preview Library
//!
//! Picks a preview strategy for a document and resolves the content URL the
//! strategy loads. The resolver owns the signed-URL cache rules; the
//! dispatcher owns the per-file-type behavior and turns failures into
//! fallback panels.

pub mod cancel;
pub mod content;
pub mod dispatcher;
pub mod resolver;

use docview_cache::create_cache;
use docview_client::ApiClient;
use docview_core::{ClientConfig, DocviewResult};

pub use cancel::cancellable;
pub use content::{
    BlobRef, DownloadAction, FallbackPanel, FallbackReason, ImageSource, MediaKind,
    PreviewContent,
};
pub use dispatcher::{Dispatcher, PreviewOptions};
pub use resolver::{ResolvedUrl, SignedUrlCacheEntry, UrlResolver, UrlSource};
pub use tokio_util::sync::CancellationToken;

/// Resolver wired from configuration: HTTP client, cache backend and URL patterns.
pub async fn resolver_from_config(config: &ClientConfig) -> DocviewResult<UrlResolver> {
    let client = ApiClient::from_config(config)?;
    let cache = create_cache(config).await?;
    Ok(UrlResolver::new(client, cache, config.url_patterns()))
}
