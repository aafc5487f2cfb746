//! Routes a document to the preview strategy for its file type.
//!
//! Every failure below is contained in the returned `PreviewContent`: the
//! caller gets a fallback panel with a download action instead of an error.
//! Only cancellation escapes as `Err`.

use crate::cancel::cancellable;
use crate::content::{FallbackPanel, FallbackReason, ImageSource, MediaKind, PreviewContent};
use crate::resolver::{ResolvedUrl, UrlResolver};
use docview_client::ApiClient;
use docview_core::constants::preview_url_key;
use docview_core::models::Document;
use docview_core::{
    classify_url, code_language, pdf_page_width, text_font_size, DocviewError, DocviewResult,
    PreviewFileType, ZoomLevel,
};
use tokio_util::sync::CancellationToken;

/// Viewer state that affects layout.
#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions {
    pub viewport_width: u32,
    pub zoom: ZoomLevel,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            zoom: ZoomLevel::default(),
        }
    }
}

impl PreviewOptions {
    pub fn new(viewport_width: u32, zoom: ZoomLevel) -> Self {
        Self {
            viewport_width,
            zoom,
        }
    }
}

pub struct Dispatcher {
    resolver: UrlResolver,
}

/// Turn a failed step into a fallback panel unless it was cancelled.
fn contain(
    document_id: &str,
    reason: FallbackReason,
    err: DocviewError,
) -> DocviewResult<PreviewContent> {
    if err.is_cancelled() {
        return Err(err);
    }
    tracing::warn!(document_id, reason = ?reason, error = %err, "Preview step failed");
    Ok(PreviewContent::Fallback(FallbackPanel::with_message(
        document_id,
        reason,
        format!("{}: {}", reason.default_message(), err),
    )))
}

impl Dispatcher {
    pub fn new(resolver: UrlResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    fn client(&self) -> &ApiClient {
        self.resolver.client()
    }

    /// Fetch the document by id, then preview it.
    pub async fn preview_by_id(
        &self,
        document_id: &str,
        options: &PreviewOptions,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        let document = cancellable(cancel, self.client().get_document(document_id)).await??;
        self.preview(&document, options, cancel).await
    }

    #[tracing::instrument(skip(self, document, cancel), fields(document_id = %document.id))]
    pub async fn preview(
        &self,
        document: &Document,
        options: &PreviewOptions,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        if cancel.is_cancelled() {
            return Err(DocviewError::Cancelled);
        }

        let file_type = document.preview_type();
        tracing::debug!(file_type = %file_type, strategy = ?file_type.strategy(), "Dispatching preview");

        match file_type {
            PreviewFileType::Word => self.preview_converted(document, options, cancel).await,
            PreviewFileType::Pdf => self.preview_pdf(document, options, cancel).await,
            PreviewFileType::Excel => self.preview_spreadsheet(document, cancel).await,
            PreviewFileType::Powerpoint => self.preview_slides(document, cancel).await,
            PreviewFileType::Image => self.preview_image(document, cancel).await,
            PreviewFileType::Video => {
                self.preview_media(document, MediaKind::Video, cancel).await
            }
            PreviewFileType::Audio => {
                self.preview_media(document, MediaKind::Audio, cancel).await
            }
            PreviewFileType::Text | PreviewFileType::Code => {
                self.preview_text(document, file_type, options, cancel).await
            }
            PreviewFileType::Archive => Ok(PreviewContent::fallback(
                &document.id,
                FallbackReason::ArchiveNotPreviewable,
            )),
            PreviewFileType::Unknown => Ok(PreviewContent::fallback(
                &document.id,
                FallbackReason::Unsupported,
            )),
        }
    }

    /// View URL for the document, resolved.
    async fn resolve_view_url(
        &self,
        document: &Document,
        cancel: &CancellationToken,
    ) -> DocviewResult<ResolvedUrl> {
        let view = cancellable(cancel, self.client().get_view_url(&document.id)).await??;
        if view.encrypted {
            tracing::debug!("Document is encrypted; backend serves it through the stream endpoint");
        }
        self.resolver
            .resolve(view.url.as_deref(), &document.id, &document.mime_type, cancel)
            .await
    }

    async fn preview_converted(
        &self,
        document: &Document,
        options: &PreviewOptions,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        let preview = match cancellable(cancel, self.client().get_preview(&document.id)).await? {
            Ok(preview) => preview,
            Err(e) => return contain(&document.id, FallbackReason::LoadError, e),
        };

        let pdf_url = match preview.pdf_url() {
            Some(url) => url.to_string(),
            None => {
                tracing::warn!(preview_type = %preview.preview_type, "Backend returned no PDF conversion");
                return Ok(PreviewContent::fallback(&document.id, FallbackReason::LoadError));
            }
        };

        let resolved = self
            .resolver
            .resolve_keyed(
                Some(&pdf_url),
                &preview_url_key(&document.id),
                "application/pdf",
                cancel,
            )
            .await?;

        Ok(self.pdf_content(document, resolved, options, preview.num_pages, true))
    }

    async fn preview_pdf(
        &self,
        document: &Document,
        options: &PreviewOptions,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        match self.resolve_view_url(document, cancel).await {
            Ok(resolved) => Ok(self.pdf_content(document, resolved, options, None, false)),
            Err(e) => contain(&document.id, FallbackReason::LoadError, e),
        }
    }

    fn pdf_content(
        &self,
        document: &Document,
        resolved: ResolvedUrl,
        options: &PreviewOptions,
        num_pages: Option<u32>,
        converted: bool,
    ) -> PreviewContent {
        let url = match resolved {
            ResolvedUrl::Empty => {
                return PreviewContent::Loading {
                    file_type: document.preview_type(),
                }
            }
            ResolvedUrl::Url { url, .. } => url,
            ResolvedUrl::Blob(blob) => blob.object_url,
            ResolvedUrl::FetchFailed { message, .. } => {
                return PreviewContent::Fallback(FallbackPanel::with_message(
                    &document.id,
                    FallbackReason::LoadError,
                    message,
                ))
            }
        };

        PreviewContent::Pdf {
            url,
            page_width: pdf_page_width(options.viewport_width, options.zoom),
            num_pages,
            converted,
        }
    }

    async fn preview_spreadsheet(
        &self,
        document: &Document,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        if let Some(markdown) = document.markdown_content() {
            return Ok(PreviewContent::Spreadsheet {
                markdown: markdown.to_string(),
            });
        }

        tracing::debug!("No local markdown content, refreshing document");
        let refreshed = match cancellable(cancel, self.client().get_document(&document.id)).await? {
            Ok(doc) => doc,
            Err(e) => return contain(&document.id, FallbackReason::LoadError, e),
        };

        Ok(match refreshed.markdown_content() {
            Some(markdown) => PreviewContent::Spreadsheet {
                markdown: markdown.to_string(),
            },
            None => PreviewContent::fallback(&document.id, FallbackReason::ContentUnavailable),
        })
    }

    async fn preview_slides(
        &self,
        document: &Document,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        let deck = match cancellable(cancel, self.client().get_slides(&document.id)).await? {
            Ok(deck) => deck,
            Err(e) => return contain(&document.id, FallbackReason::LoadError, e),
        };

        if !deck.success {
            let message = deck
                .error
                .clone()
                .unwrap_or_else(|| FallbackReason::LoadError.default_message().to_string());
            tracing::warn!(error = %message, "Slide extraction reported failure");
            return Ok(PreviewContent::Fallback(FallbackPanel::with_message(
                &document.id,
                FallbackReason::LoadError,
                message,
            )));
        }

        Ok(PreviewContent::Slides { deck })
    }

    async fn preview_image(
        &self,
        document: &Document,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        let resolved = match self.resolve_view_url(document, cancel).await {
            Ok(resolved) => resolved,
            Err(e) => return contain(&document.id, FallbackReason::ImageError, e),
        };

        Ok(match resolved {
            ResolvedUrl::Empty => PreviewContent::Loading {
                file_type: PreviewFileType::Image,
            },
            ResolvedUrl::Url { url, .. } => PreviewContent::Image {
                source: ImageSource::Url { url },
            },
            ResolvedUrl::Blob(blob) => PreviewContent::Image {
                source: ImageSource::Blob(blob),
            },
            ResolvedUrl::FetchFailed { message, .. } => PreviewContent::Fallback(
                FallbackPanel::with_message(&document.id, FallbackReason::ImageError, message),
            ),
        })
    }

    async fn preview_media(
        &self,
        document: &Document,
        media: MediaKind,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        let resolved = match self.resolve_view_url(document, cancel).await {
            Ok(resolved) => resolved,
            Err(e) => return contain(&document.id, FallbackReason::LoadError, e),
        };

        Ok(match resolved {
            ResolvedUrl::Empty => PreviewContent::Loading {
                file_type: document.preview_type(),
            },
            ResolvedUrl::FetchFailed { message, .. } => PreviewContent::Fallback(
                FallbackPanel::with_message(&document.id, FallbackReason::LoadError, message),
            ),
            other => match other.url() {
                Some(url) => PreviewContent::Media {
                    media,
                    url: url.to_string(),
                },
                None => PreviewContent::fallback(&document.id, FallbackReason::LoadError),
            },
        })
    }

    async fn preview_text(
        &self,
        document: &Document,
        file_type: PreviewFileType,
        options: &PreviewOptions,
        cancel: &CancellationToken,
    ) -> DocviewResult<PreviewContent> {
        let resolved = match self.resolve_view_url(document, cancel).await {
            Ok(resolved) => resolved,
            Err(e) => return contain(&document.id, FallbackReason::TextFetchFailed, e),
        };

        let body = match resolved {
            ResolvedUrl::Empty => return Ok(PreviewContent::Loading { file_type }),
            ResolvedUrl::Blob(blob) => String::from_utf8_lossy(&blob.bytes).into_owned(),
            ResolvedUrl::FetchFailed { message, .. } => {
                return Ok(PreviewContent::Fallback(FallbackPanel::with_message(
                    &document.id,
                    FallbackReason::TextFetchFailed,
                    message,
                )))
            }
            ResolvedUrl::Url { url, .. } => {
                // Only the backend gets the bearer token; signed storage URLs reject it.
                let authenticated = classify_url(&url, self.resolver.patterns()).is_backend_url;
                match cancellable(cancel, self.client().fetch_url_text(&url, authenticated)).await? {
                    Ok(text) => text,
                    Err(e) => return contain(&document.id, FallbackReason::TextFetchFailed, e),
                }
            }
        };

        let language = match file_type {
            PreviewFileType::Code => code_language(&document.filename).map(str::to_string),
            _ => None,
        };

        Ok(PreviewContent::Text {
            body,
            language,
            font_size: text_font_size(options.zoom),
        })
    }
}
