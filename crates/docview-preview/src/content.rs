//! What a preview strategy hands to the renderer.

use bytes::Bytes;
use docview_client::api::document_path;
use docview_core::models::SlidesResponse;
use docview_core::PreviewFileType;
use serde::Serialize;

/// Locally materialized bytes, referenced by a `data:` URL.
#[derive(Debug, Clone, Serialize)]
pub struct BlobRef {
    pub content_type: String,
    pub size: usize,
    /// `data:<mime>;base64,<payload>`
    pub object_url: String,
    #[serde(skip_serializing)]
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// The image element loads this URL itself
    Url { url: String },
    /// Fetched with credentials and materialized locally
    Blob(BlobRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    ArchiveNotPreviewable,
    Unsupported,
    ImageError,
    LoadError,
    TextFetchFailed,
    ContentUnavailable,
}

impl FallbackReason {
    pub fn default_message(&self) -> &'static str {
        match self {
            FallbackReason::ArchiveNotPreviewable => "Archives cannot be previewed",
            FallbackReason::Unsupported => "Preview not available for this file type",
            FallbackReason::ImageError => "The image could not be displayed",
            FallbackReason::LoadError => "The document could not be loaded",
            FallbackReason::TextFetchFailed => "The file contents could not be retrieved",
            FallbackReason::ContentUnavailable => "No preview content has been generated yet",
        }
    }
}

/// Manual download offered by every fallback panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadAction {
    pub document_id: String,
    /// Endpoint returning a signed download URL
    pub path: String,
}

impl DownloadAction {
    pub fn for_document(document_id: &str) -> Self {
        Self {
            document_id: document_id.to_string(),
            path: document_path(document_id, "/download"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FallbackPanel {
    pub reason: FallbackReason,
    pub message: String,
    pub download: DownloadAction,
}

impl FallbackPanel {
    pub fn new(document_id: &str, reason: FallbackReason) -> Self {
        Self {
            reason,
            message: reason.default_message().to_string(),
            download: DownloadAction::for_document(document_id),
        }
    }

    pub fn with_message(document_id: &str, reason: FallbackReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
            download: DownloadAction::for_document(document_id),
        }
    }
}

/// Result of dispatching a document to its preview strategy.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewContent {
    /// No content reference yet
    Loading { file_type: PreviewFileType },
    Pdf {
        url: String,
        page_width: u32,
        num_pages: Option<u32>,
        /// Server-side conversion of a word document
        converted: bool,
    },
    Spreadsheet { markdown: String },
    Slides { deck: SlidesResponse },
    Image { source: ImageSource },
    Media { media: MediaKind, url: String },
    Text {
        body: String,
        language: Option<String>,
        font_size: f32,
    },
    Fallback(FallbackPanel),
}

impl PreviewContent {
    pub fn fallback(document_id: &str, reason: FallbackReason) -> Self {
        PreviewContent::Fallback(FallbackPanel::new(document_id, reason))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PreviewContent::Fallback(_))
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            PreviewContent::Fallback(panel) => Some(panel.reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_carries_download_path() {
        let content = PreviewContent::fallback("42", FallbackReason::ArchiveNotPreviewable);
        match content {
            PreviewContent::Fallback(panel) => {
                assert_eq!(panel.download.path, "/api/documents/42/download");
                assert_eq!(panel.message, "Archives cannot be previewed");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_serialization_tags() {
        let content = PreviewContent::Media {
            media: MediaKind::Audio,
            url: "https://x/a.mp3".to_string(),
        };
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["kind"], "media");
        assert_eq!(json["media"], "audio");

        let fallback = serde_json::to_value(PreviewContent::fallback("1", FallbackReason::ImageError))
            .unwrap();
        assert_eq!(fallback["kind"], "fallback");
        assert_eq!(fallback["reason"], "image_error");
    }

    #[test]
    fn test_blob_bytes_not_serialized() {
        let blob = BlobRef {
            content_type: "image/png".to_string(),
            size: 3,
            object_url: "data:image/png;base64,AAAA".to_string(),
            bytes: Bytes::from_static(&[0, 0, 0]),
        };
        let json = serde_json::to_value(ImageSource::Blob(blob)).unwrap();
        assert_eq!(json["kind"], "blob");
        assert_eq!(json["size"], 3);
        assert!(json.get("bytes").is_none());
    }
}
