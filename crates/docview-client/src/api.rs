//! Document endpoints of the backend.
//!
//! Response types live in `docview_core::models`.

use crate::{ApiClient, FetchedBody};
use docview_core::constants::API_PREFIX;
use docview_core::models::{
    AckResponse, Document, DocumentEnvelope, DocumentPatch, DownloadUrlResponse, ExportFormat,
    ExportRequest, PreviewResponse, SlidesResponse, ViewUrlResponse,
};
use docview_core::{DocviewError, DocviewResult};

/// `/api/documents/{id}{suffix}` with the id percent-encoded.
pub fn document_path(document_id: &str, suffix: &str) -> String {
    format!(
        "{}/documents/{}{}",
        API_PREFIX,
        urlencoding::encode(document_id),
        suffix
    )
}

fn require_id(document_id: &str) -> DocviewResult<()> {
    if document_id.trim().is_empty() {
        return Err(DocviewError::InvalidInput(
            "Document id must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl ApiClient {
    /// Fetch a document with its metadata (`GET /status`).
    pub async fn get_document(&self, document_id: &str) -> DocviewResult<Document> {
        require_id(document_id)?;
        let envelope: DocumentEnvelope = self
            .get(&document_path(document_id, "/status"), &[])
            .await?;
        Ok(envelope.into_document())
    }

    /// Content reference for previewing (`GET /view-url`).
    pub async fn get_view_url(&self, document_id: &str) -> DocviewResult<ViewUrlResponse> {
        require_id(document_id)?;
        self.get(&document_path(document_id, "/view-url"), &[]).await
    }

    /// Server-converted PDF for word documents (`GET /preview`).
    pub async fn get_preview(&self, document_id: &str) -> DocviewResult<PreviewResponse> {
        require_id(document_id)?;
        self.get(&document_path(document_id, "/preview"), &[]).await
    }

    /// Extracted slide text for presentations (`GET /slides`).
    pub async fn get_slides(&self, document_id: &str) -> DocviewResult<SlidesResponse> {
        require_id(document_id)?;
        self.get(&document_path(document_id, "/slides"), &[]).await
    }

    /// Decrypted document bytes (`GET /stream`, bearer auth).
    pub async fn stream_document(&self, document_id: &str) -> DocviewResult<FetchedBody> {
        require_id(document_id)?;
        self.get_bytes(&document_path(document_id, "/stream")).await
    }

    /// Signed download URL (`GET /download`).
    pub async fn get_download_url(&self, document_id: &str) -> DocviewResult<DownloadUrlResponse> {
        require_id(document_id)?;
        self.get(&document_path(document_id, "/download"), &[]).await
    }

    /// Export to another format (`POST /export`), returning the file body.
    pub async fn export_document(
        &self,
        document_id: &str,
        format: ExportFormat,
    ) -> DocviewResult<FetchedBody> {
        require_id(document_id)?;
        self.post_for_bytes(
            &document_path(document_id, "/export"),
            &ExportRequest { format },
        )
        .await
    }

    /// Ask the backend to regenerate derived content (`POST /reprocess`).
    /// An empty 2xx body counts as a successful acknowledgement.
    pub async fn reprocess_document(&self, document_id: &str) -> DocviewResult<AckResponse> {
        require_id(document_id)?;
        let body = self
            .post_for_bytes(
                &document_path(document_id, "/reprocess"),
                &serde_json::json!({}),
            )
            .await?;
        if body.bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(AckResponse::default());
        }
        serde_json::from_slice(&body.bytes).map_err(|e| {
            DocviewError::InvalidResponse(format!("Failed to parse response as JSON: {}", e))
        })
    }

    /// Rename, move or edit markdown (`PATCH /api/documents/{id}`).
    pub async fn update_document(
        &self,
        document_id: &str,
        patch: &DocumentPatch,
    ) -> DocviewResult<Document> {
        require_id(document_id)?;
        patch.validate()?;
        let envelope: DocumentEnvelope = self
            .patch_json(&document_path(document_id, ""), patch)
            .await?;
        Ok(envelope.into_document())
    }

    /// Delete a document (`DELETE /api/documents/{id}`).
    pub async fn delete_document(&self, document_id: &str) -> DocviewResult<()> {
        require_id(document_id)?;
        self.delete(&document_path(document_id, "")).await
    }
}
