use docview_core::models::Document;

pub fn document(id: &str, filename: &str, mime_type: &str) -> Document {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "filename": filename,
        "mimeType": mime_type,
        "fileSize": 1024,
    }))
    .unwrap()
}

pub fn document_with_markdown(id: &str, filename: &str, markdown: &str) -> Document {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "filename": filename,
        "mimeType": "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "metadata": { "markdownContent": markdown },
    }))
    .unwrap()
}

/// Cloud-signed URL on a default storage host.
pub fn signed_storage_url(name: &str, signature: &str) -> String {
    format!(
        "https://docs-bucket.storage.googleapis.com/{}?X-Goog-Expires=3600&X-Goog-Signature={}",
        name, signature
    )
}

/// Smallest valid PNG (1x1 transparent pixel).
pub const PNG_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];
