use serde::{Deserialize, Serialize};

/// `GET /api/documents/{id}/view-url`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewUrlResponse {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub encrypted: bool,
}

/// `GET /api/documents/{id}/preview` - result of a server-side DOCX conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    #[serde(default)]
    pub preview_type: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pages: Option<u32>,
}

impl PreviewResponse {
    /// A usable converted PDF: type `pdf` with a non-empty URL.
    pub fn pdf_url(&self) -> Option<&str> {
        if !self.preview_type.eq_ignore_ascii_case("pdf") {
            return None;
        }
        self.preview_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// `GET /api/documents/{id}/download`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadUrlResponse {
    pub url: String,
}

/// Acknowledgement returned by `POST /api/documents/{id}/reprocess`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for AckResponse {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}
