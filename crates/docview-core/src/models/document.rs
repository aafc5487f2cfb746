use serde::{Deserialize, Deserializer, Serialize};

use crate::classify::{classify, extension_of, PreviewFileType};
use crate::error::{DocviewError, DocviewResult};

pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_string()
}

/// Treats `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_mime<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_mime_type))
}

/// Server-extracted content attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_content: Option<String>,
}

/// Document as returned by `GET /api/documents/{id}/status`.
///
/// `id` and `filename` are required; every other field defaults when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub filename: String,
    #[serde(
        default = "default_mime_type",
        deserialize_with = "null_as_default_mime"
    )]
    pub mime_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.filename)
    }

    pub fn preview_type(&self) -> PreviewFileType {
        classify(&self.filename, &self.mime_type)
    }

    pub fn markdown_content(&self) -> Option<&str> {
        self.metadata
            .markdown_content
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// Wrapper some backend versions use: `{ "document": { ... } }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DocumentEnvelope {
    Wrapped { document: Document },
    Bare(Document),
}

impl DocumentEnvelope {
    pub fn into_document(self) -> Document {
        match self {
            DocumentEnvelope::Wrapped { document } => document,
            DocumentEnvelope::Bare(document) => document,
        }
    }
}

/// PATCH body for rename, move and markdown edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_content: Option<String>,
}

impl DocumentPatch {
    pub fn rename(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    pub fn move_to(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: Some(folder_id.into()),
            ..Self::default()
        }
    }

    pub fn markdown(content: impl Into<String>) -> Self {
        Self {
            markdown_content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filename.is_none() && self.folder_id.is_none() && self.markdown_content.is_none()
    }

    pub fn validate(&self) -> DocviewResult<()> {
        if self.is_empty() {
            return Err(DocviewError::InvalidInput(
                "Document update must change at least one field".to_string(),
            ));
        }
        if let Some(name) = &self.filename {
            let name = name.trim();
            if name.is_empty() {
                return Err(DocviewError::InvalidInput(
                    "Filename must not be empty".to_string(),
                ));
            }
            if name.contains('/') || name.contains('\\') {
                return Err(DocviewError::InvalidInput(
                    "Filename must not contain path separators".to_string(),
                ));
            }
        }
        Ok(())
    }
}
