use serde::{Deserialize, Serialize};

/// Deck-level properties reported by the slide extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideDeckMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub slide_count: u32,
    pub slide_width: Option<i64>,
    pub slide_height: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slide {
    pub slide_number: u32,
    pub content: String,
    pub text_count: u32,
}

/// `GET /api/documents/{id}/slides`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidesResponse {
    pub success: bool,
    pub metadata: SlideDeckMetadata,
    pub slides: Vec<Slide>,
    pub full_text: String,
    pub total_slides: u32,
    pub slides_with_text: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SlidesResponse {
    /// Slides that carry any text.
    pub fn non_empty_slides(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter().filter(|s| !s.content.trim().is_empty())
    }
}
