//! File-type classification for previews.
//!
//! The extension decides first; the MIME type is only consulted when the
//! extension is missing or unrecognized. Classification never fails.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp", "bmp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "aac"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];
const WORD_EXTENSIONS: &[&str] = &["doc", "docx"];
const EXCEL_EXTENSIONS: &[&str] = &["xls", "xlsx"];
const POWERPOINT_EXTENSIONS: &[&str] = &["ppt", "pptx"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "json", "xml", "csv"];
const CODE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "py", "java", "cpp", "c", "html", "css", "php", "rb", "go",
];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz"];

/// Extension table in lookup order.
const EXTENSION_TABLE: &[(&[&str], PreviewFileType)] = &[
    (IMAGE_EXTENSIONS, PreviewFileType::Image),
    (VIDEO_EXTENSIONS, PreviewFileType::Video),
    (AUDIO_EXTENSIONS, PreviewFileType::Audio),
    (PDF_EXTENSIONS, PreviewFileType::Pdf),
    (WORD_EXTENSIONS, PreviewFileType::Word),
    (EXCEL_EXTENSIONS, PreviewFileType::Excel),
    (POWERPOINT_EXTENSIONS, PreviewFileType::Powerpoint),
    (TEXT_EXTENSIONS, PreviewFileType::Text),
    (CODE_EXTENSIONS, PreviewFileType::Code),
    (ARCHIVE_EXTENSIONS, PreviewFileType::Archive),
];

/// Preview category derived from a document's filename and MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFileType {
    Pdf,
    Word,
    Excel,
    Powerpoint,
    Image,
    Video,
    Audio,
    Text,
    Code,
    Archive,
    Unknown,
}

/// Rendering approach selected for a file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewStrategy {
    /// Server converts to PDF; rendered with the PDF pager.
    ConvertedPdf,
    /// Paginated PDF with responsive page width.
    PaginatedPdf,
    /// Tabular preview fed by the document's markdown content.
    Spreadsheet,
    /// Slide preview fed by the slides endpoint.
    Slides,
    Image,
    /// Native video/audio element pointed at the resolved URL.
    NativeMedia,
    /// Pre-formatted text scaled by the zoom control.
    Text,
    ArchivePanel,
    UnavailablePanel,
}

impl PreviewFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewFileType::Pdf => "pdf",
            PreviewFileType::Word => "word",
            PreviewFileType::Excel => "excel",
            PreviewFileType::Powerpoint => "powerpoint",
            PreviewFileType::Image => "image",
            PreviewFileType::Video => "video",
            PreviewFileType::Audio => "audio",
            PreviewFileType::Text => "text",
            PreviewFileType::Code => "code",
            PreviewFileType::Archive => "archive",
            PreviewFileType::Unknown => "unknown",
        }
    }

    pub fn strategy(&self) -> PreviewStrategy {
        match self {
            PreviewFileType::Word => PreviewStrategy::ConvertedPdf,
            PreviewFileType::Pdf => PreviewStrategy::PaginatedPdf,
            PreviewFileType::Excel => PreviewStrategy::Spreadsheet,
            PreviewFileType::Powerpoint => PreviewStrategy::Slides,
            PreviewFileType::Image => PreviewStrategy::Image,
            PreviewFileType::Video | PreviewFileType::Audio => PreviewStrategy::NativeMedia,
            PreviewFileType::Text | PreviewFileType::Code => PreviewStrategy::Text,
            PreviewFileType::Archive => PreviewStrategy::ArchivePanel,
            PreviewFileType::Unknown => PreviewStrategy::UnavailablePanel,
        }
    }

    /// Whether the strategy needs the document's content URL.
    pub fn needs_content_url(&self) -> bool {
        matches!(
            self,
            PreviewFileType::Pdf
                | PreviewFileType::Image
                | PreviewFileType::Video
                | PreviewFileType::Audio
                | PreviewFileType::Text
                | PreviewFileType::Code
        )
    }
}

impl Display for PreviewFileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreviewFileType {
    type Err = crate::DocviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(PreviewFileType::Pdf),
            "word" => Ok(PreviewFileType::Word),
            "excel" => Ok(PreviewFileType::Excel),
            "powerpoint" => Ok(PreviewFileType::Powerpoint),
            "image" => Ok(PreviewFileType::Image),
            "video" => Ok(PreviewFileType::Video),
            "audio" => Ok(PreviewFileType::Audio),
            "text" => Ok(PreviewFileType::Text),
            "code" => Ok(PreviewFileType::Code),
            "archive" => Ok(PreviewFileType::Archive),
            "unknown" => Ok(PreviewFileType::Unknown),
            _ => Err(crate::DocviewError::InvalidInput(format!(
                "Invalid preview type: {}",
                s
            ))),
        }
    }
}

/// Lower-cased substring after the last `.`, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

fn classify_extension(ext: &str) -> Option<PreviewFileType> {
    EXTENSION_TABLE
        .iter()
        .find(|(exts, _)| exts.contains(&ext))
        .map(|(_, kind)| *kind)
}

fn classify_mime(mime_type: &str) -> Option<PreviewFileType> {
    let mime = mime_type.trim().to_lowercase();
    if mime.is_empty() {
        return None;
    }

    if mime.starts_with("image/") {
        Some(PreviewFileType::Image)
    } else if mime.starts_with("video/") {
        Some(PreviewFileType::Video)
    } else if mime.starts_with("audio/") {
        Some(PreviewFileType::Audio)
    } else if mime == "application/pdf" {
        Some(PreviewFileType::Pdf)
    } else if mime.contains("msword") || mime.contains("wordprocessingml") {
        Some(PreviewFileType::Word)
    } else if mime.contains("excel") || mime.contains("spreadsheetml") {
        Some(PreviewFileType::Excel)
    } else if mime.contains("presentation") || mime.contains("powerpoint") {
        Some(PreviewFileType::Powerpoint)
    } else if mime.starts_with("text/") {
        Some(PreviewFileType::Text)
    } else if ["zip", "rar", "7z", "tar", "gzip"]
        .iter()
        .any(|needle| mime.contains(needle))
    {
        Some(PreviewFileType::Archive)
    } else {
        None
    }
}

/// Classify a file for preview. Extension wins over MIME type.
pub fn classify(filename: &str, mime_type: &str) -> PreviewFileType {
    extension_of(filename)
        .and_then(|ext| classify_extension(&ext))
        .or_else(|| classify_mime(mime_type))
        .unwrap_or(PreviewFileType::Unknown)
}

/// Syntax-highlighting language tag for code files.
pub fn code_language(filename: &str) -> Option<&'static str> {
    let ext = extension_of(filename)?;
    let lang = match ext.as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "html" => "html",
        "css" => "css",
        "php" => "php",
        "rb" => "ruby",
        "go" => "go",
        "json" => "json",
        "xml" => "xml",
        "md" => "markdown",
        "csv" => "csv",
        _ => return None,
    };
    Some(lang)
}
