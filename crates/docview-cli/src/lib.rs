use anyhow::Context;
use docview_core::models::ExportFormat;
use docview_preview::{ImageSource, PreviewContent, ResolvedUrl};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Shorten to at most `max_chars` characters, ending in "..." when cut.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// JSON view of a resolution result.
pub fn resolved_to_json(resolved: &ResolvedUrl) -> serde_json::Value {
    match resolved {
        ResolvedUrl::Empty => serde_json::json!({ "kind": "empty" }),
        ResolvedUrl::Url { url, source } => {
            serde_json::json!({ "kind": "url", "url": url, "source": source })
        }
        ResolvedUrl::Blob(blob) => serde_json::json!({
            "kind": "blob",
            "content_type": blob.content_type,
            "size": blob.size,
        }),
        ResolvedUrl::FetchFailed { status, message } => {
            serde_json::json!({ "kind": "fetch_failed", "status": status, "message": message })
        }
    }
}

/// Human-readable summary of a preview, for `--format text`.
pub fn render_text(content: &PreviewContent) -> String {
    match content {
        PreviewContent::Loading { file_type } => {
            format!("{} preview is not ready yet", file_type)
        }
        PreviewContent::Pdf {
            url,
            page_width,
            num_pages,
            converted,
        } => {
            let pages = num_pages
                .map(|n| format!("{} pages", n))
                .unwrap_or_else(|| "page count unknown".to_string());
            let origin = if *converted { "converted PDF" } else { "PDF" };
            format!("{} ({}, {}px wide)\n{}", origin, pages, page_width, url)
        }
        PreviewContent::Spreadsheet { markdown } => markdown.clone(),
        PreviewContent::Slides { deck } => {
            let mut out = String::new();
            if !deck.metadata.title.is_empty() {
                out.push_str(&format!("# {}\n\n", deck.metadata.title));
            }
            for slide in deck.non_empty_slides() {
                out.push_str(&format!("## Slide {}\n{}\n\n", slide.slide_number, slide.content));
            }
            out.trim_end().to_string()
        }
        PreviewContent::Image { source } => match source {
            ImageSource::Url { url } => format!("Image\n{}", url),
            ImageSource::Blob(blob) => {
                format!("Image ({}, {} bytes, fetched locally)", blob.content_type, blob.size)
            }
        },
        PreviewContent::Media { media, url } => format!("{}\n{}", media.as_str(), url),
        PreviewContent::Text { body, .. } => body.clone(),
        PreviewContent::Fallback(panel) => {
            format!("{}\nDownload: {}", panel.message, panel.download.path)
        }
    }
}

/// `{document_id}.{ext}` in the current directory unless `output` is given.
pub fn export_output_path(
    document_id: &str,
    format: ExportFormat,
    output: Option<&Path>,
) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("{}.{}", document_id, format.extension())),
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
