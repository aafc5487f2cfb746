//! Docview CLI - command-line client for document previews.
//!
//! Reads DOCVIEW_API_URL (or API_URL) and the bearer token from
//! DOCVIEW_CREDENTIALS_PATH or DOCVIEW_ACCESS_TOKEN.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use docview_cli::{export_output_path, init_tracing, print_json, render_text, resolved_to_json};
use docview_client::ApiClient;
use docview_core::models::{DocumentPatch, ExportFormat};
use docview_core::{classify, code_language, ClientConfig, ZoomLevel};
use docview_preview::{resolver_from_config, CancellationToken, Dispatcher, PreviewOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docview", about = "Document preview CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the preview type chosen for a filename
    Classify {
        filename: String,
        /// MIME type, consulted when the extension is unknown
        #[arg(long, default_value = "")]
        mime: String,
    },
    /// Resolve a document's content URL through the signed-URL cache
    Resolve {
        /// Document ID
        id: String,
        /// Resolve this URL instead of asking the backend for the view URL
        #[arg(long)]
        raw_url: Option<String>,
        /// MIME type; fetched from the document when omitted
        #[arg(long)]
        mime: Option<String>,
    },
    /// Build the preview for a document
    Preview {
        /// Document ID
        id: String,
        /// Viewport width in pixels
        #[arg(long)]
        viewport: Option<u32>,
        /// Zoom factor (0.5 to 3.0)
        #[arg(long, default_value = "1.0")]
        zoom: f32,
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Get a signed download URL
    Download {
        /// Document ID
        id: String,
    },
    /// Export a document to another format and save it
    Export {
        /// Document ID
        id: String,
        /// pdf, docx, txt, markdown, html, csv or xlsx
        #[arg(long)]
        format: ExportFormat,
        /// Output path (defaults to {id}.{ext})
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Ask the backend to regenerate previews and extracted content
    Reprocess {
        /// Document ID
        id: String,
    },
    /// Rename a document
    Rename {
        /// Document ID
        id: String,
        filename: String,
    },
    /// Move a document to another folder
    Move {
        /// Document ID
        id: String,
        #[arg(long)]
        folder: String,
    },
    /// Replace a document's markdown content with a file's contents
    EditMarkdown {
        /// Document ID
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },
}

/// Token cancelled on Ctrl-C.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling in-flight requests");
            on_interrupt.cancel();
        }
    });
    token
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if let Commands::Classify { filename, mime } = &cli.command {
        let file_type = classify(filename, mime);
        return print_json(&serde_json::json!({
            "filename": filename,
            "file_type": file_type,
            "strategy": file_type.strategy(),
            "language": code_language(filename),
        }));
    }

    let config = ClientConfig::from_env()
        .context("Invalid configuration. Check DOCVIEW_API_URL and DOCVIEW_CACHE_* settings")?;
    let client = ApiClient::from_config(&config).context("Failed to create API client")?;
    tracing::debug!(api_url = %config.api_url, authenticated = client.has_token(), "Client ready");

    match cli.command {
        Commands::Classify { .. } => {}
        Commands::Resolve { id, raw_url, mime } => {
            let resolver = resolver_from_config(&config).await?;
            let raw_url = match raw_url {
                Some(url) => Some(url),
                None => client.get_view_url(&id).await?.url,
            };
            let mime = match mime {
                Some(mime) => mime,
                None => client.get_document(&id).await?.mime_type,
            };
            let token = interrupt_token();
            let resolved = resolver
                .resolve(raw_url.as_deref(), &id, &mime, &token)
                .await?;
            print_json(&resolved_to_json(&resolved))?;
        }
        Commands::Preview {
            id,
            viewport,
            zoom,
            format,
        } => {
            let dispatcher = Dispatcher::new(resolver_from_config(&config).await?);
            let options = PreviewOptions::new(
                viewport.unwrap_or(config.viewport_width),
                ZoomLevel::new(zoom),
            );
            let token = interrupt_token();
            let content = dispatcher.preview_by_id(&id, &options, &token).await?;
            match format {
                OutputFormat::Json => print_json(&content)?,
                OutputFormat::Text => println!("{}", render_text(&content)),
            }
        }
        Commands::Download { id } => {
            let response = client.get_download_url(&id).await?;
            print_json(&response)?;
        }
        Commands::Export { id, format, output } => {
            let body = client.export_document(&id, format).await?;
            let path = export_output_path(&id, format, output.as_deref());
            tokio::fs::write(&path, &body.bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_json(&serde_json::json!({
                "path": path,
                "format": format,
                "bytes": body.bytes.len(),
                "content_type": body.content_type,
            }))?;
        }
        Commands::Reprocess { id } => {
            let response = client.reprocess_document(&id).await?;
            print_json(&response)?;
        }
        Commands::Rename { id, filename } => {
            let document = client
                .update_document(&id, &DocumentPatch::rename(filename))
                .await?;
            print_json(&document)?;
        }
        Commands::Move { id, folder } => {
            let document = client
                .update_document(&id, &DocumentPatch::move_to(folder))
                .await?;
            print_json(&document)?;
        }
        Commands::EditMarkdown { id, file } => {
            let markdown = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let document = client
                .update_document(&id, &DocumentPatch::markdown(markdown))
                .await?;
            print_json(&document)?;
        }
        Commands::Delete { id } => {
            client.delete_document(&id).await?;
            print_json(
                &serde_json::json!({ "success": true, "message": format!("Document {} deleted", id) }),
            )?;
        }
    }

    Ok(())
}
