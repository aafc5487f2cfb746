//! Docview Core Library
//!
//! This crate provides the domain models, file-type and URL classification,
//! layout math, configuration and error types shared by all docview crates.

pub mod cache_types;
pub mod classify;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod layout;
pub mod models;
pub mod url_kind;

// Re-export commonly used types
pub use cache_types::CacheBackend;
pub use classify::{classify, code_language, extension_of, PreviewFileType, PreviewStrategy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ClientConfig;
pub use error::{DocviewError, DocviewResult, ErrorMetadata, LogLevel};
pub use layout::{pdf_page_width, text_font_size, ZoomLevel};
pub use url_kind::{classify_url, UrlKind, UrlPatterns};
