//! Docview Cache Library
//!
//! This crate provides the `UrlCache` abstraction the resolver uses for
//! signed content URLs, with an in-memory LRU backend and a JSON-file backend.
//!
//! # Key format
//!
//! The resolver stores one entry per document under
//! `document_signed_url_{document_id}` (see `docview_core::constants`).
//! Backends treat keys and values as opaque strings.

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use docview_core::CacheBackend;
pub use factory::create_cache;
pub use file::FileUrlCache;
pub use memory::MemoryUrlCache;
pub use traits::{CacheError, CacheResult, UrlCache};
