//! Data models for the docview client
//!
//! Wire shapes of the document backend, organized by endpoint family.

mod document;
mod export;
mod responses;
mod slides;

// Re-export all models for convenient imports
pub use document::*;
pub use export::*;
pub use responses::*;
pub use slides::*;
