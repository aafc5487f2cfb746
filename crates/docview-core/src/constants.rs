//! Application-wide constants.

/// Validity window for a cached signed URL, in milliseconds (50 minutes).
///
/// Upstream signed URLs live for 60 minutes; the remaining 10 minutes are a
/// safety margin. Must not be made configurable.
pub const SIGNED_URL_TTL_MS: i64 = 3_000_000;

/// Lifetime the backend grants a signed URL, in milliseconds (60 minutes).
pub const SIGNED_URL_UPSTREAM_LIFETIME_MS: i64 = 3_600_000;

/// Cache key prefix for a document's signed content URL.
pub const SIGNED_URL_KEY_PREFIX: &str = "document_signed_url_";

/// Cache key prefix for the signed URL of a server-converted PDF preview.
pub const PREVIEW_URL_KEY_PREFIX: &str = "document_preview_url_";

/// Prefix shared by every backend REST route.
pub const API_PREFIX: &str = "/api";

/// Credential key holding the bearer token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Cache key for a document's signed content URL.
pub fn signed_url_key(document_id: &str) -> String {
    format!("{}{}", SIGNED_URL_KEY_PREFIX, document_id)
}

/// Cache key for a document's converted-PDF preview URL.
pub fn preview_url_key(document_id: &str) -> String {
    format!("{}{}", PREVIEW_URL_KEY_PREFIX, document_id)
}
