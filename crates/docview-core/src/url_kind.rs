//! Classification of backend-provided content references.

use url::Url;

/// Query parameters that mark a cloud-signed URL.
const SIGNATURE_PARAMS: &[&str] = &["x-goog-signature", "x-amz-signature", "sig"];

/// Default cloud-storage host patterns. A leading `.` matches a host suffix.
pub const DEFAULT_STORAGE_HOSTS: &[&str] = &[
    "storage.googleapis.com",
    ".storage.googleapis.com",
    "s3.amazonaws.com",
    ".s3.amazonaws.com",
    ".blob.core.windows.net",
    ".r2.cloudflarestorage.com",
];

/// Known origins used to recognize backend and storage URLs.
#[derive(Debug, Clone)]
pub struct UrlPatterns {
    backend_origin: String,
    storage_hosts: Vec<String>,
}

impl UrlPatterns {
    pub fn new(backend_origin: &str, storage_hosts: Vec<String>) -> Self {
        Self {
            backend_origin: backend_origin.trim_end_matches('/').to_lowercase(),
            storage_hosts: storage_hosts
                .into_iter()
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    pub fn with_default_storage_hosts(backend_origin: &str) -> Self {
        Self::new(
            backend_origin,
            DEFAULT_STORAGE_HOSTS.iter().map(|h| h.to_string()).collect(),
        )
    }

    pub fn backend_origin(&self) -> &str {
        &self.backend_origin
    }

    fn matches_storage_host(&self, host: &str) -> bool {
        self.storage_hosts.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('.') {
                host.ends_with(pattern.as_str()) || host == suffix
            } else {
                host == pattern
            }
        })
    }
}

/// Flags describing a raw content URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlKind {
    pub is_relative_api_path: bool,
    pub is_backend_url: bool,
    pub is_storage_url: bool,
    pub is_stream_endpoint: bool,
}

impl UrlKind {
    /// Absolute URL the resolver may cache under the signed-URL TTL.
    pub fn is_cacheable_signed(&self) -> bool {
        !self.is_relative_api_path && (self.is_backend_url || self.is_storage_url)
    }
}

fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization().to_lowercase()
}

/// Classify a raw URL against the known backend and storage origins.
pub fn classify_url(raw: &str, patterns: &UrlPatterns) -> UrlKind {
    let raw = raw.trim();
    let mut kind = UrlKind {
        is_relative_api_path: raw.starts_with("/api/"),
        ..UrlKind::default()
    };

    if kind.is_relative_api_path {
        let path = raw.split(['?', '#']).next().unwrap_or(raw);
        kind.is_stream_endpoint = path.contains("/stream");
        return kind;
    }

    if let Ok(parsed) = Url::parse(raw) {
        kind.is_stream_endpoint = parsed.path().contains("/stream");
        kind.is_backend_url = origin_of(&parsed) == patterns.backend_origin;
        let host_match = parsed
            .host_str()
            .map(|host| patterns.matches_storage_host(&host.to_lowercase()))
            .unwrap_or(false);
        let signed = parsed
            .query_pairs()
            .any(|(k, _)| SIGNATURE_PARAMS.contains(&k.to_lowercase().as_str()));
        kind.is_storage_url = host_match || signed;
    }

    kind
}
