//! Bearer-token sources.
//!
//! The token is looked up on every request so a token written by a separate
//! login flow is picked up without rebuilding the client. There is no
//! refresh-token handling.
//!
//! Lookups are synchronous and run inside async request paths. `FileCredentials`
//! only stats the file per request and re-reads it when its modification time
//! or size changes.

use docview_core::constants::ACCESS_TOKEN_KEY;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;

/// Environment variable read by `EnvCredentials`.
pub const ACCESS_TOKEN_ENV: &str = "DOCVIEW_ACCESS_TOKEN";

pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    /// Current bearer token, if signed in.
    fn access_token(&self) -> Option<String>;
}

fn non_empty(token: String) -> Option<String> {
    let token = token.trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(non_empty(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl CredentialStore for StaticCredentials {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Reads `DOCVIEW_ACCESS_TOKEN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialStore for EnvCredentials {
    fn access_token(&self) -> Option<String> {
        std::env::var(ACCESS_TOKEN_ENV).ok().and_then(non_empty)
    }
}

/// JSON credential file: `{ "access_token": "..." }`.
#[derive(Debug)]
pub struct FileCredentials {
    path: PathBuf,
    cached: Mutex<Option<CachedToken>>,
}

/// Token parsed from one version of the credential file.
#[derive(Debug, Clone)]
struct CachedToken {
    modified: SystemTime,
    len: u64,
    token: Option<String>,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    fn read_token(&self) -> Option<String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "Failed to read credential file");
                }
                return None;
            }
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Credential file is not valid JSON");
                return None;
            }
        };

        value
            .get(ACCESS_TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .and_then(non_empty)
    }
}

impl CredentialStore for FileCredentials {
    fn access_token(&self) -> Option<String> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "Failed to stat credential file");
                }
                if let Ok(mut cached) = self.cached.lock() {
                    *cached = None;
                }
                return None;
            }
        };

        let modified = match metadata.modified() {
            Ok(modified) => modified,
            // No mtime support on this platform; read every time.
            Err(_) => return self.read_token(),
        };
        let len = metadata.len();

        let mut cached = match self.cached.lock() {
            Ok(cached) => cached,
            Err(_) => return self.read_token(),
        };
        if let Some(entry) = cached.as_ref() {
            if entry.modified == modified && entry.len == len {
                return entry.token.clone();
            }
        }

        let token = self.read_token();
        *cached = Some(CachedToken {
            modified,
            len,
            token: token.clone(),
        });
        token
    }
}

/// First store that yields a token wins.
#[derive(Debug, Default)]
pub struct ChainedCredentials {
    stores: Vec<Box<dyn CredentialStore>>,
}

impl ChainedCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, store: impl CredentialStore + 'static) -> Self {
        self.stores.push(Box::new(store));
        self
    }
}

impl CredentialStore for ChainedCredentials {
    fn access_token(&self) -> Option<String> {
        self.stores.iter().find_map(|store| store.access_token())
    }
}
