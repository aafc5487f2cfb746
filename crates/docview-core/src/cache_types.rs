use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Signed-URL cache backend types
///
/// Defined in core because configuration selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local LRU, discarded on exit (tab-session semantics)
    #[default]
    Memory,
    /// JSON file shared by processes that point at the same path
    File,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "file" => Ok(CacheBackend::File),
            _ => Err(anyhow::anyhow!("Invalid cache backend: {}", s)),
        }
    }
}

impl Display for CacheBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CacheBackend::Memory => write!(f, "memory"),
            CacheBackend::File => write!(f, "file"),
        }
    }
}
