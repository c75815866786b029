//! Catalog loading with a built-in fallback.
//!
//! A catalog source is either an `http(s)://` URL fetched with a single
//! GET, or a local JSON file path. One attempt, no retry, no timeout:
//! the data is read-only static content, refreshed by re-running the
//! command. Any failure substitutes the sample catalog and surfaces a
//! non-blocking warning instead of an error.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::item::{normalize_value, ContentItem};
use super::sample;

/// Where the loaded catalog actually came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrigin {
    /// Fetched over HTTP(S)
    Remote,

    /// Read from a local file
    File,

    /// The built-in sample catalog, after a load failure
    Fallback,
}

impl CatalogOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            CatalogOrigin::Remote => "remote",
            CatalogOrigin::File => "local file",
            CatalogOrigin::Fallback => "built-in sample",
        }
    }
}

impl std::fmt::Display for CatalogOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Ways a catalog load can fail before the fallback kicks in
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to read {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of a catalog load. Never an error: failures degrade to the
/// sample catalog plus a warning for display.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Normalized items
    pub items: Vec<ContentItem>,

    /// Where the items came from
    pub origin: CatalogOrigin,

    /// Non-fatal notice when the requested source could not be used
    pub warning: Option<String>,
}

/// Load a catalog from a URL or file path.
///
/// On any failure (network, HTTP status, unreadable file, bad JSON)
/// returns the built-in sample catalog with `origin: Fallback` and a
/// warning describing what went wrong.
pub async fn load(source: &str) -> LoadOutcome {
    match fetch(source).await {
        Ok((items, origin)) => {
            debug!("Loaded {} catalog items from {} ({})", items.len(), source, origin);
            LoadOutcome {
                items,
                origin,
                warning: None,
            }
        }
        Err(e) => {
            warn!("Catalog load failed, using built-in sample: {}", e);
            LoadOutcome {
                items: sample::sample_catalog(),
                origin: CatalogOrigin::Fallback,
                warning: Some(format!(
                    "Could not load catalog from {}: {}. Showing built-in sample content.",
                    source, e
                )),
            }
        }
    }
}

/// Single fetch attempt against the configured source
async fn fetch(source: &str) -> Result<(Vec<ContentItem>, CatalogOrigin), LoadError> {
    if is_remote(source) {
        let body: Value = reqwest::get(source)
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok((normalize_value(body), CatalogOrigin::Remote))
    } else {
        let path = PathBuf::from(source);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io { path, source })?;
        let body: Value = serde_json::from_str(&text)?;
        Ok((normalize_value(body), CatalogOrigin::File))
    }
}

/// Anything that is not an http(s) URL is treated as a file path
fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
