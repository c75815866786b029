//! Configuration for vitrine.
//!
//! Configuration sources (highest priority first):
//! 1. CLI flags (resolved by clap, not here)
//! 2. Environment variables (VITRINE_CATALOG, VITRINE_PAGE_SIZE)
//! 3. Config file (.vitrine/config.yaml)
//! 4. Defaults (demo catalog URL, page size 12)
//!
//! Config file discovery:
//! - Searches current directory and parents for .vitrine/config.yaml
//! - Falls back to ~/.vitrine/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::query::DEFAULT_PAGE_SIZE;

/// Demo catalog used when nothing else is configured; unreachable hosts
/// degrade to the built-in sample catalog, so this is always safe
pub const DEFAULT_CATALOG_URL: &str = "https://demo.vitrine.dev/catalog.json";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Catalog source: an http(s) URL or a file path
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiConfig {
    /// Results per page
    pub page_size: Option<usize>,
}

/// Resolved configuration after merging environment, file, and defaults
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Catalog source (URL or file path)
    pub catalog_source: String,
    /// Results per page, at least 1
    pub page_size: usize,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents, then
/// the home directory
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".vitrine").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(".vitrine").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();

    let file = match config_file {
        Some(ref path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let catalog_source = if let Ok(env_source) = std::env::var("VITRINE_CATALOG") {
        env_source
    } else if let Some(source) = file.catalog.source {
        source
    } else {
        DEFAULT_CATALOG_URL.to_string()
    };

    let page_size = match std::env::var("VITRINE_PAGE_SIZE") {
        Ok(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("Invalid VITRINE_PAGE_SIZE: {}", raw))?,
        Err(_) => file.ui.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    };

    Ok(ResolvedConfig {
        catalog_source,
        page_size: page_size.max(1),
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Catalog source honored when no --catalog flag is given
pub fn catalog_source() -> Result<String> {
    Ok(config()?.catalog_source.clone())
}

/// Results per page honored when no --page-size flag is given
pub fn page_size() -> Result<usize> {
    Ok(config()?.page_size)
}
