//! Catalog loading and the content item model.
//!
//! This module contains:
//! - Item: the canonical `ContentItem` shape and one-time JSON normalization
//! - Loader: single-attempt fetch (URL or file) with a sample-catalog fallback
//! - Sample: the fixed 3-item catalog used when a load fails

pub mod item;
pub mod loader;
pub mod sample;

// Re-export commonly used types
pub use item::{normalize_value, ContentItem, ContentType, FunnelStage};
pub use loader::{load, CatalogOrigin, LoadError, LoadOutcome};
pub use sample::{sample_catalog, sample_json};
