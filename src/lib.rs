//! vitrine - Faceted discovery over static content catalogs
//!
//! A content-discovery library and CLI: it loads a static JSON catalog
//! of documents and videos (over HTTP or from a file), then provides
//! full-text search, multi-select faceted filtering, sorting, and
//! pagination entirely in-process.
//!
//! # Architecture
//!
//! The system is built around one pure query pipeline:
//! - The catalog is normalized once at load time and never mutated
//! - A `QueryState` value holds every search/filter/sort/page selection
//! - Each state change re-runs filter, facet tallies, sort, and
//!   pagination over the full catalog
//!
//! # Modules
//!
//! - `catalog`: item model, JSON normalization, loader with fallback
//! - `query`: query state, relevance scoring, and the pipeline
//! - `cli`: command-line interface (one-shot and interactive)
//! - `config`: config file discovery and environment overrides
//!
//! # Usage
//!
//! ```bash
//! # One-shot search
//! vitrine search zero trust --type whitepaper --industry Tech
//!
//! # Interactive session
//! vitrine browse --catalog ./catalog.json
//!
//! # Facet counts for a filter
//! vitrine facets --industry Finance
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod query;

// Re-export main types at crate root for convenience
pub use catalog::{load, CatalogOrigin, ContentItem, ContentType, FunnelStage, LoadOutcome};
pub use query::{run_query, run_query_at, QueryAction, QueryOutput, QueryState, SortMode};
