//! Pure query layer: state, scoring, and the pipeline.
//!
//! This module contains:
//! - State: the immutable `QueryState` and its action reducer
//! - Score: keyword relevance with a linear recency bonus
//! - Engine: filter, facet tallies, sort, and pagination in one pass
//!
//! Nothing here touches the network, the filesystem, or the terminal;
//! callers pass a loaded catalog in and render the output themselves.

pub mod engine;
pub mod score;
pub mod state;

// Re-export commonly used types
pub use engine::{page_count, run_query, run_query_at, FacetCounts, FacetTally, QueryOutput};
pub use score::{recency_bonus, relevance_score, tokenize};
pub use state::{QueryAction, QueryState, SortMode, DEFAULT_PAGE_SIZE};
