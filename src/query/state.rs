//! Query state and its reducer.
//!
//! All search, filter, sort, and pagination selections live in one
//! immutable value. State transitions go through the pure
//! `QueryState::apply` reducer, which keeps the pipeline testable in
//! isolation from any rendering. Nothing here is persisted; a session
//! starts from `QueryState::default()`.

use std::collections::BTreeSet;

use crate::catalog::{ContentType, FunnelStage};

/// Default number of result cards per page
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// How the filtered result set is ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Keyword-hit score plus recency bonus; behaves like `newest`
    /// while no search term is set
    Relevance,

    /// Release date descending
    #[default]
    Newest,

    /// Release date ascending
    Oldest,

    /// Read time ascending
    Shortest,

    /// Read time descending
    Longest,
}

impl SortMode {
    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Shortest => "shortest",
            SortMode::Longest => "longest",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(SortMode::Relevance),
            "newest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "shortest" => Ok(SortMode::Shortest),
            "longest" => Ok(SortMode::Longest),
            _ => anyhow::bail!("Unknown sort mode: {}", s),
        }
    }
}

/// The complete set of selections driving the query engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Free-text search term (stored raw, trimmed at point of use)
    pub term: String,

    /// Selected content types (OR within the dimension)
    pub types: BTreeSet<ContentType>,

    /// Selected industry labels (item must carry ALL of them)
    pub industries: BTreeSet<String>,

    /// Selected persona labels (item must carry ALL of them)
    pub personas: BTreeSet<String>,

    /// Selected topic labels (item must carry ALL of them)
    pub topics: BTreeSet<String>,

    /// Selected tags (item must carry ALL of them)
    pub tags: BTreeSet<String>,

    /// Selected funnel stages (OR within the dimension)
    pub stages: BTreeSet<FunnelStage>,

    /// Selected release years as 4-digit strings (OR within the dimension)
    pub years: BTreeSet<String>,

    /// Result ordering
    pub sort: SortMode,

    /// Requested page, 1-based; clamped against the page count at
    /// pagination time
    pub page: usize,

    /// Cards per page, at least 1
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            term: String::new(),
            types: BTreeSet::new(),
            industries: BTreeSet::new(),
            personas: BTreeSet::new(),
            topics: BTreeSet::new(),
            tags: BTreeSet::new(),
            stages: BTreeSet::new(),
            years: BTreeSet::new(),
            sort: SortMode::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A single user interaction, fed back into the state via `apply`
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAction {
    /// Replace the free-text term
    SetTerm(String),

    /// Toggle a content type selection
    ToggleType(ContentType),

    /// Toggle an industry label
    ToggleIndustry(String),

    /// Toggle a persona label
    TogglePersona(String),

    /// Toggle a topic label
    ToggleTopic(String),

    /// Toggle a tag
    ToggleTag(String),

    /// Toggle a funnel stage
    ToggleStage(FunnelStage),

    /// Toggle a release year
    ToggleYear(String),

    /// Change the result ordering
    SetSort(SortMode),

    /// Jump to a page (floored to 1; the engine clamps the upper end)
    SetPage(usize),

    /// Change the page size (floored to 1)
    SetPageSize(usize),

    /// Drop the term and every facet selection, keeping sort and page size
    ClearFilters,
}

impl QueryState {
    /// Pure reducer: returns the next state for an action.
    ///
    /// Any filter change and any page-size change resets the page to 1.
    /// Sort changes keep the page: the filtered total is unchanged, so
    /// the page stays valid.
    pub fn apply(&self, action: QueryAction) -> QueryState {
        let mut next = self.clone();

        match action {
            QueryAction::SetTerm(term) => {
                next.term = term;
                next.page = 1;
            }
            QueryAction::ToggleType(value) => {
                toggle(&mut next.types, value);
                next.page = 1;
            }
            QueryAction::ToggleIndustry(value) => {
                toggle(&mut next.industries, value);
                next.page = 1;
            }
            QueryAction::TogglePersona(value) => {
                toggle(&mut next.personas, value);
                next.page = 1;
            }
            QueryAction::ToggleTopic(value) => {
                toggle(&mut next.topics, value);
                next.page = 1;
            }
            QueryAction::ToggleTag(value) => {
                toggle(&mut next.tags, value);
                next.page = 1;
            }
            QueryAction::ToggleStage(value) => {
                toggle(&mut next.stages, value);
                next.page = 1;
            }
            QueryAction::ToggleYear(value) => {
                toggle(&mut next.years, value);
                next.page = 1;
            }
            QueryAction::SetSort(sort) => {
                next.sort = sort;
            }
            QueryAction::SetPage(page) => {
                next.page = page.max(1);
            }
            QueryAction::SetPageSize(size) => {
                next.page_size = size.max(1);
                next.page = 1;
            }
            QueryAction::ClearFilters => {
                next.term.clear();
                next.types.clear();
                next.industries.clear();
                next.personas.clear();
                next.topics.clear();
                next.tags.clear();
                next.stages.clear();
                next.years.clear();
                next.page = 1;
            }
        }

        next
    }

    /// The search term as the engine sees it
    pub fn trimmed_term(&self) -> &str {
        self.term.trim()
    }

    /// Whether any filter (term or facet selection) is active
    pub fn has_filters(&self) -> bool {
        !self.trimmed_term().is_empty()
            || !self.types.is_empty()
            || !self.industries.is_empty()
            || !self.personas.is_empty()
            || !self.topics.is_empty()
            || !self.tags.is_empty()
            || !self.stages.is_empty()
            || !self.years.is_empty()
    }
}

/// Insert the value if absent, remove it if present
fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}
