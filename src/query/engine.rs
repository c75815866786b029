//! The query pipeline: filter, tally, sort, paginate.
//!
//! One pure pass over the catalog per state change, no caching. The
//! stages are:
//! - Filter: every active dimension must accept the item
//! - Tally: facet counts over the filtered set; tallies reflect every
//!   active filter, including a dimension's own selection
//! - Sort: one of the five sort modes
//! - Paginate: clamp the requested page and slice
//!
//! Catalogs are small enough that recomputing on every keystroke-level
//! change costs less than keeping caches honest.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::catalog::{ContentItem, FunnelStage};

use super::score::relevance_score;
use super::state::{QueryState, SortMode};

/// Label -> count for one facet dimension
#[derive(Debug, Clone, Default)]
pub struct FacetTally(BTreeMap<String, usize>);

impl FacetTally {
    fn bump(&mut self, label: &str) {
        *self.0.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Count for one label, 0 when absent
    pub fn count(&self, label: &str) -> usize {
        self.0.get(label).copied().unwrap_or(0)
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Entries ordered by count descending, then label ascending
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> =
            self.0.iter().map(|(label, count)| (label.as_str(), *count)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Facet tallies for every dimension, computed over the filtered set
#[derive(Debug, Clone, Default)]
pub struct FacetCounts {
    pub types: FacetTally,
    pub stages: FacetTally,
    pub industries: FacetTally,
    pub personas: FacetTally,
    pub topics: FacetTally,
    pub tags: FacetTally,
    pub years: FacetTally,
}

impl FacetCounts {
    /// Tally each dimension across the given items. Multi-valued
    /// dimensions contribute once per label per item; items without a
    /// stage or date are simply absent from those tallies.
    pub fn tally(items: &[&ContentItem]) -> Self {
        let mut counts = Self::default();

        for item in items {
            counts.types.bump(item.content_type.label());
            if let Some(stage) = item.funnel_stage {
                counts.stages.bump(stage.label());
            }
            for label in &item.industries {
                counts.industries.bump(label);
            }
            for label in &item.personas {
                counts.personas.bump(label);
            }
            for label in &item.topics {
                counts.topics.bump(label);
            }
            for label in &item.tags {
                counts.tags.bump(label);
            }
            if let Some(year) = item.release_year() {
                counts.years.bump(&year);
            }
        }

        counts
    }
}

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone)]
pub struct QueryOutput<'a> {
    /// Size of the filtered set (across all pages)
    pub total: usize,

    /// Facet tallies over the filtered set
    pub facets: FacetCounts,

    /// The page actually shown, clamped into `[1, page_count]`
    pub page: usize,

    /// Total number of pages, at least 1
    pub page_count: usize,

    /// The visible slice of sorted results
    pub items: Vec<&'a ContentItem>,
}

/// Run the full pipeline against the current wall clock
pub fn run_query<'a>(catalog: &'a [ContentItem], state: &QueryState) -> QueryOutput<'a> {
    run_query_at(catalog, state, Utc::now())
}

/// Run the full pipeline with an explicit clock for the recency bonus
pub fn run_query_at<'a>(
    catalog: &'a [ContentItem],
    state: &QueryState,
    now: DateTime<Utc>,
) -> QueryOutput<'a> {
    let mut results: Vec<&ContentItem> = catalog.iter().filter(|i| matches(i, state)).collect();

    let total = results.len();
    let facets = FacetCounts::tally(&results);

    sort_results(&mut results, state.sort, state.trimmed_term(), now);

    let page_size = state.page_size.max(1);
    let page_count = page_count(total, page_size);
    let page = state.page.clamp(1, page_count);
    let items = results
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    QueryOutput {
        total,
        facets,
        page,
        page_count,
        items,
    }
}

/// `max(1, ceil(total / page_size))`: an empty result set still has
/// one (empty) page
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// An item passes iff every active dimension accepts it
fn matches(item: &ContentItem, state: &QueryState) -> bool {
    matches_term(item, state.trimmed_term())
        && (state.types.is_empty() || state.types.contains(&item.content_type))
        && contains_all(&item.industries, &state.industries)
        && contains_all(&item.personas, &state.personas)
        && contains_all(&item.topics, &state.topics)
        && contains_all(&item.tags, &state.tags)
        && matches_stage(item.funnel_stage, &state.stages)
        && matches_year(item, &state.years)
}

/// Whole-term, case-insensitive substring match against any single
/// searchable field: title, summary, or any one label
fn matches_term(item: &ContentItem, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    let needle = term.to_lowercase();
    item.title.to_lowercase().contains(&needle)
        || item.summary.to_lowercase().contains(&needle)
        || item
            .topics
            .iter()
            .chain(&item.tags)
            .chain(&item.personas)
            .chain(&item.industries)
            .any(|label| label.to_lowercase().contains(&needle))
}

/// AND semantics for multi-valued dimensions: the item must carry every
/// selected label
fn contains_all(labels: &[String], selected: &BTreeSet<String>) -> bool {
    selected.iter().all(|wanted| labels.contains(wanted))
}

/// OR semantics; an item without a stage never matches a selection
fn matches_stage(stage: Option<FunnelStage>, selected: &BTreeSet<FunnelStage>) -> bool {
    selected.is_empty() || stage.is_some_and(|s| selected.contains(&s))
}

/// OR semantics; an undated item never matches a selection
fn matches_year(item: &ContentItem, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || item.release_year().is_some_and(|y| selected.contains(&y))
}

fn sort_results(results: &mut Vec<&ContentItem>, sort: SortMode, term: &str, now: DateTime<Utc>) {
    match sort {
        SortMode::Newest => results.sort_by(|a, b| by_date_desc(a, b)),
        SortMode::Oldest => results.sort_by(|a, b| by_date_asc(a, b)),
        SortMode::Shortest => {
            results.sort_by(|a, b| minutes(a).cmp(&minutes(b)).then_with(|| by_date_desc(a, b)))
        }
        SortMode::Longest => {
            results.sort_by(|a, b| minutes(b).cmp(&minutes(a)).then_with(|| by_date_desc(a, b)))
        }
        SortMode::Relevance => {
            if term.is_empty() {
                // No term to score against: relevance degenerates to newest
                results.sort_by(|a, b| by_date_desc(a, b));
            } else {
                let mut scored: Vec<(&ContentItem, f64)> = results
                    .iter()
                    .map(|item| (*item, relevance_score(item, term, now)))
                    .collect();
                // Stable sort: equal scores keep filtered order
                scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
                *results = scored.into_iter().map(|(item, _)| item).collect();
            }
        }
    }
}

/// Release date descending; undated items order after all dated ones
fn by_date_desc(a: &ContentItem, b: &ContentItem) -> Ordering {
    match (a.release_date, b.release_date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Release date ascending; undated items still order last
fn by_date_asc(a: &ContentItem, b: &ContentItem) -> Ordering {
    match (a.release_date, b.release_date) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Read-time sort key with missing values treated as zero
fn minutes(item: &ContentItem) -> u32 {
    item.read_minutes().unwrap_or(0)
}
