//! Relevance scoring for free-text search.
//!
//! The score is a keyword heuristic, not a ranking model: each search
//! token earns fixed weights for title, summary, and anywhere-at-all
//! hits, and fresh content earns a small recency bonus. Scores only
//! matter relative to each other within one result set.
//!
//! The clock is passed in so scoring stays deterministic under test.

use chrono::{DateTime, Utc};

use crate::catalog::ContentItem;

/// Points per token found in the title
pub const TITLE_WEIGHT: f64 = 5.0;

/// Points per token found in the summary
pub const SUMMARY_WEIGHT: f64 = 2.0;

/// Points per token found anywhere in the searchable fields; additive
/// with the title and summary weights, so a title hit is worth 5 + 1
pub const ANYWHERE_WEIGHT: f64 = 1.0;

/// The recency bonus uses a fixed 365-day year
const SECS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// Split a search term into lowercase tokens on whitespace
pub fn tokenize(term: &str) -> Vec<String> {
    term.split_whitespace().map(str::to_lowercase).collect()
}

/// Score one item against a search term at a given instant.
///
/// Per token: +5 for a title hit, +2 for a summary hit, +1 for a hit
/// anywhere in the concatenated searchable fields (independent of the
/// other two). A recency bonus of `max(0, 2 - age_in_years)` is added
/// on top; undated items get none.
pub fn relevance_score(item: &ContentItem, term: &str, now: DateTime<Utc>) -> f64 {
    let title = item.title.to_lowercase();
    let summary = item.summary.to_lowercase();
    let haystack = item.search_haystack();

    let mut score = 0.0;
    for token in tokenize(term) {
        if title.contains(&token) {
            score += TITLE_WEIGHT;
        }
        if summary.contains(&token) {
            score += SUMMARY_WEIGHT;
        }
        if haystack.contains(&token) {
            score += ANYWHERE_WEIGHT;
        }
    }

    score + recency_bonus(item.release_date, now)
}

/// Recency bonus: 2 points at the moment of release, fading linearly
/// to 0 over two 365-day years. Never negative, so old content is not
/// penalized below its keyword score.
pub fn recency_bonus(release_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(date) = release_date else {
        return 0.0;
    };

    let age_years = (now - date).num_seconds() as f64 / SECS_PER_YEAR;
    (2.0 - age_years).max(0.0)
}
