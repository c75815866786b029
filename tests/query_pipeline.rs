//! Query Pipeline Integration Tests
//!
//! End-to-end runs of the filter/tally/sort/paginate pipeline over the
//! built-in sample catalog.

use chrono::{TimeZone, Utc};

use vitrine::catalog::sample_catalog;
use vitrine::query::{run_query, run_query_at, QueryAction, QueryState, SortMode};

fn ids(out: &vitrine::QueryOutput) -> Vec<String> {
    out.items.iter().map(|i| i.id.clone()).collect()
}

#[test]
fn test_no_filters_returns_whole_catalog_newest_first() {
    let catalog = sample_catalog();
    let out = run_query(&catalog, &QueryState::default());

    assert_eq!(out.total, 3);
    assert_eq!(out.page, 1);
    assert_eq!(out.page_count, 1);
    assert_eq!(
        ids(&out),
        vec!["wp-zero-trust", "wp-developer-intent", "vid-ai-governance"]
    );
}

#[test]
fn test_zero_trust_relevance_ranks_title_match_first() {
    let catalog = sample_catalog();
    let now = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();

    let state = QueryState::default()
        .apply(QueryAction::SetTerm("zero trust".to_string()))
        .apply(QueryAction::SetSort(SortMode::Relevance));
    let out = run_query_at(&catalog, &state, now);

    // The phrase matches the whitepaper's title and the video's
    // "zero trust readiness" tag; the developer-intent paper has no
    // field containing it
    assert_eq!(out.total, 2);
    assert_eq!(ids(&out), vec!["wp-zero-trust", "vid-ai-governance"]);
}

#[test]
fn test_term_must_match_within_a_single_field() {
    let catalog = sample_catalog();

    // "governance telemetry" spans two different items; no single
    // field anywhere contains the whole phrase
    let state =
        QueryState::default().apply(QueryAction::SetTerm("governance telemetry".to_string()));
    let out = run_query(&catalog, &state);

    assert_eq!(out.total, 0);
    assert_eq!(out.page_count, 1);
}

#[test]
fn test_industry_selection_is_and() {
    let catalog = sample_catalog();

    let state = QueryState::default().apply(QueryAction::ToggleIndustry("Tech".to_string()));
    assert_eq!(run_query(&catalog, &state).total, 3);

    let state = state.apply(QueryAction::ToggleIndustry("Finance".to_string()));
    let out = run_query(&catalog, &state);
    assert_eq!(out.total, 1);
    assert_eq!(ids(&out), vec!["wp-zero-trust"]);
}

#[test]
fn test_selecting_both_types_matches_everything() {
    let catalog = sample_catalog();

    let state = QueryState::default()
        .apply(QueryAction::ToggleType(vitrine::ContentType::Video))
        .apply(QueryAction::ToggleType(vitrine::ContentType::Whitepaper));

    assert_eq!(run_query(&catalog, &state).total, 3);
}

#[test]
fn test_requested_page_clamps_to_page_count() {
    let catalog = sample_catalog();

    let state = QueryState::default()
        .apply(QueryAction::SetPageSize(1))
        .apply(QueryAction::SetPage(5));
    let out = run_query(&catalog, &state);

    assert_eq!(out.page_count, 3);
    assert_eq!(out.page, 3);
    // The last page of the newest ordering holds the oldest item
    assert_eq!(ids(&out), vec!["vid-ai-governance"]);
}

#[test]
fn test_type_tally_sums_to_filtered_total() {
    let catalog = sample_catalog();
    let out = run_query(&catalog, &QueryState::default());

    assert_eq!(out.facets.types.total(), out.total);
    assert_eq!(out.facets.types.count("whitepaper"), 2);
    assert_eq!(out.facets.types.count("video"), 1);
}

#[test]
fn test_tallies_recompute_over_filtered_set() {
    let catalog = sample_catalog();

    let state = QueryState::default().apply(QueryAction::ToggleIndustry("Finance".to_string()));
    let out = run_query(&catalog, &state);

    // Only the zero-trust paper remains; sibling labels shrink with it
    assert_eq!(out.total, 1);
    assert_eq!(out.facets.industries.count("Finance"), 1);
    assert_eq!(out.facets.industries.count("Tech"), 1);
    assert_eq!(out.facets.industries.count("Healthcare"), 0);
    assert_eq!(out.facets.types.count("video"), 0);
}

#[test]
fn test_year_tally_and_selection() {
    let catalog = sample_catalog();
    let out = run_query(&catalog, &QueryState::default());
    assert_eq!(out.facets.years.count("2025"), 3);

    let state = QueryState::default().apply(QueryAction::ToggleYear("2024".to_string()));
    assert_eq!(run_query(&catalog, &state).total, 0);
}

#[test]
fn test_shortest_and_longest_use_duration_chain() {
    let catalog = sample_catalog();

    // 9 min (1800 words), 12 min declared, 21 min video
    let state = QueryState::default().apply(QueryAction::SetSort(SortMode::Shortest));
    assert_eq!(
        ids(&run_query(&catalog, &state)),
        vec!["wp-developer-intent", "wp-zero-trust", "vid-ai-governance"]
    );

    let state = QueryState::default().apply(QueryAction::SetSort(SortMode::Longest));
    assert_eq!(
        ids(&run_query(&catalog, &state)),
        vec!["vid-ai-governance", "wp-zero-trust", "wp-developer-intent"]
    );
}

#[test]
fn test_oldest_reverses_newest() {
    let catalog = sample_catalog();

    let state = QueryState::default().apply(QueryAction::SetSort(SortMode::Oldest));
    assert_eq!(
        ids(&run_query(&catalog, &state)),
        vec!["vid-ai-governance", "wp-developer-intent", "wp-zero-trust"]
    );
}

#[test]
fn test_filter_change_resets_page_but_sort_keeps_it() {
    let state = QueryState::default()
        .apply(QueryAction::SetPageSize(1))
        .apply(QueryAction::SetPage(2));
    assert_eq!(state.page, 2);

    // Sort changes keep the page
    let sorted = state.apply(QueryAction::SetSort(SortMode::Oldest));
    assert_eq!(sorted.page, 2);

    // Any filter change goes back to page 1
    let filtered = sorted.apply(QueryAction::ToggleIndustry("Tech".to_string()));
    assert_eq!(filtered.page, 1);
}

#[test]
fn test_cleared_session_still_paginates_with_kept_settings() {
    let catalog = sample_catalog();

    let state = QueryState::default()
        .apply(QueryAction::SetTerm("zero trust".to_string()))
        .apply(QueryAction::ToggleIndustry("Finance".to_string()))
        .apply(QueryAction::SetSort(SortMode::Oldest))
        .apply(QueryAction::SetPageSize(2));

    let cleared = state.apply(QueryAction::ClearFilters);
    assert_eq!(cleared.sort, SortMode::Oldest);
    assert_eq!(cleared.page_size, 2);
    assert!(!cleared.has_filters());

    let out = run_query(&catalog, &cleared);
    assert_eq!(out.total, 3);
    assert_eq!(out.page_count, 2);
}
