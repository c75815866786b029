//! Terminal rendering for catalog output.
//!
//! Pure formatting only: every function returns a `String` and the
//! command handlers decide where it goes. Cards, facet tallies, filter
//! chips, pager lines, and the boxed detail view all live here.

use crate::catalog::{ContentItem, ContentType};
use crate::query::{FacetCounts, FacetTally, QueryOutput, QueryState, SortMode};

/// Card summaries are cut at this many characters
const SUMMARY_WIDTH: usize = 120;

/// One result card: title line, truncated summary, meta line, tags,
/// media, and the call-to-action link.
pub fn format_card(item: &ContentItem) -> String {
    let mut lines = Vec::new();

    let year = item
        .release_year()
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();
    lines.push(format!(
        "{} [{}]{}",
        item.title,
        item.content_type.label(),
        year
    ));

    if !item.summary.is_empty() {
        lines.push(format!("  {}", truncate(&item.summary, SUMMARY_WIDTH)));
    }

    lines.push(format!("  {}", meta_line(item)));

    if !item.tags.is_empty() {
        lines.push(format!("  Tags: {}", item.tags.join(", ")));
    }

    if item.content_type == ContentType::Video {
        if let Some(cover) = &item.cover_url {
            lines.push(format!("  Poster: {}", cover));
        }
    }

    lines.push(format!(
        "  {}: {}",
        item.content_type.cta_label(),
        item.file_url
    ));

    lines.join("\n")
}

/// Stage, duration, version, and date joined with pipes; absent fields
/// are left out rather than rendered blank
fn meta_line(item: &ContentItem) -> String {
    let mut parts = Vec::new();

    if let Some(stage) = item.funnel_stage {
        parts.push(stage.label().to_string());
    }
    parts.push(item.display_duration());
    parts.push(format!("v{}", item.version));
    if let Some(date) = item.release_date {
        parts.push(date.format("%Y-%m-%d").to_string());
    }

    parts.join(" | ")
}

/// Active-filter chips, `None` when nothing is filtered and the sort
/// is the default
pub fn format_chips(state: &QueryState) -> Option<String> {
    let mut chips = Vec::new();

    let term = state.trimmed_term();
    if !term.is_empty() {
        chips.push(format!("term: \"{}\"", term));
    }
    if !state.types.is_empty() {
        let labels: Vec<&str> = state.types.iter().map(|t| t.label()).collect();
        chips.push(format!("type: {}", labels.join(", ")));
    }
    if !state.stages.is_empty() {
        let labels: Vec<&str> = state.stages.iter().map(|s| s.label()).collect();
        chips.push(format!("stage: {}", labels.join(", ")));
    }
    for (name, set) in [
        ("industry", &state.industries),
        ("persona", &state.personas),
        ("topic", &state.topics),
        ("tag", &state.tags),
        ("year", &state.years),
    ] {
        if !set.is_empty() {
            let labels: Vec<&str> = set.iter().map(String::as_str).collect();
            chips.push(format!("{}: {}", name, labels.join(", ")));
        }
    }
    if state.sort != SortMode::default() {
        chips.push(format!("sort: {}", state.sort));
    }

    if chips.is_empty() {
        None
    } else {
        Some(format!("Filters: {}", chips.join(" | ")))
    }
}

/// Pager line: `Page 2 of 3 (25 results)`
pub fn format_pager(out: &QueryOutput) -> String {
    let noun = if out.total == 1 { "result" } else { "results" };
    format!("Page {} of {} ({} {})", out.page, out.page_count, out.total, noun)
}

/// One tally section: header plus `label  count` rows ordered by
/// count descending
pub fn format_section(name: &str, tally: &FacetTally) -> String {
    let mut lines = vec![name.to_string()];
    for (label, count) in tally.ranked() {
        lines.push(format!("  {:<24} {:>4}", label, count));
    }
    lines.join("\n")
}

/// All seven dimension tallies; empty dimensions are skipped
pub fn format_tallies(facets: &FacetCounts) -> String {
    let sections = [
        ("Type", &facets.types),
        ("Stage", &facets.stages),
        ("Industry", &facets.industries),
        ("Persona", &facets.personas),
        ("Topic", &facets.topics),
        ("Tag", &facets.tags),
        ("Year", &facets.years),
    ];

    let rendered: Vec<String> = sections
        .iter()
        .filter(|(_, tally)| !tally.is_empty())
        .map(|(name, tally)| format_section(name, tally))
        .collect();

    if rendered.is_empty() {
        "No facets to show.".to_string()
    } else {
        rendered.join("\n\n")
    }
}

/// Boxed detail view for one item, full summary underneath
pub fn format_detail(item: &ContentItem) -> String {
    let mut lines = Vec::new();

    lines.push("╔══════════════════════════════════════════════════════════════╗".to_string());
    lines.push(format!("  ID: {}", item.id));
    lines.push(format!("  Title: {}", item.title));
    lines.push(format!("  Type: {}", item.content_type));
    if let Some(stage) = item.funnel_stage {
        lines.push(format!("  Stage: {}", stage));
    }
    if let Some(date) = item.release_date {
        lines.push(format!("  Released: {}", date.format("%Y-%m-%d")));
    }
    lines.push(format!("  Version: {}", item.version));
    lines.push(format!("  Duration: {}", item.display_duration()));
    for (name, labels) in [
        ("Industries", &item.industries),
        ("Personas", &item.personas),
        ("Topics", &item.topics),
        ("Tags", &item.tags),
    ] {
        if !labels.is_empty() {
            lines.push(format!("  {}: {}", name, labels.join(", ")));
        }
    }
    lines.push("╚══════════════════════════════════════════════════════════════╝".to_string());

    if !item.summary.is_empty() {
        lines.push(String::new());
        lines.push(item.summary.clone());
    }

    lines.push(String::new());
    if item.content_type == ContentType::Video {
        if let Some(cover) = &item.cover_url {
            lines.push(format!("Poster: {}", cover));
        }
    }
    lines.push(format!("{}: {}", item.content_type.cta_label(), item.file_url));

    lines.join("\n")
}

/// Cut a string at `max` characters, appending `...` when shortened
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}
