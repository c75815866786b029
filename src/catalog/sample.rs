//! Built-in fallback catalog.
//!
//! Used whenever a catalog fetch fails so the UI is always populated,
//! and printed by the `sample` subcommand as a starting point for a
//! hosted catalog file. Defined as raw JSON and run through the same
//! normalization as fetched data.

use serde_json::{json, Value};

use super::item::{normalize_value, ContentItem};

/// Raw JSON for the built-in sample catalog
pub fn sample_json() -> Value {
    json!([
        {
            "id": "wp-zero-trust",
            "title": "Zero Trust Security for the Modern Enterprise",
            "summary": "How perimeter-free architectures contain breach impact, with a phased rollout blueprint for regulated environments.",
            "industries": ["Tech", "Finance"],
            "personas": ["Security Lead", "CTO"],
            "topics": ["Security", "Architecture"],
            "tags": ["zero-trust", "identity", "network"],
            "funnel_stage": "Decision",
            "release_date": "2025-10-15",
            "version": 2,
            "content_type": "whitepaper",
            "file_url": "https://cdn.example.com/resources/zero-trust-enterprise.pdf",
            "read_time_min": 12
        },
        {
            "id": "vid-ai-governance",
            "title": "AI Governance in Practice",
            "summary": "A working session on policy guardrails, model inventories, and audit-ready reporting for production AI.",
            "industries": ["Tech", "Healthcare"],
            "personas": ["Compliance Officer", "CTO"],
            "topics": ["AI", "Governance"],
            "tags": ["ai-governance", "compliance", "zero trust readiness"],
            "funnel_stage": "Consideration",
            "release_date": "2025-08-01",
            "version": 1,
            "content_type": "video",
            "file_url": "https://cdn.example.com/resources/ai-governance-session.mp4",
            "cover_url": "https://cdn.example.com/covers/ai-governance.jpg",
            "duration_sec": 1274
        },
        {
            "id": "wp-developer-intent",
            "title": "Understanding Developer Intent",
            "summary": "Signals that predict platform adoption, drawn from onboarding telemetry across fifty engineering teams.",
            "industries": ["Tech"],
            "personas": ["Product Manager", "Engineering Manager"],
            "topics": ["Developer Experience", "Analytics"],
            "tags": ["devex", "telemetry"],
            "funnel_stage": "Awareness",
            "release_date": "2025-09-20",
            "version": 1,
            "content_type": "whitepaper",
            "file_url": "https://cdn.example.com/resources/developer-intent.pdf",
            "words": 1800
        }
    ])
}

/// The fallback items, normalized like any fetched catalog
pub fn sample_catalog() -> Vec<ContentItem> {
    normalize_value(sample_json())
}
