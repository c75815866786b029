//! Canonical content item model and JSON normalization.
//!
//! External catalogs arrive in loosely-shaped JSON. Everything is
//! normalized exactly once at load time so the query engine never has
//! to defend against missing arrays, numeric ids, or bad dates.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Words-per-minute rate for estimating document read time
const READING_RATE_WPM: u32 = 200;

/// Assumed word count when a document declares neither read time nor words
const DEFAULT_WORDS: u32 = 1200;

/// Type of content in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Long-form PDF document
    Whitepaper,

    /// Video asset with inline playback
    Video,

    /// Slide deck
    Slide,

    /// Single-image infographic
    Infographic,
}

impl ContentType {
    /// Label used for badges and facet tallies
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Whitepaper => "whitepaper",
            ContentType::Video => "video",
            ContentType::Slide => "slide",
            ContentType::Infographic => "infographic",
        }
    }

    /// Call-to-action label shown next to the asset link
    pub fn cta_label(&self) -> &'static str {
        match self {
            ContentType::Whitepaper => "Download whitepaper",
            ContentType::Video => "Watch video",
            ContentType::Slide => "View slides",
            ContentType::Infographic => "View infographic",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "whitepaper" | "white-paper" | "white_paper" => Ok(ContentType::Whitepaper),
            "video" => Ok(ContentType::Video),
            "slide" | "slides" | "deck" => Ok(ContentType::Slide),
            "infographic" => Ok(ContentType::Infographic),
            _ => anyhow::bail!("Unknown content type: {}", s),
        }
    }
}

/// Marketing-lifecycle stage tagged on each item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FunnelStage {
    Awareness,
    Consideration,
    Decision,
    Retention,
}

impl FunnelStage {
    /// Label used for chips and facet tallies
    pub fn label(&self) -> &'static str {
        match self {
            FunnelStage::Awareness => "Awareness",
            FunnelStage::Consideration => "Consideration",
            FunnelStage::Decision => "Decision",
            FunnelStage::Retention => "Retention",
        }
    }
}

impl std::fmt::Display for FunnelStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for FunnelStage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "awareness" => Ok(FunnelStage::Awareness),
            "consideration" => Ok(FunnelStage::Consideration),
            "decision" => Ok(FunnelStage::Decision),
            "retention" => Ok(FunnelStage::Retention),
            _ => anyhow::bail!("Unknown funnel stage: {}", s),
        }
    }
}

/// A normalized catalog entry (immutable after load)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier, stable across loads
    pub id: String,

    /// Display title
    pub title: String,

    /// Short description shown on cards
    pub summary: String,

    /// Industry labels (deduplicated, order preserved)
    pub industries: Vec<String>,

    /// Audience persona labels
    pub personas: Vec<String>,

    /// Topic labels
    pub topics: Vec<String>,

    /// Free-form tags
    pub tags: Vec<String>,

    /// Lifecycle stage, if the source declared a known one
    pub funnel_stage: Option<FunnelStage>,

    /// Publication date; `None` when missing or unparseable
    pub release_date: Option<DateTime<Utc>>,

    /// Display-only revision number
    pub version: u32,

    /// What kind of asset this is
    pub content_type: ContentType,

    /// Asset location (PDF or video), the call-to-action target
    pub file_url: String,

    /// Optional thumbnail or video poster
    pub cover_url: Option<String>,

    /// Video length in seconds
    pub duration_sec: Option<u32>,

    /// Declared document read time in minutes
    pub read_time_min: Option<u32>,

    /// Document word count, used to estimate read time
    pub words: Option<u32>,
}

/// Raw item shape as it appears in external JSON, before normalization.
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawItem {
    id: Option<Value>,
    title: Option<String>,
    summary: Option<String>,
    industries: Option<Vec<String>>,
    personas: Option<Vec<String>>,
    topics: Option<Vec<String>>,
    tags: Option<Vec<String>>,
    funnel_stage: Option<String>,
    release_date: Option<String>,
    version: Option<u32>,
    content_type: Option<String>,
    file_url: Option<String>,
    cover_url: Option<String>,
    duration_sec: Option<u32>,
    read_time_min: Option<u32>,
    words: Option<u32>,
}

impl ContentItem {
    /// Create a minimal item; optional fields start empty
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content_type: ContentType,
        file_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: String::new(),
            industries: Vec::new(),
            personas: Vec::new(),
            topics: Vec::new(),
            tags: Vec::new(),
            funnel_stage: None,
            release_date: None,
            version: 1,
            content_type,
            file_url: file_url.into(),
            cover_url: None,
            duration_sec: None,
            read_time_min: None,
            words: None,
        }
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the industry labels
    pub fn with_industries(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.industries = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the persona labels
    pub fn with_personas(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.personas = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the topic labels
    pub fn with_topics(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.topics = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the funnel stage
    pub fn with_stage(mut self, stage: FunnelStage) -> Self {
        self.funnel_stage = Some(stage);
        self
    }

    /// Set the release date
    pub fn with_release_date(mut self, date: DateTime<Utc>) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Set the version number
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the video duration in seconds
    pub fn with_duration_sec(mut self, seconds: u32) -> Self {
        self.duration_sec = Some(seconds);
        self
    }

    /// Set the declared read time in minutes
    pub fn with_read_time(mut self, minutes: u32) -> Self {
        self.read_time_min = Some(minutes);
        self
    }

    /// Set the word count
    pub fn with_words(mut self, words: u32) -> Self {
        self.words = Some(words);
        self
    }

    /// Set the cover image URL
    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    /// Normalize one raw catalog entry.
    ///
    /// Fails (and the entry is skipped) when the entry is not an object
    /// or lacks the required `content_type`/`file_url`. Everything else
    /// degrades to a default instead of failing.
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let raw: RawItem =
            serde_json::from_value(value).map_err(|e| anyhow::anyhow!("not a catalog entry: {}", e))?;

        let file_url = match raw.file_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => anyhow::bail!("missing file_url"),
        };

        let content_type: ContentType = raw
            .content_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| anyhow::anyhow!("missing or unknown content_type"))?;

        let id = match raw.id {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => derived_id(&file_url),
        };

        Ok(Self {
            id,
            title: raw.title.unwrap_or_default(),
            summary: raw.summary.unwrap_or_default(),
            industries: dedup_labels(raw.industries.unwrap_or_default()),
            personas: dedup_labels(raw.personas.unwrap_or_default()),
            topics: dedup_labels(raw.topics.unwrap_or_default()),
            tags: dedup_labels(raw.tags.unwrap_or_default()),
            funnel_stage: raw.funnel_stage.and_then(|s| s.parse().ok()),
            release_date: raw.release_date.as_deref().and_then(parse_release_date),
            version: raw.version.unwrap_or(1),
            content_type,
            file_url,
            cover_url: raw.cover_url.filter(|u| !u.is_empty()),
            duration_sec: raw.duration_sec,
            read_time_min: raw.read_time_min,
            words: raw.words,
        })
    }

    /// Calendar year of the release date as a facet label
    pub fn release_year(&self) -> Option<String> {
        self.release_date.map(|d| d.year().to_string())
    }

    /// Read-time sort key in minutes.
    ///
    /// Videos use their duration, documents their declared read time or
    /// a word-count estimate. `None` when nothing is declared; the
    /// shortest/longest comparators treat that as zero.
    pub fn read_minutes(&self) -> Option<u32> {
        match self.content_type {
            ContentType::Video => self.duration_sec.map(|s| s / 60),
            _ => self
                .read_time_min
                .or_else(|| self.words.map(|w| w / READING_RATE_WPM)),
        }
    }

    /// Human-readable duration for cards.
    ///
    /// Videos format their runtime as `mm:ss`; documents (and videos
    /// without a declared duration) show an estimated read time, backed
    /// by a 1200-word assumption when the source declares nothing.
    pub fn display_duration(&self) -> String {
        if self.content_type == ContentType::Video {
            if let Some(secs) = self.duration_sec {
                return format_runtime(secs);
            }
        }

        let minutes = self
            .read_time_min
            .or_else(|| self.words.map(|w| w / READING_RATE_WPM))
            .unwrap_or(DEFAULT_WORDS / READING_RATE_WPM)
            .max(1);
        format!("{} min read", minutes)
    }

    /// Lowercased concatenation of every searchable field.
    ///
    /// Used by the relevance scorer; the filter stage matches fields
    /// individually instead.
    pub fn search_haystack(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.title, &self.summary];
        parts.extend(self.topics.iter().map(String::as_str));
        parts.extend(self.tags.iter().map(String::as_str));
        parts.extend(self.personas.iter().map(String::as_str));
        parts.extend(self.industries.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }
}

/// Extract the item array from a catalog body.
///
/// Accepts a bare array or an object with an `items` array; any other
/// successfully-parsed shape yields an empty catalog. Entries that fail
/// normalization are skipped with a debug log, never an error.
pub fn normalize_value(body: Value) -> Vec<ContentItem> {
    let entries = match body {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        match ContentItem::from_value(entry) {
            Ok(item) => items.push(item),
            Err(reason) => debug!("Skipping catalog entry: {}", reason),
        }
    }
    items
}

/// Stable identifier for items that arrive without one:
/// SHA256(file_url), first 8 bytes as hex
pub fn derived_id(file_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_url.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

/// Parse a release date: RFC 3339 first, then bare `YYYY-MM-DD`
/// (midnight UTC). Anything else is treated as undated.
pub fn parse_release_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Remove duplicate and empty labels, preserving first-occurrence order
fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    labels
        .into_iter()
        .filter(|l| !l.is_empty() && seen.insert(l.clone()))
        .collect()
}

/// Format a video runtime as `mm:ss` (or `h:mm:ss` past the hour)
fn format_runtime(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_type_from_str() {
        assert_eq!(
            "whitepaper".parse::<ContentType>().unwrap(),
            ContentType::Whitepaper
        );
        assert_eq!("Video".parse::<ContentType>().unwrap(), ContentType::Video);
        assert_eq!("slides".parse::<ContentType>().unwrap(), ContentType::Slide);
        assert_eq!(
            "infographic".parse::<ContentType>().unwrap(),
            ContentType::Infographic
        );
        assert!("podcast".parse::<ContentType>().is_err());
        assert!("".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_cta_labels() {
        assert_eq!(ContentType::Whitepaper.cta_label(), "Download whitepaper");
        assert_eq!(ContentType::Video.cta_label(), "Watch video");
    }

    #[test]
    fn test_funnel_stage_from_str() {
        assert_eq!(
            "Awareness".parse::<FunnelStage>().unwrap(),
            FunnelStage::Awareness
        );
        assert_eq!(
            "decision".parse::<FunnelStage>().unwrap(),
            FunnelStage::Decision
        );
        assert!("Churn".parse::<FunnelStage>().is_err());
    }

    #[test]
    fn test_from_value_full_item() {
        let item = ContentItem::from_value(json!({
            "id": "wp-1",
            "title": "Edge Caching Patterns",
            "summary": "A field guide.",
            "industries": ["Tech"],
            "personas": ["Architect"],
            "topics": ["Performance"],
            "tags": ["cdn", "caching"],
            "funnel_stage": "Consideration",
            "release_date": "2025-03-10",
            "version": 3,
            "content_type": "whitepaper",
            "file_url": "https://cdn.example.com/edge-caching.pdf",
            "read_time_min": 9
        }))
        .unwrap();

        assert_eq!(item.id, "wp-1");
        assert_eq!(item.title, "Edge Caching Patterns");
        assert_eq!(item.funnel_stage, Some(FunnelStage::Consideration));
        assert_eq!(item.release_year().as_deref(), Some("2025"));
        assert_eq!(item.version, 3);
        assert_eq!(item.read_minutes(), Some(9));
    }

    #[test]
    fn test_numeric_id_rendered_as_string() {
        let item = ContentItem::from_value(json!({
            "id": 42,
            "content_type": "video",
            "file_url": "https://cdn.example.com/v.mp4"
        }))
        .unwrap();

        assert_eq!(item.id, "42");
    }

    #[test]
    fn test_missing_id_derived_from_file_url() {
        let a = ContentItem::from_value(json!({
            "content_type": "video",
            "file_url": "https://cdn.example.com/v.mp4"
        }))
        .unwrap();
        let b = ContentItem::from_value(json!({
            "content_type": "video",
            "file_url": "https://cdn.example.com/v.mp4"
        }))
        .unwrap();

        // Stable across loads, 8 bytes = 16 hex chars
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.len(), 16);
        assert_eq!(a.id, derived_id("https://cdn.example.com/v.mp4"));
    }

    #[test]
    fn test_missing_arrays_default_empty() {
        let item = ContentItem::from_value(json!({
            "content_type": "slide",
            "file_url": "https://cdn.example.com/deck.pdf",
            "industries": null
        }))
        .unwrap();

        assert!(item.industries.is_empty());
        assert!(item.personas.is_empty());
        assert!(item.topics.is_empty());
        assert!(item.tags.is_empty());
    }

    #[test]
    fn test_duplicate_labels_removed_in_order() {
        let item = ContentItem::from_value(json!({
            "content_type": "whitepaper",
            "file_url": "https://cdn.example.com/a.pdf",
            "tags": ["b", "a", "b", "", "c", "a"]
        }))
        .unwrap();

        assert_eq!(item.tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_unknown_stage_tolerated() {
        let item = ContentItem::from_value(json!({
            "content_type": "whitepaper",
            "file_url": "https://cdn.example.com/a.pdf",
            "funnel_stage": "Expansion"
        }))
        .unwrap();

        assert_eq!(item.funnel_stage, None);
    }

    #[test]
    fn test_unparseable_date_tolerated() {
        let item = ContentItem::from_value(json!({
            "content_type": "whitepaper",
            "file_url": "https://cdn.example.com/a.pdf",
            "release_date": "next Tuesday"
        }))
        .unwrap();

        assert_eq!(item.release_date, None);
        assert_eq!(item.release_year(), None);
    }

    #[test]
    fn test_missing_type_or_url_rejected() {
        let no_type = ContentItem::from_value(json!({
            "file_url": "https://cdn.example.com/a.pdf"
        }));
        assert!(no_type.is_err());

        let no_url = ContentItem::from_value(json!({
            "content_type": "video"
        }));
        assert!(no_url.is_err());

        let blank_url = ContentItem::from_value(json!({
            "content_type": "video",
            "file_url": "   "
        }));
        assert!(blank_url.is_err());
    }

    #[test]
    fn test_normalize_value_shapes() {
        let entry = json!({
            "content_type": "whitepaper",
            "file_url": "https://cdn.example.com/a.pdf"
        });

        // Bare array
        let items = normalize_value(json!([entry.clone()]));
        assert_eq!(items.len(), 1);

        // Object with an items array
        let items = normalize_value(json!({ "items": [entry] }));
        assert_eq!(items.len(), 1);

        // Any other shape is an empty catalog, not an error
        assert!(normalize_value(json!({ "data": [] })).is_empty());
        assert!(normalize_value(json!("nope")).is_empty());
        assert!(normalize_value(json!(17)).is_empty());
    }

    #[test]
    fn test_normalize_value_skips_bad_entries() {
        let items = normalize_value(json!([
            { "content_type": "video", "file_url": "https://cdn.example.com/v.mp4" },
            { "content_type": "mixtape", "file_url": "https://cdn.example.com/m.mp3" },
            "not an object",
            { "content_type": "whitepaper", "file_url": "https://cdn.example.com/w.pdf" }
        ]));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].content_type, ContentType::Video);
        assert_eq!(items[1].content_type, ContentType::Whitepaper);
    }

    #[test]
    fn test_parse_release_date_formats() {
        assert!(parse_release_date("2025-10-15").is_some());
        assert!(parse_release_date("2025-10-15T08:30:00Z").is_some());
        assert!(parse_release_date("2025-10-15T08:30:00+02:00").is_some());
        assert!(parse_release_date("October 15th").is_none());
        assert!(parse_release_date("").is_none());

        let midnight = parse_release_date("2025-10-15").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2025-10-15T00:00:00+00:00");
    }

    #[test]
    fn test_read_minutes_chain() {
        let video = ContentItem::new("v", "V", ContentType::Video, "u").with_duration_sec(1274);
        assert_eq!(video.read_minutes(), Some(21));

        let declared = ContentItem::new("d", "D", ContentType::Whitepaper, "u").with_read_time(14);
        assert_eq!(declared.read_minutes(), Some(14));

        let estimated = ContentItem::new("e", "E", ContentType::Whitepaper, "u").with_words(1800);
        assert_eq!(estimated.read_minutes(), Some(9));

        let unknown = ContentItem::new("n", "N", ContentType::Whitepaper, "u");
        assert_eq!(unknown.read_minutes(), None);

        // Videos never fall back to document fields for the sort key
        let video = ContentItem::new("v2", "V", ContentType::Video, "u").with_words(4000);
        assert_eq!(video.read_minutes(), None);
    }

    #[test]
    fn test_display_duration() {
        let video = ContentItem::new("v", "V", ContentType::Video, "u").with_duration_sec(1274);
        assert_eq!(video.display_duration(), "21:14");

        let long = ContentItem::new("l", "L", ContentType::Video, "u").with_duration_sec(3725);
        assert_eq!(long.display_duration(), "1:02:05");

        let declared = ContentItem::new("d", "D", ContentType::Whitepaper, "u").with_read_time(14);
        assert_eq!(declared.display_duration(), "14 min read");

        let estimated = ContentItem::new("e", "E", ContentType::Whitepaper, "u").with_words(1800);
        assert_eq!(estimated.display_duration(), "9 min read");

        // Nothing declared: 1200 words at 200 wpm
        let unknown = ContentItem::new("n", "N", ContentType::Whitepaper, "u");
        assert_eq!(unknown.display_duration(), "6 min read");

        // Tiny documents still display a minute
        let tiny = ContentItem::new("t", "T", ContentType::Whitepaper, "u").with_words(150);
        assert_eq!(tiny.display_duration(), "1 min read");
    }

    #[test]
    fn test_search_haystack() {
        let item = ContentItem::new("i", "Edge Caching", ContentType::Whitepaper, "u")
            .with_summary("A Field Guide")
            .with_topics(["Performance"])
            .with_tags(["CDN"])
            .with_personas(["Architect"])
            .with_industries(["Tech"]);

        let hay = item.search_haystack();
        assert!(hay.contains("edge caching"));
        assert!(hay.contains("a field guide"));
        assert!(hay.contains("performance"));
        assert!(hay.contains("cdn"));
        assert!(hay.contains("architect"));
        assert!(hay.contains("tech"));
        assert_eq!(hay, hay.to_lowercase());
    }
}
