//! Entry mapper.
//!
//! Pure transformation of a [`SourceEntry`] into the normalized fields the
//! import invoker consumes: re-encoded text, a timezone-aware timestamp,
//! validated coordinates, and deduplicated tags. No side effects; warnings
//! are returned alongside the mapped fields and logged by the pipeline.

use crate::models::{Coordinates, SourceEntry};
use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

/// Compiles a pattern known to be valid at compile time.
#[allow(clippy::unwrap_used)] // all patterns are literals covered by tests
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| compile(r"\s+"));
static HTML_MARKER: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)</?(?:p|div|br|span|b|i|u|em|strong|ul|ol|li|a|img|h[1-6])\b"));
static BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| compile(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6])>"));
static IMAGE_TAG: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']*)["'][^>]*>"#));
static ANCHOR_TAG: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| compile(r"<[^>]+>"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| compile(r"\n{3,}"));

/// Output of mapping one source entry. Attachments are resolved separately
/// and joined by the pipeline.
#[derive(Debug, Clone)]
pub struct Mapped {
    /// Normalized entry body.
    pub text: String,
    /// Creation timestamp in the originating zone, when usable.
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// IANA zone name, when the export carried a valid one.
    pub zone: Option<String>,
    /// Validated location, absent for the sentinel or invalid pairs.
    pub coordinates: Option<Coordinates>,
    /// Deduplicated, escaped tags in first-occurrence order.
    pub tags: Vec<String>,
    /// Diagnostics to attach to the entry's log output.
    pub warnings: Vec<String>,
}

/// Maps a source entry to its normalized form.
///
/// Deterministic and idempotent: the same record always maps to the same
/// output, and normalizing already-normalized text is a no-op.
#[must_use]
pub fn normalize(entry: &SourceEntry) -> Mapped {
    let mut warnings = Vec::new();

    let text = normalize_text(&entry.text);
    let zone = resolve_zone(entry, &mut warnings);
    let timestamp = resolve_timestamp(entry, zone, &mut warnings);
    let coordinates = resolve_coordinates(entry, &mut warnings);
    let tags = dedup_tags(&entry.tags);

    Mapped {
        text,
        timestamp,
        zone: zone.map(|tz| tz.name().to_string()),
        coordinates,
        tags,
        warnings,
    }
}

/// Re-encodes the entry body as Markdown-flavored plain text.
///
/// Journey stores rich entries as HTML fragments; those are flattened to
/// text with entities decoded. Image sources and link targets are kept as
/// Markdown (`![](url)`, `[text](url)`) since the destination renders
/// Markdown, and because markers like `dayone-moment:` live inside those
/// URLs. Line endings are unified to LF and C0 control characters other
/// than newline and tab are dropped.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let flat = if HTML_MARKER.is_match(&unified) {
        let with_breaks = BLOCK_BREAK.replace_all(&unified, "\n");
        let with_images = IMAGE_TAG.replace_all(&with_breaks, "![](${1})");
        let with_links = ANCHOR_TAG.replace_all(&with_images, "[${2}](${1})");
        let stripped = ANY_TAG.replace_all(&with_links, "");
        html_escape::decode_html_entities(stripped.as_ref()).into_owned()
    } else {
        unified
    };

    let cleaned: String = flat
        .chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .collect();

    BLANK_LINES.replace_all(cleaned.trim(), "\n\n").into_owned()
}

/// Deduplicates tags preserving first-occurrence order and escapes
/// embedded whitespace for the `dayone2` tag flag.
#[must_use]
pub fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.iter()
        .filter(|tag| !tag.is_empty() && seen.insert(tag.as_str()))
        .map(|tag| escape_tag(tag))
        .collect()
}

/// Escapes whitespace runs in a tag with a backslash so `dayone2` treats
/// the tag as a single argument value.
#[must_use]
pub fn escape_tag(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw, r"\$0").into_owned()
}

/// Resolves the export's IANA zone name, warning when it is unrecognized.
fn resolve_zone(entry: &SourceEntry, warnings: &mut Vec<String>) -> Option<Tz> {
    let name = entry.timezone.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            warnings.push(format!("timezone is invalid: {name}"));
            None
        },
    }
}

/// Converts the epoch-millisecond instant into the originating zone,
/// keeping that zone's fixed offset. Falls back to the machine-local zone
/// when the export's zone was absent or invalid.
fn resolve_timestamp(
    entry: &SourceEntry,
    zone: Option<Tz>,
    warnings: &mut Vec<String>,
) -> Option<DateTime<FixedOffset>> {
    let millis = entry.date_journal?;
    let Some(utc) = Utc.timestamp_millis_opt(millis).single() else {
        warnings.push(format!("timestamp is invalid: {millis}"));
        return None;
    };
    Some(zone.map_or_else(
        || utc.with_timezone(&Local).fixed_offset(),
        |tz| utc.with_timezone(&tz).fixed_offset(),
    ))
}

/// Validates the coordinate pair, dropping the sentinel "no location"
/// value and anything outside latitude/longitude range.
fn resolve_coordinates(entry: &SourceEntry, warnings: &mut Vec<String>) -> Option<Coordinates> {
    let (lat, lon) = (entry.lat?, entry.lon?);
    let pair = Coordinates::new(lat, lon);
    if pair.is_valid() {
        return Some(pair);
    }
    if pair.is_sentinel() {
        warnings.push("no location information".to_string());
    } else {
        warnings.push(format!("coordinates are invalid: {lat} {lon}"));
    }
    None
}
