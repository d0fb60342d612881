//! Journal entry types and identifiers.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use super::attachment::Attachment;
use super::outcome::SkipReason;

/// Marker left in entry text by a previous Day One export. Entries carrying
/// it would duplicate content that already lives in the destination.
pub(crate) const DAYONE_MOMENT_MARKER: &str = "dayone-moment:";

/// Unique identifier for a journal entry, as assigned by the source export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A geographic coordinate pair, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinates {
    /// Sentinel value the Journey export writes when an entry has no
    /// location. Both components are set to this value.
    pub const SENTINEL: f64 = f64::MAX;

    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns whether either component is the "no location" sentinel.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.latitude == Self::SENTINEL || self.longitude == Self::SENTINEL
    }

    /// Returns whether the pair is a plausible point on Earth.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
            && !self.is_sentinel()
    }
}

/// One journal record as read from the export, immutable once constructed.
///
/// Optional fields default to absent rather than failing deserialization,
/// so minor schema variation across export versions is tolerated. Unknown
/// fields (e.g. `address`, `weather`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    /// Unique identifier assigned by the exporting application.
    pub id: EntryId,
    /// Free-form entry body; may be plain text or HTML.
    #[serde(default)]
    pub text: String,
    /// Creation instant, in milliseconds since the Unix epoch.
    #[serde(default)]
    pub date_journal: Option<i64>,
    /// IANA timezone name the entry was written in (e.g. `Europe/Berlin`).
    #[serde(default)]
    pub timezone: Option<String>,
    /// Latitude in degrees; [`Coordinates::SENTINEL`] means no location.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in degrees; [`Coordinates::SENTINEL`] means no location.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Tags, in export order, possibly with duplicates.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Attachment references, relative to the export root. Despite the
    /// name, the list covers photos, videos, and audio recordings.
    #[serde(default)]
    pub photos: Vec<String>,
    /// Path of the record file this entry was read from. Attached by the
    /// export reader, not part of the record itself.
    #[serde(skip)]
    pub source_path: PathBuf,
}

/// An entry in the mapped form ready for import, consumed exactly once by
/// the import invoker.
#[derive(Debug, Clone)]
pub struct NormalizedEntry {
    /// Source identifier, carried through for the id mapping log line.
    pub id: EntryId,
    /// Record file the entry came from.
    pub source_path: PathBuf,
    /// Re-encoded entry body: plain text, LF line endings, no stray
    /// control characters.
    pub text: String,
    /// Creation timestamp with the originating zone's offset preserved.
    /// Absent when the export carried no usable instant; the destination
    /// then assigns the time of import.
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// IANA zone name, when the export carried a recognizable one.
    pub zone: Option<String>,
    /// Location, absent when the export had none or the pair was invalid.
    pub coordinates: Option<Coordinates>,
    /// Deduplicated tags in first-occurrence order, escaped for `dayone2`.
    pub tags: Vec<String>,
    /// Attachments, resolved or marked missing.
    pub attachments: Vec<Attachment>,
}

impl NormalizedEntry {
    /// Word count of the entry body, for the progress log line.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Attachment paths that resolved to files on disk.
    #[must_use]
    pub fn resolved_paths(&self) -> Vec<PathBuf> {
        self.attachments
            .iter()
            .filter_map(|a| a.resolved.clone())
            .collect()
    }

    /// References that did not resolve to any file.
    #[must_use]
    pub fn missing_references(&self) -> Vec<String> {
        self.attachments
            .iter()
            .filter(|a| a.is_missing())
            .map(|a| a.reference.clone())
            .collect()
    }

    /// Classifies whether the entry should be skipped instead of imported.
    ///
    /// Returns `None` when the entry has importable content.
    #[must_use]
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if self.text.contains(DAYONE_MOMENT_MARKER) {
            return Some(SkipReason::AlreadyExported);
        }
        if self.text.is_empty() && self.resolved_paths().is_empty() {
            return Some(SkipReason::NoContent);
        }
        None
    }
}
