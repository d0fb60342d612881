//! Per-entry outcomes and the run-level summary.

use std::fmt;
use std::path::PathBuf;

use super::entry::EntryId;

/// Why an entry was skipped instead of submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No text and no resolved attachments; nothing meaningful to import.
    NoContent,
    /// The entry carries a Day One export marker and would duplicate
    /// content that already exists in the destination.
    AlreadyExported,
}

impl SkipReason {
    /// Returns the string representation used in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoContent => "no text and no attachments",
            Self::AlreadyExported => "previously exported from Day One",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The external tool created the entry. The target identifier is
    /// absent under dry run, where nothing is invoked.
    Succeeded {
        /// Identifier assigned by the destination application.
        target_id: Option<String>,
    },
    /// The external tool exited with failure or its output could not be
    /// parsed for a target identifier.
    Failed {
        /// Raw diagnostic output or failure description.
        reason: String,
    },
    /// The entry had no importable content; the tool was never invoked.
    Skipped {
        /// Why the entry was skipped.
        reason: SkipReason,
    },
}

/// Record of one processed entry, appended in processing order.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    /// Source identifier of the entry.
    pub source_id: EntryId,
    /// Record file the entry was read from.
    pub source_path: PathBuf,
    /// Classified outcome.
    pub outcome: ImportOutcome,
    /// Word count of the normalized text.
    pub word_count: usize,
    /// Number of tags after deduplication.
    pub tag_count: usize,
    /// Number of attachments that resolved to files.
    pub attachment_count: usize,
    /// Attachment references that did not resolve.
    pub missing_attachments: Vec<String>,
}

impl EntryRecord {
    /// Formats the word/tag/attachment counts for the progress line.
    ///
    /// Zero counts are omitted, e.g. `"42 words, 2 attachments"`.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut parts = Vec::new();
        if self.word_count > 0 {
            parts.push(format!("{} words", self.word_count));
        }
        if self.tag_count > 0 {
            parts.push(format!("{} tags", self.tag_count));
        }
        if self.attachment_count > 0 {
            parts.push(format!("{} attachments", self.attachment_count));
        }
        parts.join(", ")
    }
}

/// Counts of per-entry outcomes across the batch.
///
/// Derived once from the ordered record sequence, never mutated
/// independently of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries the external tool created.
    pub succeeded: usize,
    /// Entries whose invocation failed.
    pub failed: usize,
    /// Entries with nothing to import.
    pub skipped: usize,
}

impl RunSummary {
    /// Folds the record sequence into outcome counts.
    #[must_use]
    pub fn from_records(records: &[EntryRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, record| {
            match record.outcome {
                ImportOutcome::Succeeded { .. } => acc.succeeded += 1,
                ImportOutcome::Failed { .. } => acc.failed += 1,
                ImportOutcome::Skipped { .. } => acc.skipped += 1,
            }
            acc
        })
    }

    /// Total number of entries observed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    /// Returns whether any entry failed.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} skipped",
            self.succeeded, self.failed, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: ImportOutcome) -> EntryRecord {
        EntryRecord {
            source_id: EntryId::from("abc"),
            source_path: PathBuf::from("abc.json"),
            outcome,
            word_count: 0,
            tag_count: 0,
            attachment_count: 0,
            missing_attachments: Vec::new(),
        }
    }

    #[test]
    fn test_summary_fold() {
        let records = vec![
            record(ImportOutcome::Succeeded {
                target_id: Some("A1".to_string()),
            }),
            record(ImportOutcome::Failed {
                reason: "boom".to_string(),
            }),
            record(ImportOutcome::Skipped {
                reason: SkipReason::NoContent,
            }),
            record(ImportOutcome::Succeeded { target_id: None }),
        ];

        let summary = RunSummary::from_records(&records);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), records.len());
        assert!(summary.has_failures());
    }

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            succeeded: 2,
            failed: 0,
            skipped: 1,
        };
        assert_eq!(summary.to_string(), "2 succeeded, 0 failed, 1 skipped");
    }

    #[test]
    fn test_record_detail_omits_zero_counts() {
        let mut r = record(ImportOutcome::Succeeded { target_id: None });
        r.word_count = 42;
        r.attachment_count = 2;
        assert_eq!(r.detail(), "42 words, 2 attachments");

        let empty = record(ImportOutcome::Skipped {
            reason: SkipReason::NoContent,
        });
        assert_eq!(empty.detail(), "");
    }
}
