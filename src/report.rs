//! Run reporter.
//!
//! Emits one progress line per entry as it completes, the batch summary
//! line, and the missing-attachment report file a follow-up tool can use
//! to recover media the export left out.

use crate::models::{EntryRecord, ImportOutcome, RunSummary};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// A reference that did not resolve to a file, with the record it came from.
#[derive(Debug, Clone, Serialize)]
pub struct MissingAttachment {
    /// Record file of the affected entry.
    pub source_path: String,
    /// The unresolved attachment reference.
    pub reference: String,
}

/// Accumulates per-entry records in processing order and emits the
/// human-readable progress log.
#[derive(Debug, Default)]
pub struct RunReporter {
    records: Vec<EntryRecord>,
    total: usize,
}

impl RunReporter {
    /// Creates a reporter expecting `total` entries.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            records: Vec::new(),
            total,
        }
    }

    /// Records one completed entry and emits its progress line.
    ///
    /// Lines carry an ordinal prefix (`[n/total]`) in processing order so
    /// logs are reproducible across runs.
    pub fn observe(&mut self, record: EntryRecord) {
        self.records.push(record);
        let index = self.records.len();
        let record = &self.records[index - 1];
        let prefix = format!("[{index}/{}]", self.total);

        for reference in &record.missing_attachments {
            tracing::warn!(
                "{prefix} entry {} is missing attachment {reference}",
                record.source_id
            );
        }

        match &record.outcome {
            ImportOutcome::Succeeded { target_id } => {
                let target = target_id.as_deref().unwrap_or("(dry run)");
                let detail = record.detail();
                if detail.is_empty() {
                    tracing::info!("{prefix} entry added {} -> {target}", record.source_id);
                } else {
                    tracing::info!(
                        "{prefix} entry added {} -> {target}: {detail}",
                        record.source_id
                    );
                }
            },
            ImportOutcome::Failed { reason } => {
                tracing::error!("{prefix} entry {} failed: {reason}", record.source_id);
            },
            ImportOutcome::Skipped { reason } => {
                tracing::warn!("{prefix} entry {} skipped: {reason}", record.source_id);
            },
        }
    }

    /// Returns the records observed so far, in processing order.
    #[must_use]
    pub fn records(&self) -> &[EntryRecord] {
        &self.records
    }

    /// All unresolved references across the batch, in processing order.
    #[must_use]
    pub fn missing_attachments(&self) -> Vec<MissingAttachment> {
        self.records
            .iter()
            .flat_map(|record| {
                record.missing_attachments.iter().map(|reference| {
                    MissingAttachment {
                        source_path: record.source_path.display().to_string(),
                        reference: reference.clone(),
                    }
                })
            })
            .collect()
    }

    /// Emits the end-of-run path lists and the summary line, and returns
    /// the derived summary.
    #[must_use]
    pub fn finish(&self) -> RunSummary {
        for record in &self.records {
            match &record.outcome {
                ImportOutcome::Skipped { .. } => {
                    tracing::info!("SKIPPED: {}", record.source_path.display());
                },
                ImportOutcome::Failed { .. } => {
                    tracing::info!("FAILED: {}", record.source_path.display());
                },
                ImportOutcome::Succeeded { .. } => {},
            }
        }

        let summary = RunSummary::from_records(&self.records);
        tracing::info!("{summary}");
        summary
    }

    /// Writes the missing-attachment references as a JSON report.
    ///
    /// Nothing is written when every reference resolved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the file cannot be written.
    pub fn write_missing_report(&self, path: &Path) -> Result<()> {
        let missing = self.missing_attachments();
        if missing.is_empty() {
            return Ok(());
        }

        let body = serde_json::to_string_pretty(&missing).map_err(|e| Error::OperationFailed {
            operation: "serialize_report".to_string(),
            cause: e.to_string(),
        })?;
        std::fs::write(path, body).map_err(|e| Error::OperationFailed {
            operation: "write_report".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        tracing::warn!(
            "export was missing {} attachments; report written to {}",
            missing.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryId, SkipReason};
    use std::path::PathBuf;

    fn record(id: &str, outcome: ImportOutcome, missing: Vec<String>) -> EntryRecord {
        EntryRecord {
            source_id: EntryId::from(id),
            source_path: PathBuf::from(format!("{id}.json")),
            outcome,
            word_count: 3,
            tag_count: 0,
            attachment_count: 0,
            missing_attachments: missing,
        }
    }

    #[test]
    fn test_summary_matches_observed_records() {
        let mut reporter = RunReporter::new(3);
        reporter.observe(record(
            "a",
            ImportOutcome::Succeeded {
                target_id: Some("A1".to_string()),
            },
            Vec::new(),
        ));
        reporter.observe(record(
            "b",
            ImportOutcome::Failed {
                reason: "boom".to_string(),
            },
            Vec::new(),
        ));
        reporter.observe(record(
            "c",
            ImportOutcome::Skipped {
                reason: SkipReason::NoContent,
            },
            Vec::new(),
        ));

        let summary = reporter.finish();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), reporter.records().len());
    }

    #[test]
    fn test_missing_attachments_collected_in_order() {
        let mut reporter = RunReporter::new(2);
        reporter.observe(record(
            "a",
            ImportOutcome::Succeeded {
                target_id: Some("A1".to_string()),
            },
            vec!["photos/1.jpg".to_string(), "photos/2.jpg".to_string()],
        ));
        reporter.observe(record(
            "b",
            ImportOutcome::Succeeded {
                target_id: Some("B1".to_string()),
            },
            vec!["photos/3.mp4".to_string()],
        ));

        let missing = reporter.missing_attachments();
        let references: Vec<&str> = missing.iter().map(|m| m.reference.as_str()).collect();
        assert_eq!(references, vec!["photos/1.jpg", "photos/2.jpg", "photos/3.mp4"]);
        assert_eq!(missing[0].source_path, "a.json");
    }

    #[test]
    fn test_report_file_written_only_when_needed() {
        let dir = tempfile::tempdir().unwrap();
        let clean = dir.path().join("clean.json");
        let reporter = RunReporter::new(0);
        reporter.write_missing_report(&clean).unwrap();
        assert!(!clean.exists());

        let mut reporter = RunReporter::new(1);
        reporter.observe(record(
            "a",
            ImportOutcome::Succeeded {
                target_id: Some("A1".to_string()),
            },
            vec!["photos/1.jpg".to_string()],
        ));
        let path = dir.path().join("missing.json");
        reporter.write_missing_report(&path).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["reference"], "photos/1.jpg");
    }
}
