//! Batch import service.
//!
//! Drives the linear pipeline over one export directory: read records,
//! normalize each entry, resolve its attachments, submit it to the
//! destination, and report outcomes. Strictly sequential — each external
//! invocation completes before the next entry starts, and the ordinal
//! progress log follows export order.

use crate::attachments::AttachmentResolver;
use crate::dayone::JournalImporter;
use crate::export::ExportReader;
use crate::mapper;
use crate::models::{EntryRecord, ImportOutcome, NormalizedEntry, RunSummary, SourceEntry};
use crate::report::{MissingAttachment, RunReporter};
use crate::Result;
use std::path::{Path, PathBuf};

/// Options for a batch import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Validate and report without invoking the external tool.
    pub dry_run: bool,
    /// Where to write the missing-attachment report, if anywhere.
    pub missing_report: Option<PathBuf>,
}

impl ImportOptions {
    /// Enables or disables dry run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the missing-attachment report path.
    #[must_use]
    pub fn with_missing_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing_report = Some(path.into());
        self
    }
}

/// Result of a batch import run.
#[derive(Debug)]
pub struct RunReport {
    /// Per-entry records in processing order.
    pub records: Vec<EntryRecord>,
    /// Outcome counts derived from the records.
    pub summary: RunSummary,
    /// Unresolved attachment references across the batch.
    pub missing_attachments: Vec<MissingAttachment>,
}

/// Service that imports one export directory into the destination journal.
pub struct ImportService<I> {
    importer: I,
    options: ImportOptions,
}

impl<I: JournalImporter> ImportService<I> {
    /// Creates an import service.
    #[must_use]
    pub const fn new(importer: I, options: ImportOptions) -> Self {
        Self { importer, options }
    }

    /// Runs the batch over the given export root.
    ///
    /// Every entry is attempted exactly once; per-entry failures are
    /// classified and logged without blocking the remaining entries.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedExport`] before any entry is
    /// processed if the export structure is unusable, and
    /// [`crate::Error::OperationFailed`] if the missing-attachment report
    /// cannot be written.
    pub fn run(&self, export_root: &Path) -> Result<RunReport> {
        let reader = ExportReader::new(export_root);
        let resolver = AttachmentResolver::new(export_root);
        let entries = reader.read_entries()?;

        tracing::info!(
            total = entries.len(),
            root = %export_root.display(),
            dry_run = self.options.dry_run,
            "starting import"
        );

        let mut reporter = RunReporter::new(entries.len());
        for entry in entries {
            let record = self.process(&entry, &resolver);
            reporter.observe(record);
        }

        let summary = reporter.finish();
        if let Some(ref path) = self.options.missing_report {
            reporter.write_missing_report(path)?;
        }

        Ok(RunReport {
            missing_attachments: reporter.missing_attachments(),
            records: reporter.records().to_vec(),
            summary,
        })
    }

    /// Normalizes one entry and performs (or skips) its submission.
    fn process(&self, source: &SourceEntry, resolver: &AttachmentResolver) -> EntryRecord {
        let mapped = mapper::normalize(source);
        for warning in &mapped.warnings {
            tracing::warn!("entry {}: {warning}", source.id);
        }

        let entry = NormalizedEntry {
            id: source.id.clone(),
            source_path: source.source_path.clone(),
            text: mapped.text,
            timestamp: mapped.timestamp,
            zone: mapped.zone,
            coordinates: mapped.coordinates,
            tags: mapped.tags,
            attachments: resolver.resolve(&source.photos),
        };

        let outcome = entry.skip_reason().map_or_else(
            || self.submit(&entry),
            |reason| ImportOutcome::Skipped { reason },
        );

        EntryRecord {
            source_id: entry.id.clone(),
            source_path: entry.source_path.clone(),
            word_count: entry.word_count(),
            tag_count: entry.tags.len(),
            attachment_count: entry.resolved_paths().len(),
            missing_attachments: entry.missing_references(),
            outcome,
        }
    }

    /// Submits one importable entry, honoring dry run mode.
    fn submit(&self, entry: &NormalizedEntry) -> ImportOutcome {
        if self.options.dry_run {
            return ImportOutcome::Succeeded { target_id: None };
        }
        match self.importer.submit(entry) {
            Ok(outcome) => outcome,
            Err(e) => ImportOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::fs;
    use std::sync::Mutex;

    /// Importer fake that records what it was asked to create.
    struct FakeImporter {
        submitted: Mutex<Vec<NormalizedEntry>>,
        fail_ids: Vec<String>,
    }

    impl FakeImporter {
        fn new() -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                fail_ids: Vec::new(),
            }
        }

        fn failing_on(id: &str) -> Self {
            Self {
                submitted: Mutex::new(Vec::new()),
                fail_ids: vec![id.to_string()],
            }
        }

        fn submitted_ids(&self) -> Vec<String> {
            self.submitted
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.id.as_str().to_string())
                .collect()
        }
    }

    impl JournalImporter for FakeImporter {
        fn submit(&self, entry: &NormalizedEntry) -> Result<ImportOutcome> {
            self.submitted.lock().unwrap().push(entry.clone());
            if self.fail_ids.iter().any(|id| id == entry.id.as_str()) {
                return Ok(ImportOutcome::Failed {
                    reason: "simulated failure".to_string(),
                });
            }
            Ok(ImportOutcome::Succeeded {
                target_id: Some(format!("T-{}", entry.id)),
            })
        }
    }

    fn write_record(root: &Path, name: &str, body: &str) {
        fs::write(root.join(name), body).unwrap();
    }

    #[test]
    fn test_three_entry_scenario() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("photos")).unwrap();
        fs::write(dir.path().join("photos/a.jpg"), [0u8]).unwrap();
        fs::write(dir.path().join("photos/b.jpg"), [0u8]).unwrap();

        write_record(
            dir.path(),
            "1.json",
            r#"{"id": "one", "text": "text only entry"}"#,
        );
        write_record(
            dir.path(),
            "2.json",
            r#"{"id": "two", "text": "with media", "photos": ["photos/a.jpg", "photos/b.jpg"]}"#,
        );
        write_record(dir.path(), "3.json", r#"{"id": "three", "text": ""}"#);

        let importer = FakeImporter::new();
        let service = ImportService::new(importer, ImportOptions::default());
        let report = service.run(dir.path()).unwrap();

        assert_eq!(report.summary.succeeded, 2);
        assert_eq!(report.summary.failed, 0);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.total(), 3);

        assert!(matches!(
            report.records[0].outcome,
            ImportOutcome::Succeeded { .. }
        ));
        assert_eq!(report.records[1].attachment_count, 2);
        assert!(matches!(
            report.records[2].outcome,
            ImportOutcome::Skipped { .. }
        ));

        // The skipped entry never reached the importer.
        assert_eq!(service.importer.submitted_ids(), vec!["one", "two"]);
    }

    #[test]
    fn test_missing_attachment_entry_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        write_record(
            dir.path(),
            "1.json",
            r#"{"id": "one", "text": "hello", "photos": ["photos/gone.jpg"]}"#,
        );

        let service = ImportService::new(FakeImporter::new(), ImportOptions::default());
        let report = service.run(dir.path()).unwrap();

        assert_eq!(report.summary.succeeded, 1);
        let record = &report.records[0];
        assert_eq!(record.attachment_count, 0);
        assert_eq!(record.missing_attachments, vec!["photos/gone.jpg"]);
        assert_eq!(report.missing_attachments.len(), 1);
    }

    #[test]
    fn test_failure_does_not_block_later_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "1.json", r#"{"id": "one", "text": "a"}"#);
        write_record(dir.path(), "2.json", r#"{"id": "two", "text": "b"}"#);

        let service = ImportService::new(FakeImporter::failing_on("one"), ImportOptions::default());
        let report = service.run(dir.path()).unwrap();

        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.succeeded, 1);
        assert_eq!(service.importer.submitted_ids(), vec!["one", "two"]);
    }

    #[test]
    fn test_dry_run_never_invokes_importer() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "1.json", r#"{"id": "one", "text": "a"}"#);

        let options = ImportOptions::default().with_dry_run(true);
        let service = ImportService::new(FakeImporter::new(), options);
        let report = service.run(dir.path()).unwrap();

        assert_eq!(report.summary.succeeded, 1);
        assert!(service.importer.submitted_ids().is_empty());
        assert!(matches!(
            report.records[0].outcome,
            ImportOutcome::Succeeded { target_id: None }
        ));
    }

    #[test]
    fn test_malformed_export_aborts_before_processing() {
        let service = ImportService::new(FakeImporter::new(), ImportOptions::default());
        let err = service.run(Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, Error::MalformedExport(_)));
        assert!(service.importer.submitted_ids().is_empty());
    }

    #[test]
    fn test_missing_report_written_after_run() {
        let dir = tempfile::tempdir().unwrap();
        write_record(
            dir.path(),
            "1.json",
            r#"{"id": "one", "text": "hello", "photos": ["photos/gone.jpg"]}"#,
        );
        let report_path = dir.path().join("missing.json");

        let options = ImportOptions::default().with_missing_report(&report_path);
        let service = ImportService::new(FakeImporter::new(), options);
        service.run(dir.path()).unwrap();

        assert!(report_path.exists());
    }
}
