//! Export reader.
//!
//! Locates and parses the per-entry JSON records of an extracted Journey
//! export. Media files live alongside the records and are handled by the
//! attachment resolver, not here.

use crate::models::SourceEntry;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads entry records from an extracted export directory.
pub struct ExportReader {
    root: PathBuf,
}

impl ExportReader {
    /// Creates a reader for the given export root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reads all entry records, ordered by record file path.
    ///
    /// The path ordering is stable across runs, which keeps the progress
    /// log reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedExport`] if the root is missing, contains
    /// no entry records, or a record cannot be parsed.
    pub fn read_entries(&self) -> Result<Vec<SourceEntry>> {
        if !self.root.is_dir() {
            return Err(Error::MalformedExport(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        let files = self.record_files()?;
        if files.is_empty() {
            return Err(Error::MalformedExport(format!(
                "no entry records found under {}",
                self.root.display()
            )));
        }

        tracing::debug!(count = files.len(), root = %self.root.display(), "found entry records");

        files.iter().map(|path| Self::read_record(path)).collect()
    }

    /// Collects the record file paths under the root, sorted.
    fn record_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| Error::OperationFailed {
                operation: "walk_export".to_string(),
                cause: e.to_string(),
            })?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "json")
            {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parses one record file into a [`SourceEntry`].
    fn read_record(path: &Path) -> Result<SourceEntry> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::MalformedExport(format!("cannot read record {}: {e}", path.display()))
        })?;

        let mut entry: SourceEntry = serde_json::from_str(&contents).map_err(|e| {
            Error::MalformedExport(format!("cannot parse record {}: {e}", path.display()))
        })?;
        entry.source_path = path.to_path_buf();
        Ok(entry)
    }
}
