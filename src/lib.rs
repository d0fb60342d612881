//! # j2d
//!
//! Imports a Journey journal export into Day One.
//!
//! j2d reads the per-entry JSON records and media files of an extracted
//! Journey export, normalizes each entry (text, timezone-aware timestamp,
//! coordinates, tags, attachments), and creates the entry in Day One by
//! invoking the locally installed `dayone2` command-line tool once per
//! entry. It is a one-shot, operator-run batch converter: entries are
//! processed strictly in order, per-entry failures never abort the run,
//! and a final summary reports how many entries succeeded, failed, and
//! were skipped.
//!
//! ## Example
//!
//! ```rust,ignore
//! use j2d::{DayOneImporter, ImportOptions, ImportService};
//!
//! let importer = DayOneImporter::new("Journal");
//! let service = ImportService::new(importer, ImportOptions::default());
//! let report = service.run(export_dir)?;
//! println!("{}", report.summary);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod attachments;
pub mod config;
pub mod dayone;
pub mod export;
pub mod mapper;
pub mod models;
pub mod observability;
pub mod report;
pub mod services;

// Re-exports for convenience
pub use attachments::AttachmentResolver;
pub use config::J2dConfig;
pub use dayone::{DayOneImporter, JournalImporter};
pub use export::ExportReader;
pub use models::{
    Attachment, AttachmentKind, Coordinates, EntryId, EntryRecord, ImportOutcome, NormalizedEntry,
    RunSummary, SkipReason, SourceEntry,
};
pub use services::{ImportOptions, ImportService, RunReport};

/// Error type for j2d operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `MalformedExport` | Export root missing, no entry records found, unreadable record JSON |
/// | `InvalidInput` | Bad CLI arguments, malformed config values |
/// | `OperationFailed` | I/O errors, config file errors, report file write failures |
///
/// Only `MalformedExport` aborts a run before any entries are processed;
/// every per-entry condition (missing attachment, invalid coordinates,
/// failed `dayone2` invocation) is classified, logged, and the run
/// continues with the next entry.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The export directory does not match the expected Journey structure.
    ///
    /// Raised when:
    /// - The export root does not exist or is not a directory
    /// - No entry record files are found under the root
    /// - A record file cannot be parsed as a Journey entry
    #[error("malformed export: {0}")]
    MalformedExport(String),

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - CLI arguments fail validation
    /// - A config value cannot be interpreted
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur
    /// - The config file cannot be read or parsed
    /// - The missing-attachment report cannot be written
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for j2d operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedExport("no entry records found".to_string());
        assert_eq!(err.to_string(), "malformed export: no entry records found");

        let err = Error::InvalidInput("bad journal name".to_string());
        assert_eq!(err.to_string(), "invalid input: bad journal name");

        let err = Error::OperationFailed {
            operation: "write_report".to_string(),
            cause: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operation 'write_report' failed: permission denied"
        );
    }
}
