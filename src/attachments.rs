//! Attachment resolver.
//!
//! Maps each attachment reference of an entry to a file under the export
//! root. Missing files never abort the entry; they are marked and reported
//! so the operator can recover them later.

use crate::models::{Attachment, AttachmentKind};
use std::path::{Path, PathBuf};

/// Resolves attachment references against the export's media files.
pub struct AttachmentResolver {
    export_root: PathBuf,
}

impl AttachmentResolver {
    /// Creates a resolver rooted at the export directory.
    #[must_use]
    pub fn new(export_root: impl Into<PathBuf>) -> Self {
        Self {
            export_root: export_root.into(),
        }
    }

    /// Resolves every reference of an entry, in order.
    ///
    /// References that do not name a regular file under the export root
    /// are returned with `resolved: None`.
    #[must_use]
    pub fn resolve(&self, references: &[String]) -> Vec<Attachment> {
        references
            .iter()
            .map(|reference| self.resolve_one(reference))
            .collect()
    }

    /// Resolves a single reference.
    fn resolve_one(&self, reference: &str) -> Attachment {
        let kind = AttachmentKind::from_reference(reference);
        let candidate = self.export_root.join(reference);
        let resolved = candidate
            .is_file()
            .then(|| absolute(&candidate))
            .flatten();

        // The reporter warns per entry with the ordinal prefix; this only
        // traces which path was checked.
        if resolved.is_none() {
            tracing::debug!(
                kind = kind.as_str(),
                reference,
                "no file at {}",
                candidate.display()
            );
        }

        Attachment {
            reference: reference.to_string(),
            kind,
            resolved,
        }
    }
}

/// Best-effort absolute form of an existing path.
fn absolute(path: &Path) -> Option<PathBuf> {
    std::fs::canonicalize(path).ok()
}
