//! Import invoker for the Day One command-line tool.
//!
//! Performs the single side-effecting operation of the pipeline: one
//! synchronous `dayone2 ... -- new` invocation per entry, text on stdin.
//! Re-running an import duplicates entries in the destination because the
//! tool has no natural deduplication key; cross-run deduplication is an
//! explicit non-goal.

use crate::models::{ImportOutcome, NormalizedEntry};
use crate::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::process::{Command, Stdio};

/// Default name of the Day One command-line binary.
pub const DEFAULT_DAYONE_BIN: &str = "dayone2";

/// Trailing uppercase-hex token of the tool's success output, e.g.
/// `Created new entry with uuid: CB17A357BED34F6D838410CA96C7D9D1`.
static TARGET_ID: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern covered by tests
    let pattern = Regex::new(r"([A-F0-9]+)\s*$").unwrap();
    pattern
});

/// Capability interface over the destination journal.
///
/// The production implementation shells out to `dayone2`; tests substitute
/// a fake so the pipeline can be exercised without any external process.
pub trait JournalImporter {
    /// Creates one entry in the destination and classifies the outcome.
    ///
    /// Implementations must be invoked at most once per entry and never
    /// for skippable entries.
    ///
    /// # Errors
    ///
    /// Returns an error only for faults outside the entry itself; a failed
    /// creation is reported as [`ImportOutcome::Failed`], not an error.
    fn submit(&self, entry: &NormalizedEntry) -> Result<ImportOutcome>;
}

/// Imports entries by invoking the `dayone2` CLI.
pub struct DayOneImporter {
    journal: String,
    binary: String,
}

impl DayOneImporter {
    /// Creates an importer targeting the named journal.
    #[must_use]
    pub fn new(journal: impl Into<String>) -> Self {
        Self {
            journal: journal.into(),
            binary: DEFAULT_DAYONE_BIN.to_string(),
        }
    }

    /// Overrides the `dayone2` binary path.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Builds the argument list for one entry.
    ///
    /// Entry text is deliberately not part of the arguments: it goes over
    /// stdin, so bodies containing quotes or leading dashes cannot break
    /// argument parsing.
    #[must_use]
    pub fn build_args(&self, entry: &NormalizedEntry) -> Vec<String> {
        let mut args = vec!["-j".to_string(), self.journal.clone()];

        if let Some(timestamp) = entry.timestamp {
            args.push("-d".to_string());
            args.push(timestamp.to_rfc3339());
        }
        if let Some(ref zone) = entry.zone {
            args.push("-z".to_string());
            args.push(zone.clone());
        }
        if !entry.tags.is_empty() {
            args.push("-t".to_string());
            args.extend(entry.tags.iter().cloned());
        }
        let paths = entry.resolved_paths();
        if !paths.is_empty() {
            args.push("-p".to_string());
            args.extend(paths.iter().map(|p| p.display().to_string()));
        }
        if let Some(coords) = entry.coordinates {
            args.push("--coordinate".to_string());
            args.push(coords.latitude.to_string());
            args.push(coords.longitude.to_string());
        }

        args.push("--".to_string());
        args.push("new".to_string());
        args
    }

    /// Runs the tool once, writing the entry text to its stdin.
    fn invoke(&self, entry: &NormalizedEntry) -> std::io::Result<std::process::Output> {
        let args = self.build_args(entry);
        tracing::debug!(binary = %self.binary, ?args, "invoking dayone2");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(write_err) = stdin.write_all(entry.text.as_bytes()) {
                // The tool may exit before reading stdin (e.g. a bad flag
                // causes EPIPE). Reap it and surface its own diagnostics
                // instead of the broken pipe.
                drop(stdin);
                let output = child.wait_with_output()?;
                if output.status.success() {
                    return Err(write_err);
                }
                return Ok(output);
            }
        }
        child.wait_with_output()
    }
}

impl JournalImporter for DayOneImporter {
    fn submit(&self, entry: &NormalizedEntry) -> Result<ImportOutcome> {
        let output = match self.invoke(entry) {
            Ok(output) => output,
            // A spawn failure (tool not installed, not executable) marks
            // the entry failed; the run continues so every entry gets its
            // attempt, and the summary makes the systemic fault obvious.
            Err(e) => {
                return Ok(ImportOutcome::Failed {
                    reason: format!("cannot run {}: {e}", self.binary),
                });
            },
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Ok(ImportOutcome::Failed { reason: stderr });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_target_id(&stdout).map_or_else(
            || {
                Ok(ImportOutcome::Failed {
                    reason: format!("cannot parse entry id from output: {}", stdout.trim()),
                })
            },
            |target_id| {
                Ok(ImportOutcome::Succeeded {
                    target_id: Some(target_id),
                })
            },
        )
    }
}

/// Extracts the target entry identifier from the tool's stdout.
#[must_use]
pub fn parse_target_id(output: &str) -> Option<String> {
    TARGET_ID
        .captures(output)
        .map(|captures| captures[1].to_string())
}
