//! Data models for j2d.
//!
//! This module contains all the core data structures used throughout the
//! conversion pipeline.

mod attachment;
mod entry;
mod outcome;

pub use attachment::{Attachment, AttachmentKind};
pub use entry::{Coordinates, EntryId, NormalizedEntry, SourceEntry};
pub use outcome::{EntryRecord, ImportOutcome, RunSummary, SkipReason};
