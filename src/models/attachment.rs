//! Attachment references and media kinds.

use std::fmt;
use std::path::PathBuf;

/// Media kind of an attachment.
///
/// The export's attachment list is named `photos` but also carries videos
/// (`.mp4`) and audio recordings (`.mp3`); the kind is derived from the
/// file extension, and anything unrecognized is assumed to be a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// A still image (jpg, png, ...).
    Photo,
    /// A video recording (mp4).
    Video,
    /// An audio recording (mp3).
    Audio,
}

impl AttachmentKind {
    /// Derives the media kind from an attachment reference.
    #[must_use]
    pub fn from_reference(reference: &str) -> Self {
        let lower = reference.to_ascii_lowercase();
        if lower.ends_with(".mp4") {
            Self::Video
        } else if lower.ends_with(".mp3") {
            Self::Audio
        } else {
            Self::Photo
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An attachment reference resolved against the export's media files.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// The reference as it appears in the entry record.
    pub reference: String,
    /// Media kind derived from the reference.
    pub kind: AttachmentKind,
    /// Absolute path of the file on disk, or `None` when no file matched.
    pub resolved: Option<PathBuf>,
}

impl Attachment {
    /// Returns whether the reference failed to resolve to a file.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.resolved.is_none()
    }
}
