//! Media kinds, bucket constraints, and upload file naming.
//!
//! The wizard keeps captured media in four buckets (photos, video, audio,
//! files). Each bucket has its own count, size, and type limits. A batch
//! offered to a bucket is accepted whole or rejected whole.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// One mebibyte.
pub const MB: u64 = 1024 * 1024;

pub const PHOTO_MAX_COUNT: usize = 10;
pub const PHOTO_MAX_BYTES: u64 = 10 * MB;

pub const VIDEO_MAX_COUNT: usize = 1;
pub const VIDEO_MAX_BYTES: u64 = 100 * MB;

pub const AUDIO_MAX_COUNT: usize = 1;
pub const AUDIO_MAX_BYTES: u64 = 50 * MB;

pub const FILE_MAX_COUNT: usize = 5;
pub const FILE_MAX_BYTES: u64 = 50 * MB;

/// Document extensions accepted in the generic files bucket.
pub const ALLOWED_DOC_EXTENSIONS: &[&str] = &["pdf", "txt", "log", "csv", "zip"];

/// Document MIME types accepted in the generic files bucket.
pub const ALLOWED_DOC_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "text/csv",
    "application/zip",
    "application/x-zip-compressed",
];

// ---------------------------------------------------------------------------
// Media kind
// ---------------------------------------------------------------------------

/// Classification of a stored media record, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    File,
}

impl MediaKind {
    /// Classify by MIME prefix: `image/` -> photo, `video/` -> video,
    /// `audio/` -> audio, anything else -> file.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Photo
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else {
            Self::File
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
        }
    }
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

/// One of the four typed media collections held by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Photos,
    Video,
    Audio,
    Files,
}

impl Bucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Photos => "photos",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Files => "files",
        }
    }

    pub fn max_count(self) -> usize {
        match self {
            Self::Photos => PHOTO_MAX_COUNT,
            Self::Video => VIDEO_MAX_COUNT,
            Self::Audio => AUDIO_MAX_COUNT,
            Self::Files => FILE_MAX_COUNT,
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            Self::Photos => PHOTO_MAX_BYTES,
            Self::Video => VIDEO_MAX_BYTES,
            Self::Audio => AUDIO_MAX_BYTES,
            Self::Files => FILE_MAX_BYTES,
        }
    }

    /// Single-slot buckets replace their content instead of appending.
    pub fn replaces(self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }

    fn accepts_type(self, name: &str, mime: &str) -> bool {
        match self {
            Self::Photos => mime.starts_with("image/"),
            Self::Video => mime.starts_with("video/"),
            Self::Audio => mime.starts_with("audio/"),
            Self::Files => {
                let ext_ok = extension_of(name)
                    .is_some_and(|ext| ALLOWED_DOC_EXTENSIONS.contains(&ext.as_str()));
                ext_ok || ALLOWED_DOC_MIME_TYPES.contains(&mime)
            }
        }
    }
}

/// The facts about a file needed to check bucket constraints.
#[derive(Debug, Clone, Copy)]
pub struct FileMeta<'a> {
    pub name: &'a str,
    pub mime: &'a str,
    pub size: u64,
}

/// Check a whole batch against a bucket's constraints.
///
/// `existing` is the number of items already in the bucket; it is ignored
/// for single-slot buckets, whose content is replaced. Every violation in
/// the batch is collected into one aggregated error.
pub fn validate_batch(
    bucket: Bucket,
    existing: usize,
    batch: &[FileMeta<'_>],
) -> Result<(), CoreError> {
    if batch.is_empty() {
        return Ok(());
    }

    let mut problems: Vec<String> = Vec::new();

    let resulting = if bucket.replaces() {
        batch.len()
    } else {
        existing + batch.len()
    };
    if resulting > bucket.max_count() {
        problems.push(format!(
            "at most {} allowed (would have {resulting})",
            bucket.max_count()
        ));
    }

    for file in batch {
        if file.size > bucket.max_bytes() {
            problems.push(format!(
                "'{}' exceeds {} MB",
                file.name,
                bucket.max_bytes() / MB
            ));
        }
        if !bucket.accepts_type(file.name, file.mime) {
            problems.push(format!(
                "'{}' has unsupported type '{}'",
                file.name, file.mime
            ));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rejected {} {}: {}",
            batch.len(),
            bucket.label(),
            problems.join("; ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Upload naming
// ---------------------------------------------------------------------------

/// Lower-cased extension of `name`, if it has a plain alphanumeric one.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| e.to_ascii_lowercase())
}

/// Name under which an upload is written to disk: `<millis>-<suffix><.ext>`.
///
/// Only the extension of the original name survives, so client-supplied
/// path components never reach the filesystem.
pub fn stored_filename(original: &str, timestamp_millis: i64, suffix: u32) -> String {
    match extension_of(original) {
        Some(ext) => format!("{timestamp_millis}-{suffix}.{ext}"),
        None => format!("{timestamp_millis}-{suffix}"),
    }
}
