//! Media entity model and DTO.

use irs_core::media::MediaKind;
use irs_core::types::{DbId, Timestamp};
use serde::Serialize;

/// A file attached to an issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: DbId,
    pub issue_id: DbId,
    pub kind: MediaKind,
    /// Filename as uploaded by the client.
    pub file_name: String,
    /// Where the bytes were written on the server.
    pub file_path: String,
    pub mime_type: String,
    pub size: u64,
    /// Reserved for audio notes; never populated yet.
    pub transcription: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for attaching a media record to an existing issue.
#[derive(Debug, Clone)]
pub struct CreateMedia {
    pub issue_id: DbId,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: String,
    pub size: u64,
}
