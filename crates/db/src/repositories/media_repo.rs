//! Repository for the media collection.

use irs_core::media::MediaKind;
use irs_core::types::DbId;

use crate::error::DbError;
use crate::models::media::{CreateMedia, Media};
use crate::store::Store;

/// Provides create and lookup operations for media records.
pub struct MediaRepo;

impl MediaRepo {
    /// Store a media record for an existing issue.
    ///
    /// The kind is derived from the MIME type. Fails with
    /// [`DbError::ForeignKey`] when the owning issue does not exist.
    pub async fn create(store: &Store, input: &CreateMedia) -> Result<Media, DbError> {
        let now = chrono::Utc::now();
        let mut tables = store.write().await;
        if !tables.issues.contains(input.issue_id) {
            return Err(DbError::ForeignKey(format!(
                "media references missing issue {}",
                input.issue_id
            )));
        }
        Ok(tables.media.insert_with(|id| Media {
            id,
            issue_id: input.issue_id,
            kind: MediaKind::from_mime(&input.mime_type),
            file_name: input.file_name.clone(),
            file_path: input.file_path.clone(),
            mime_type: input.mime_type.clone(),
            size: input.size,
            transcription: None,
            created_at: now,
        }))
    }

    /// All media for an issue, in upload order.
    pub async fn list_for_issue(store: &Store, issue_id: DbId) -> Result<Vec<Media>, DbError> {
        Ok(store
            .read()
            .await
            .media
            .values()
            .filter(|m| m.issue_id == issue_id)
            .cloned()
            .collect())
    }
}
