//! Writing uploaded files to disk and removing them when a request fails.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use irs_core::media::stored_filename;
use rand::Rng;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, AppResult};

/// Attempts at finding an unused name before giving up.
const MAX_NAME_ATTEMPTS: usize = 8;

/// One uploaded file after it has been written to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Filename as sent by the client.
    pub original_name: String,
    /// Name on disk, also the `/uploads/{name}` path segment.
    pub stored_name: String,
    pub path: PathBuf,
    pub mime_type: String,
    pub size: u64,
}

/// Every file written while handling one request, in arrival order.
///
/// Files are tracked from the moment they are created. Unless the batch is
/// [`commit`](Self::commit)ted, dropping it removes them all, including
/// partial writes. That also covers a handler future dropped mid-request
/// by a timeout or a client disconnect.
#[derive(Debug)]
pub struct UploadBatch {
    dir: PathBuf,
    files: Vec<StoredUpload>,
    committed: bool,
}

impl UploadBatch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            committed: false,
        }
    }

    pub fn files(&self) -> &[StoredUpload] {
        &self.files
    }

    /// Keep the files on disk once the batch is dropped.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    /// Stream one multipart file field to disk.
    ///
    /// Parts without a filename (an empty file input) are skipped.
    pub async fn write_field(&mut self, mut field: Field<'_>) -> AppResult<()> {
        let Some(original_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            return Ok(());
        };
        let mime_type = resolve_mime(field.content_type(), &original_name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

        let (mut file, stored_name, path) = create_unique(&self.dir, &original_name).await?;
        self.files.push(StoredUpload {
            original_name,
            stored_name,
            path,
            mime_type,
            size: 0,
        });

        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;
            size += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to write upload: {e}")))?;

        if let Some(last) = self.files.last_mut() {
            last.size = size;
        }
        Ok(())
    }
}

impl Drop for UploadBatch {
    fn drop(&mut self) {
        if self.committed || self.files.is_empty() {
            return;
        }
        for upload in &self.files {
            remove_quietly(&upload.path);
        }
        tracing::info!(count = self.files.len(), "Discarded uploads of failed request");
    }
}

/// Create a new file under a fresh random name. Existing files are never
/// opened, so a repeated name cannot clobber another request's upload.
async fn create_unique(dir: &Path, original_name: &str) -> AppResult<(File, String, PathBuf)> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        let stored_name =
            stored_filename(original_name, chrono::Utc::now().timestamp_millis(), suffix);
        let path = dir.join(&stored_name);

        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((file, stored_name, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(AppError::InternalError(format!(
                    "Failed to create upload: {e}"
                )))
            }
        }
    }
    Err(AppError::InternalError(
        "Failed to find an unused upload name".to_string(),
    ))
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload");
    }
}

/// Prefer the part's declared content type; fall back to the filename.
fn resolve_mime(declared: Option<&str>, file_name: &str) -> String {
    match declared {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => mime.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unique_names_do_not_reuse_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let (_, first, first_path) = create_unique(dir.path(), "a.jpg").await.unwrap();
        std::fs::write(&first_path, b"kept").unwrap();

        let (_, second, _) = create_unique(dir.path(), "a.jpg").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first_path).unwrap(), b"kept");
    }

    #[tokio::test]
    async fn dropping_uncommitted_batch_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let (_, _, path) = create_unique(dir.path(), "clip.webm").await.unwrap();

        let mut batch = UploadBatch::new(dir.path());
        batch.files.push(StoredUpload {
            original_name: "clip.webm".into(),
            stored_name: path.file_name().unwrap().to_string_lossy().into_owned(),
            path: path.clone(),
            mime_type: "video/webm".into(),
            size: 0,
        });
        drop(batch);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn committed_batch_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let (_, stored_name, path) = create_unique(dir.path(), "note.txt").await.unwrap();

        let mut batch = UploadBatch::new(dir.path());
        batch.files.push(StoredUpload {
            original_name: "note.txt".into(),
            stored_name,
            path: path.clone(),
            mime_type: "text/plain".into(),
            size: 0,
        });
        batch.commit();
        drop(batch);
        assert!(path.exists());
    }

    #[test]
    fn declared_mime_wins() {
        assert_eq!(resolve_mime(Some("image/png"), "a.jpg"), "image/png");
    }

    #[test]
    fn octet_stream_falls_back_to_extension() {
        assert_eq!(
            resolve_mime(Some("application/octet-stream"), "notes.pdf"),
            "application/pdf"
        );
        assert_eq!(resolve_mime(None, "clip.mp4"), "video/mp4");
        assert_eq!(resolve_mime(None, "mystery"), "application/octet-stream");
    }
}
