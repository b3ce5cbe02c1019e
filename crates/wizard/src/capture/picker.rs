use std::path::{Path, PathBuf};

use irs_core::media::{validate_batch, Bucket, FileMeta};

use crate::error::CaptureError;
use crate::media::CapturedFile;

/// Loads a browsed or dropped batch of files for one bucket.
#[derive(Debug, Clone, Copy)]
pub struct FilePicker {
    bucket: Bucket,
}

impl FilePicker {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket }
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    /// Read `paths` into memory. The batch is checked against the bucket's
    /// constraints from file metadata first, so nothing is read when any
    /// member would be rejected. `existing` is the bucket's current count.
    pub async fn load(
        &self,
        existing: usize,
        paths: &[PathBuf],
    ) -> Result<Vec<CapturedFile>, CaptureError> {
        let mut described = Vec::with_capacity(paths.len());
        for path in paths {
            let size = tokio::fs::metadata(path).await?.len();
            described.push((display_name(path), guess_mime(path), size));
        }

        let metas: Vec<FileMeta<'_>> = described
            .iter()
            .map(|(name, mime, size)| FileMeta {
                name,
                mime,
                size: *size,
            })
            .collect();
        validate_batch(self.bucket, existing, &metas)?;

        let mut files = Vec::with_capacity(paths.len());
        for (path, (name, mime, _)) in paths.iter().zip(described) {
            let data = tokio::fs::read(path).await?;
            files.push(CapturedFile::new(name, mime, data));
        }
        tracing::debug!(bucket = self.bucket.label(), count = files.len(), "Loaded file batch");
        Ok(files)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
