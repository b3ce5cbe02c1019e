//! The four media buckets held by the wizard.
//!
//! Every mutation is checked against the constraints in
//! [`irs_core::media`]. Batches are all-or-nothing: when any member is
//! rejected the bucket is left exactly as it was.

use std::time::Duration;

use irs_core::error::CoreError;
use irs_core::media::{validate_batch, Bucket, FileMeta};

/// A file held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFile {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl CapturedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn meta(&self) -> FileMeta<'_> {
        FileMeta {
            name: &self.name,
            mime: &self.mime_type,
            size: self.size(),
        }
    }
}

/// An audio clip together with its recorded length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRecording {
    pub file: CapturedFile,
    pub duration: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct MediaBuckets {
    photos: Vec<CapturedFile>,
    video: Option<CapturedFile>,
    audio: Option<AudioRecording>,
    files: Vec<CapturedFile>,
}

impl MediaBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn photos(&self) -> &[CapturedFile] {
        &self.photos
    }

    pub fn video(&self) -> Option<&CapturedFile> {
        self.video.as_ref()
    }

    pub fn audio(&self) -> Option<&AudioRecording> {
        self.audio.as_ref()
    }

    pub fn files(&self) -> &[CapturedFile] {
        &self.files
    }

    /// Number of items currently held in `bucket`.
    pub fn count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Photos => self.photos.len(),
            Bucket::Video => usize::from(self.video.is_some()),
            Bucket::Audio => usize::from(self.audio.is_some()),
            Bucket::Files => self.files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty() && self.video.is_none() && self.audio.is_none() && self.files.is_empty()
    }

    pub fn add_photos(&mut self, batch: Vec<CapturedFile>) -> Result<(), CoreError> {
        check(Bucket::Photos, self.photos.len(), &batch)?;
        self.photos.extend(batch);
        Ok(())
    }

    pub fn add_files(&mut self, batch: Vec<CapturedFile>) -> Result<(), CoreError> {
        check(Bucket::Files, self.files.len(), &batch)?;
        self.files.extend(batch);
        Ok(())
    }

    /// Store `file` as the video, returning the one it replaced.
    pub fn set_video(&mut self, file: CapturedFile) -> Result<Option<CapturedFile>, CoreError> {
        check(Bucket::Video, 0, std::slice::from_ref(&file))?;
        Ok(self.video.replace(file))
    }

    /// Store `recording` as the audio clip, returning the one it replaced.
    pub fn set_audio(
        &mut self,
        recording: AudioRecording,
    ) -> Result<Option<AudioRecording>, CoreError> {
        check(Bucket::Audio, 0, std::slice::from_ref(&recording.file))?;
        Ok(self.audio.replace(recording))
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<CapturedFile> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    pub fn remove_file(&mut self, index: usize) -> Option<CapturedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear_video(&mut self) -> Option<CapturedFile> {
        self.video.take()
    }

    pub fn clear_audio(&mut self) -> Option<AudioRecording> {
        self.audio.take()
    }

    /// Every held file in submission order: photos, video, audio, files.
    pub fn ordered(&self) -> impl Iterator<Item = &CapturedFile> {
        self.photos
            .iter()
            .chain(self.video.iter())
            .chain(self.audio.iter().map(|a| &a.file))
            .chain(self.files.iter())
    }
}

fn check(bucket: Bucket, existing: usize, batch: &[CapturedFile]) -> Result<(), CoreError> {
    let metas: Vec<FileMeta<'_>> = batch.iter().map(CapturedFile::meta).collect();
    validate_batch(bucket, existing, &metas)
}
