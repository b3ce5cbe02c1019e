//! Device-backed capture adapters.
//!
//! Platform backends implement [`MediaDevices`], [`MediaStream`] and
//! [`SpeechEngine`]; the adapters here add the wizard's rules on top:
//! sticky permission errors, one capture at a time and releasing device
//! tracks as soon as a capture is closed.

mod audio;
mod camera;
mod dictation;
mod picker;

pub use audio::AudioRecorder;
pub use camera::{Camera, CameraMode};
pub use dictation::{Dictation, DictationField, DictationState, SessionToken, SpeechEngine};
pub use picker::FilePicker;

use crate::error::CaptureError;

/// Which device a stream is opened against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Camera only, for still photos.
    Camera,
    /// Camera and microphone, for video clips.
    CameraWithAudio,
    Microphone,
}

/// Grants access to capture devices.
pub trait MediaDevices {
    /// Open a live stream. Fails with [`CaptureError::PermissionDenied`]
    /// when the user refuses access.
    fn open(&mut self, kind: StreamKind) -> Result<Box<dyn MediaStream>, CaptureError>;
}

/// A live device stream.
pub trait MediaStream: Send {
    /// Encode the current video frame as JPEG.
    fn grab_frame(&mut self) -> Result<Vec<u8>, CaptureError>;

    fn start_recording(&mut self) -> Result<(), CaptureError>;

    /// Finish recording and return the encoded WebM bytes.
    fn stop_recording(&mut self) -> Result<Vec<u8>, CaptureError>;

    /// Release every track of the stream. Must be idempotent.
    fn stop_tracks(&mut self);
}

/// Tracks the sticky error state shared by all adapters.
///
/// Once a permission error is recorded, every capture attempt fails with
/// [`CaptureError::NeedsRetry`] until [`PermissionGate::clear`] is called.
#[derive(Debug, Default)]
pub(crate) struct PermissionGate {
    error: Option<String>,
}

impl PermissionGate {
    pub(crate) fn check(&self) -> Result<(), CaptureError> {
        match &self.error {
            Some(message) => Err(CaptureError::NeedsRetry(message.clone())),
            None => Ok(()),
        }
    }

    /// Pass `err` through, latching it when it is a permission denial.
    pub(crate) fn record(&mut self, err: CaptureError) -> CaptureError {
        if let CaptureError::PermissionDenied(message) = &err {
            tracing::warn!(%message, "Capture permission denied");
            self.error = Some(message.clone());
        }
        err
    }

    pub(crate) fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn clear(&mut self) {
        self.error = None;
    }
}

/// Milliseconds since the epoch, for naming captured files.
pub(crate) fn capture_stamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
