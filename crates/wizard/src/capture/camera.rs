use super::{capture_stamp, MediaDevices, MediaStream, PermissionGate, StreamKind};
use crate::error::CaptureError;
use crate::media::CapturedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Photo,
    Video,
}

impl CameraMode {
    fn stream_kind(self) -> StreamKind {
        match self {
            Self::Photo => StreamKind::Camera,
            Self::Video => StreamKind::CameraWithAudio,
        }
    }
}

/// Camera capture for still photos (`image/jpeg`) and clips (`video/webm`).
///
/// The stream's tracks are released on [`Camera::close`] and when the
/// camera is dropped.
pub struct Camera<D: MediaDevices> {
    devices: D,
    stream: Option<(CameraMode, Box<dyn MediaStream>)>,
    recording: bool,
    gate: PermissionGate,
}

impl<D: MediaDevices> Camera<D> {
    pub fn new(devices: D) -> Self {
        Self {
            devices,
            stream: None,
            recording: false,
            gate: PermissionGate::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn error(&self) -> Option<&str> {
        self.gate.error()
    }

    /// Acquire the camera. Reopening in another mode releases the old stream.
    pub fn open(&mut self, mode: CameraMode) -> Result<(), CaptureError> {
        self.gate.check()?;
        if self.recording {
            return Err(CaptureError::Busy);
        }
        if matches!(&self.stream, Some((current, _)) if *current == mode) {
            return Ok(());
        }
        self.close();

        match self.devices.open(mode.stream_kind()) {
            Ok(stream) => {
                self.stream = Some((mode, stream));
                Ok(())
            }
            Err(e) => Err(self.gate.record(e)),
        }
    }

    /// Capture the current frame as a JPEG photo.
    pub fn snapshot(&mut self) -> Result<CapturedFile, CaptureError> {
        let stream = self.stream_for(CameraMode::Photo)?;
        let data = stream.grab_frame()?;
        Ok(CapturedFile::new(
            format!("photo-{}.jpg", capture_stamp()),
            "image/jpeg",
            data,
        ))
    }

    pub fn start_recording(&mut self) -> Result<(), CaptureError> {
        if self.recording {
            return Err(CaptureError::Busy);
        }
        self.stream_for(CameraMode::Video)?.start_recording()?;
        self.recording = true;
        Ok(())
    }

    /// Finish the clip. Storing it replaces any earlier video.
    pub fn stop_recording(&mut self) -> Result<CapturedFile, CaptureError> {
        if !self.recording {
            return Err(CaptureError::NotActive);
        }
        self.recording = false;
        let data = self.stream_for(CameraMode::Video)?.stop_recording()?;
        Ok(CapturedFile::new(
            format!("video-{}.webm", capture_stamp()),
            "video/webm",
            data,
        ))
    }

    /// Release the stream. Any unfinished recording is discarded.
    pub fn close(&mut self) {
        if let Some((_, mut stream)) = self.stream.take() {
            stream.stop_tracks();
        }
        self.recording = false;
    }

    /// Clear a permission error so the camera can be opened again.
    pub fn retry(&mut self) {
        self.gate.clear();
    }

    fn stream_for(&mut self, mode: CameraMode) -> Result<&mut Box<dyn MediaStream>, CaptureError> {
        match &mut self.stream {
            Some((current, stream)) if *current == mode => Ok(stream),
            _ => Err(CaptureError::NotActive),
        }
    }
}

impl<D: MediaDevices> Drop for Camera<D> {
    fn drop(&mut self) {
        self.close();
    }
}
