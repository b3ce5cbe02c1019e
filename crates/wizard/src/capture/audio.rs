use std::time::Instant;

use super::{capture_stamp, MediaDevices, MediaStream, PermissionGate, StreamKind};
use crate::error::CaptureError;
use crate::media::{AudioRecording, CapturedFile};

/// Microphone recorder producing `audio/webm` clips with their duration.
///
/// The microphone is held only while recording.
pub struct AudioRecorder<D: MediaDevices> {
    devices: D,
    active: Option<(Instant, Box<dyn MediaStream>)>,
    gate: PermissionGate,
}

impl<D: MediaDevices> AudioRecorder<D> {
    pub fn new(devices: D) -> Self {
        Self {
            devices,
            active: None,
            gate: PermissionGate::default(),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.gate.error()
    }

    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.gate.check()?;
        if self.active.is_some() {
            return Err(CaptureError::Busy);
        }

        let mut stream = match self.devices.open(StreamKind::Microphone) {
            Ok(stream) => stream,
            Err(e) => return Err(self.gate.record(e)),
        };
        if let Err(e) = stream.start_recording() {
            stream.stop_tracks();
            return Err(e);
        }
        self.active = Some((Instant::now(), stream));
        Ok(())
    }

    /// Finish the recording and release the microphone.
    pub fn stop(&mut self) -> Result<AudioRecording, CaptureError> {
        let (started, mut stream) = self.active.take().ok_or(CaptureError::NotActive)?;
        let duration = started.elapsed();
        let result = stream.stop_recording();
        stream.stop_tracks();

        let data = result?;
        tracing::debug!(duration_ms = duration.as_millis() as u64, bytes = data.len(), "Audio recorded");
        Ok(AudioRecording {
            file: CapturedFile::new(format!("audio-{}.webm", capture_stamp()), "audio/webm", data),
            duration,
        })
    }

    /// Drop an unfinished recording and release the microphone.
    pub fn cancel(&mut self) {
        if let Some((_, mut stream)) = self.active.take() {
            stream.stop_tracks();
        }
    }

    pub fn retry(&mut self) {
        self.gate.clear();
    }
}

impl<D: MediaDevices> Drop for AudioRecorder<D> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use assert_matches::assert_matches;

    use super::*;
    use crate::capture::fake::FakeDevices;

    #[test]
    fn stop_returns_audio_webm_and_releases_microphone() {
        let (devices, tally) = FakeDevices::new();
        let mut recorder = AudioRecorder::new(devices);

        recorder.start().unwrap();
        assert_eq!(tally.live(), 1);
        assert_matches!(recorder.start(), Err(CaptureError::Busy));

        let recording = recorder.stop().unwrap();
        assert_eq!(recording.file.mime_type, "audio/webm");
        assert!(recording.file.name.ends_with(".webm"));
        assert_eq!(tally.live(), 0);
        assert!(!recorder.is_recording());
    }

    #[test]
    fn stop_without_start_is_an_error() {
        let (devices, _tally) = FakeDevices::new();
        let mut recorder = AudioRecorder::new(devices);
        assert_matches!(recorder.stop(), Err(CaptureError::NotActive));
    }

    #[test]
    fn dropping_mid_recording_releases_microphone() {
        let (devices, tally) = FakeDevices::new();
        let mut recorder = AudioRecorder::new(devices);
        recorder.start().unwrap();
        drop(recorder);
        assert_eq!(tally.live(), 0);
    }

    #[test]
    fn denial_is_sticky() {
        let (devices, tally) = FakeDevices::new();
        tally.deny.store(true, Ordering::SeqCst);
        let mut recorder = AudioRecorder::new(devices);

        assert!(recorder.start().is_err());
        tally.deny.store(false, Ordering::SeqCst);
        assert_matches!(recorder.start(), Err(CaptureError::NeedsRetry(_)));
        assert!(recorder.error().is_some());

        recorder.retry();
        assert!(recorder.start().is_ok());
    }
}
