use crate::messages::Mode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the capture and playback services
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("No input audio device available")]
    NoInputDevice,

    #[error("No output audio device available: {0}")]
    NoOutputDevice(String),

    #[error("Audio stream error: {0}")]
    Stream(String),

    #[error("{}: {}", .path.display(), .source)]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {}", .path.display(), .reason)]
    Decode { path: PathBuf, reason: String },

    #[error("WAV encoder error: {0}")]
    Encoder(String),

    #[error("Audio worker stopped unexpectedly: {0}")]
    WorkerGone(String),
}

impl AudioError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

/// Result of a controller operation that did not go through
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Failed to start recording: {0}")]
    StartRecording(#[source] AudioError),

    #[error("Failed to stop recording: {0}")]
    StopRecording(#[source] AudioError),

    #[error("Failed to start playback: {0}")]
    StartPlayback(#[source] AudioError),

    #[error("Cannot {op} while {mode}")]
    Busy { op: &'static str, mode: Mode },
}
