//! Seams between the controller and the platform audio stack.
//!
//! The controller only sees these traits; the cpal/hound and rodio
//! implementations live next to them.

pub mod capture;
pub mod playback;

pub use capture::CpalCapture;
pub use playback::RodioPlayback;

use crate::error::AudioError;
use crate::messages::FinishSignal;
use async_trait::async_trait;
use std::path::Path;

/// Opens microphone recordings that encode to a file
pub trait AudioCaptureService {
    /// Start recording into `path`. The previous content of `path` must stay
    /// intact until the returned handle is stopped successfully.
    fn open(&self, path: &Path) -> Result<Box<dyn CaptureHandle>, AudioError>;
}

/// A live recording. Dropping it releases the device and discards the take.
#[async_trait(?Send)]
pub trait CaptureHandle {
    /// Stop capturing, finalize the file and release the device
    async fn stop(self: Box<Self>) -> Result<(), AudioError>;
}

/// Opens playback of a recorded file
pub trait AudioPlaybackService {
    /// Start playing `path`. `finished` is fired once when the audio reaches
    /// its natural end, from an arbitrary thread.
    fn open(&self, path: &Path, finished: FinishSignal)
    -> Result<Box<dyn PlaybackHandle>, AudioError>;
}

/// A live playback. Dropping it releases the device.
pub trait PlaybackHandle {
    fn stop(self: Box<Self>);
}
