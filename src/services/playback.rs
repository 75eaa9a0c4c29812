use super::{AudioPlaybackService, PlaybackHandle};
use crate::audio::{AudioPlayer, PlayerHandle};
use crate::error::AudioError;
use crate::messages::FinishSignal;
use std::path::Path;

/// Plays recordings through the default output device with rodio
pub struct RodioPlayback;

impl AudioPlaybackService for RodioPlayback {
    fn open(
        &self,
        path: &Path,
        finished: FinishSignal,
    ) -> Result<Box<dyn PlaybackHandle>, AudioError> {
        let player = AudioPlayer::start(path.to_path_buf(), move || finished.fire())?;
        tracing::info!("Playback started: {}", path.display());
        Ok(Box::new(player))
    }
}

impl PlaybackHandle for PlayerHandle {
    fn stop(self: Box<Self>) {
        PlayerHandle::stop(*self);
    }
}
