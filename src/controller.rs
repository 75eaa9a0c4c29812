use crate::error::ControllerError;
use crate::messages::{Control, FinishSignal, Mode, PlaybackFinished};
use crate::permission::{MicrophonePermission, PermissionStatus};
use crate::services::{AudioCaptureService, AudioPlaybackService, CaptureHandle, PlaybackHandle};
use crate::ui::{ControlPanel, ControlSurface, Notice};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Current activity together with the device handle it owns
#[derive(Default)]
enum Session {
    #[default]
    Idle,
    Recording(Box<dyn CaptureHandle>),
    Playing {
        playback_id: u64,
        handle: Box<dyn PlaybackHandle>,
    },
}

/// Owns the recording/playback state machine for the single audio file.
///
/// Idle is the only state from which either activity starts; Recording and
/// Playing always pass through Idle. The capture and playback handles live
/// inside the session, so at most one of them exists at a time.
pub struct RecordingController {
    audio_path: PathBuf,
    capture: Box<dyn AudioCaptureService>,
    playback: Box<dyn AudioPlaybackService>,
    permission: Box<dyn MicrophonePermission>,
    surface: Box<dyn ControlSurface>,
    finished_tx: mpsc::UnboundedSender<PlaybackFinished>,
    session: Session,
    panel: ControlPanel,
    next_playback_id: u64,
}

impl RecordingController {
    pub fn new(
        audio_path: PathBuf,
        capture: Box<dyn AudioCaptureService>,
        playback: Box<dyn AudioPlaybackService>,
        permission: Box<dyn MicrophonePermission>,
        mut surface: Box<dyn ControlSurface>,
        finished_tx: mpsc::UnboundedSender<PlaybackFinished>,
    ) -> Self {
        let panel = ControlPanel::initial();
        surface.render(&panel);

        Self {
            audio_path,
            capture,
            playback,
            permission,
            surface,
            finished_tx,
            session: Session::Idle,
            panel,
            next_playback_id: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        match self.session {
            Session::Idle => Mode::Idle,
            Session::Recording(_) => Mode::Recording,
            Session::Playing { .. } => Mode::Playing,
        }
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Request microphone access if it has not been granted yet
    pub fn ensure_permission(&mut self) -> Result<(), ControllerError> {
        if self.permission.status() == PermissionStatus::Granted {
            return Ok(());
        }

        match self.permission.request() {
            PermissionStatus::Granted => {
                self.notify(Notice::short("Microphone access granted"));
                Ok(())
            }
            status => {
                tracing::warn!("Microphone permission not granted: {:?}", status);
                self.notify(Notice::long("Microphone access is required to record"));
                Err(ControllerError::PermissionDenied)
            }
        }
    }

    pub fn start_recording(&mut self) -> Result<(), ControllerError> {
        self.expect_idle("start recording")?;

        if self.permission.status() != PermissionStatus::Granted {
            tracing::warn!("Refusing to record without microphone permission");
            self.notify(Notice::long("Microphone access is required to record"));
            return Err(ControllerError::PermissionDenied);
        }

        match self.capture.open(&self.audio_path) {
            Ok(handle) => {
                self.session = Session::Recording(handle);
                self.show(self.panel.recording_started());
                self.notify(Notice::short("Recording started"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to start recording: {}", e);
                self.notify(Notice::short(format!("Recording failed: {}", e)));
                Err(ControllerError::StartRecording(e))
            }
        }
    }

    /// Finish the current recording. Does nothing unless recording.
    pub async fn stop_recording(&mut self) -> Result<(), ControllerError> {
        let handle = match std::mem::take(&mut self.session) {
            Session::Recording(handle) => handle,
            other => {
                self.session = other;
                tracing::debug!("stop_recording: not recording, ignoring");
                return Ok(());
            }
        };

        // The handle is consumed either way; a failed stop still releases the device
        match handle.stop().await {
            Ok(()) => {
                self.show(self.panel.recording_stopped());
                self.notify(Notice::short("Recording saved"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to stop recording: {}", e);
                let has_audio = self.audio_path.exists();
                self.show(self.panel.recording_aborted(has_audio));
                self.notify(Notice::short("Failed to stop recording"));
                Err(ControllerError::StopRecording(e))
            }
        }
    }

    pub fn start_playing(&mut self) -> Result<(), ControllerError> {
        self.expect_idle("start playback")?;

        let playback_id = self.next_playback_id;
        self.next_playback_id += 1;
        let finished = FinishSignal::new(playback_id, self.finished_tx.clone());

        match self.playback.open(&self.audio_path, finished) {
            Ok(handle) => {
                self.session = Session::Playing {
                    playback_id,
                    handle,
                };
                self.show(self.panel.playback_started());
                self.notify(Notice::short("Playback started"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to start playback: {}", e);
                self.notify(Notice::short(format!("Playback failed: {}", e)));
                Err(ControllerError::StartPlayback(e))
            }
        }
    }

    /// Stop the current playback. Safe to call in any mode.
    pub fn stop_playing(&mut self) {
        let handle = match std::mem::take(&mut self.session) {
            Session::Playing { handle, .. } => handle,
            other => {
                self.session = other;
                return;
            }
        };

        handle.stop();
        tracing::info!("Playback stopped");
        self.show(self.panel.playback_stopped());
        self.notify(Notice::short("Playback stopped"));
    }

    /// Route an end-of-media signal. Signals from an earlier playback are ignored.
    pub fn on_playback_finished(&mut self, finished: PlaybackFinished) {
        match self.session {
            Session::Playing { playback_id, .. } if playback_id == finished.playback_id => {
                tracing::debug!("Playback {} reached the end", playback_id);
                self.stop_playing();
            }
            _ => tracing::debug!(
                "Ignoring stale completion for playback {}",
                finished.playback_id
            ),
        }
    }

    /// Handle a press on one of the panel's controls.
    ///
    /// Record and Play toggle their activity, Stop ends whichever one is
    /// running. Presses on a control the panel shows as disabled are ignored.
    pub async fn press(&mut self, control: Control) -> Result<(), ControllerError> {
        if !self.panel.is_enabled(control) {
            tracing::debug!("{:?} is disabled, ignoring", control);
            return Ok(());
        }

        match (control, self.mode()) {
            (Control::Record, Mode::Recording) | (Control::Stop, Mode::Recording) => {
                self.stop_recording().await
            }
            (Control::Record, _) => self.start_recording(),
            (Control::Play, Mode::Playing) | (Control::Stop, Mode::Playing) => {
                self.stop_playing();
                Ok(())
            }
            (Control::Play, _) => self.start_playing(),
            (Control::Stop, Mode::Idle) => Ok(()),
        }
    }

    /// Release whatever device is still open, regardless of mode.
    ///
    /// An unfinished recording is discarded rather than finalized.
    pub fn teardown(&mut self) {
        match std::mem::take(&mut self.session) {
            Session::Idle => {}
            Session::Recording(handle) => {
                drop(handle);
                tracing::info!("Released capture device on teardown");
            }
            Session::Playing { handle, .. } => {
                handle.stop();
                tracing::info!("Released playback device on teardown");
            }
        }
    }

    fn expect_idle(&self, op: &'static str) -> Result<(), ControllerError> {
        match self.mode() {
            Mode::Idle => Ok(()),
            mode => {
                tracing::warn!("Cannot {} while {}", op, mode);
                Err(ControllerError::Busy { op, mode })
            }
        }
    }

    fn show(&mut self, panel: ControlPanel) {
        self.panel = panel;
        self.surface.render(&self.panel);
    }

    fn notify(&mut self, notice: Notice) {
        self.surface.notify(&notice);
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        self.teardown();
    }
}
