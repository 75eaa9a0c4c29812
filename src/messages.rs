use std::fmt;
use tokio::sync::mpsc;

/// Activity mode of the controller. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Recording,
    Playing,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Idle => "idle",
            Mode::Recording => "recording",
            Mode::Playing => "playing",
        };
        f.write_str(name)
    }
}

/// The three controls on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Record,
    Play,
    Stop,
}

/// Commands read from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Press(Control),
    Quit,
}

/// End-of-media notification for one playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackFinished {
    pub playback_id: u64,
}

/// One-shot completion callback handed to the playback service.
///
/// Fired from whatever thread the player runs on; the event loop picks it up
/// from the channel and routes it back to the controller.
pub struct FinishSignal {
    playback_id: u64,
    tx: mpsc::UnboundedSender<PlaybackFinished>,
}

impl FinishSignal {
    pub fn new(playback_id: u64, tx: mpsc::UnboundedSender<PlaybackFinished>) -> Self {
        Self { playback_id, tx }
    }

    pub fn fire(self) {
        let finished = PlaybackFinished {
            playback_id: self.playback_id,
        };
        if self.tx.send(finished).is_err() {
            tracing::debug!("Playback {} finished after event loop exit", self.playback_id);
        }
    }
}
