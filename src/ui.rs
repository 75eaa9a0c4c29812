use crate::messages::Control;
use std::fmt;
use std::io::Write;

pub const START_RECORDING: &str = "Start recording";
pub const STOP_RECORDING: &str = "Stop recording";
pub const START_PLAYBACK: &str = "Start playback";
pub const STOP_PLAYBACK: &str = "Stop playback";
pub const STOP: &str = "Stop";

/// Labels and enabled states of the three controls plus the status line.
///
/// Each transition only touches the fields the event is about; everything
/// else carries over from the previous panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    pub record_label: &'static str,
    pub play_label: &'static str,
    pub record_enabled: bool,
    pub play_enabled: bool,
    pub stop_enabled: bool,
    pub status: &'static str,
}

impl ControlPanel {
    pub fn initial() -> Self {
        Self {
            record_label: START_RECORDING,
            play_label: START_PLAYBACK,
            record_enabled: true,
            play_enabled: false,
            stop_enabled: false,
            status: "Ready",
        }
    }

    pub fn recording_started(&self) -> Self {
        Self {
            record_label: STOP_RECORDING,
            play_enabled: false,
            stop_enabled: true,
            status: "Recording…",
            ..self.clone()
        }
    }

    pub fn recording_stopped(&self) -> Self {
        Self {
            record_label: START_RECORDING,
            play_enabled: true,
            stop_enabled: false,
            status: "Recording complete",
            ..self.clone()
        }
    }

    /// Stop failed; playback stays available only if an older take exists
    pub fn recording_aborted(&self, has_audio: bool) -> Self {
        Self {
            record_label: START_RECORDING,
            play_enabled: has_audio,
            stop_enabled: false,
            status: "Recording failed",
            ..self.clone()
        }
    }

    pub fn playback_started(&self) -> Self {
        Self {
            play_label: STOP_PLAYBACK,
            record_enabled: false,
            stop_enabled: true,
            status: "Playing…",
            ..self.clone()
        }
    }

    pub fn playback_stopped(&self) -> Self {
        Self {
            play_label: START_PLAYBACK,
            record_enabled: true,
            stop_enabled: false,
            status: "Playback stopped",
            ..self.clone()
        }
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::Record => self.record_enabled,
            Control::Play => self.play_enabled,
            Control::Stop => self.stop_enabled,
        }
    }
}

impl fmt::Display for ControlPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let button = |label: &str, enabled: bool| {
            if enabled {
                format!("[{}]", label)
            } else {
                format!("({})", label)
            }
        };
        write!(
            f,
            "{} {} {}  {}",
            button(self.record_label, self.record_enabled),
            button(self.play_label, self.play_enabled),
            button(STOP, self.stop_enabled),
            self.status
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeDuration {
    Short,
    Long,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub duration: NoticeDuration,
}

impl Notice {
    pub fn short(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration: NoticeDuration::Short,
        }
    }

    pub fn long(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            duration: NoticeDuration::Long,
        }
    }
}

/// Where the controller shows its panel and notices
pub trait ControlSurface {
    fn render(&mut self, panel: &ControlPanel);
    fn notify(&mut self, notice: &Notice);
}

/// Prints the panel and notices to stdout
#[derive(Default)]
pub struct TerminalSurface;

impl ControlSurface for TerminalSurface {
    fn render(&mut self, panel: &ControlPanel) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", panel);
        let _ = out.flush();
    }

    fn notify(&mut self, notice: &Notice) {
        let mut out = std::io::stdout().lock();
        let _ = match notice.duration {
            NoticeDuration::Short => writeln!(out, "> {}", notice.text),
            NoticeDuration::Long => writeln!(out, ">> {}", notice.text),
        };
        let _ = out.flush();
    }
}
