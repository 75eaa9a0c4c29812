use crate::config::Config;
use crate::controller::RecordingController;
use crate::input;
use crate::messages::{Command, Control, PlaybackFinished};
use crate::permission::PromptPermission;
use crate::services::{CpalCapture, RodioPlayback};
use crate::ui::TerminalSurface;

use anyhow::Result;
use tokio::sync::mpsc;

pub struct App {
    controller: RecordingController,
    finished_rx: mpsc::UnboundedReceiver<PlaybackFinished>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let audio_path = config.audio_file_path()?;
        tracing::info!("Audio file: {}", audio_path.display());

        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        let controller = RecordingController::new(
            audio_path,
            Box::new(CpalCapture::new(config.audio_format())),
            Box::new(RodioPlayback),
            Box::new(PromptPermission::new(config)),
            Box::new(TerminalSurface),
            finished_tx,
        );

        Ok(Self {
            controller,
            finished_rx,
        })
    }

    pub async fn run(mut self) -> Result<()> {
        // Ask before stdin is handed to the command reader
        self.controller.ensure_permission()?;

        let mut commands = Self::setup_command_input();
        println!("{}", input::USAGE);

        loop {
            tracing::debug!("Main loop: waiting for event");
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(Command::Press(control)) => self.handle_press(control).await,
                    Some(Command::Quit) | None => {
                        tracing::info!("Quit requested");
                        break;
                    }
                },
                Some(finished) = self.finished_rx.recv() => {
                    self.controller.on_playback_finished(finished);
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received Ctrl+C, shutting down");
                    break;
                }
            }
        }

        self.controller.teardown();
        tracing::info!("voicerecord shutdown complete");
        Ok(())
    }

    async fn handle_press(&mut self, control: Control) {
        let mode = self.controller.mode();
        // Already logged and shown to the user by the controller
        if let Err(e) = self.controller.press(control).await {
            tracing::debug!("{:?} in {} failed: {}", control, mode, e);
        }
    }

    fn setup_command_input() -> mpsc::Receiver<Command> {
        let (command_tx, command_rx) = mpsc::channel(10);
        tokio::spawn(input::monitor_stdin(command_tx));
        command_rx
    }
}
