use crate::error::AudioError;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

pub struct AudioPlayer;

/// A playback in progress on its own thread
///
/// Stopping or dropping the handle halts output and joins the thread.
pub struct PlayerHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    /// Open `path` on the default output device and start playing it.
    ///
    /// Blocks until the file is decoded and the device is open, so open errors
    /// are returned here. `on_finish` runs on the player thread when the audio
    /// reaches its end; it is not called after an explicit stop.
    pub fn start<F>(path: PathBuf, on_finish: F) -> Result<PlayerHandle, AudioError>
    where
        F: FnOnce() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);

        let thread = thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || {
                let (_stream, sink) = match open_output(&path) {
                    Ok(opened) => {
                        let _ = ready_tx.send(Ok(()));
                        opened
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                tracing::debug!("Playing {}", path.display());
                loop {
                    if stop_flag.load(Ordering::Acquire) {
                        sink.stop();
                        return;
                    }
                    if sink.empty() {
                        tracing::debug!("Reached end of {}", path.display());
                        on_finish();
                        return;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            })
            .map_err(|e| AudioError::WorkerGone(format!("Failed to spawn player: {}", e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(PlayerHandle {
                stop,
                thread: Some(thread),
            }),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(AudioError::WorkerGone(
                    "Player thread exited before opening output".to_string(),
                ))
            }
        }
    }
}

impl PlayerHandle {
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("Player thread panicked");
            }
        }
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        self.halt();
    }
}

fn open_output(path: &Path) -> Result<(OutputStream, Sink), AudioError> {
    let file = File::open(path).map_err(|e| AudioError::file(path, e))?;

    let mut stream = OutputStreamBuilder::open_default_stream()
        .map_err(|e| AudioError::NoOutputDevice(e.to_string()))?;
    // Dropping the stream is how every playback ends
    stream.log_on_drop(false);
    let sink = rodio::play(stream.mixer(), BufReader::new(file)).map_err(|e| {
        AudioError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    Ok((stream, sink))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_fails_before_touching_device() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.wav");

        let result = AudioPlayer::start(path.clone(), || {});
        match result {
            Err(AudioError::File { path: reported, source }) => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("playback of a missing file should fail"),
        }
    }
}
