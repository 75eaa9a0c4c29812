use super::{AudioCaptureService, CaptureHandle};
use crate::audio::{ActiveCapture, AudioCapture, AudioFormat, AudioSink, WavSink};
use crate::error::AudioError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Records the default microphone into a WAV file
///
/// Each take is written to a staging file next to the target and renamed over
/// it only once the WAV is finalized, so a failed or abandoned take never
/// clobbers the previous recording.
///
/// Note: the handle holds a cpal::Stream which is !Send and spawns local tasks,
/// so it must be used on a LocalSet.
pub struct CpalCapture {
    format: AudioFormat,
}

impl CpalCapture {
    pub fn new(format: AudioFormat) -> Self {
        Self { format }
    }
}

impl AudioCaptureService for CpalCapture {
    fn open(&self, path: &Path) -> Result<Box<dyn CaptureHandle>, AudioError> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix(".recording-")
            .suffix(".wav")
            .tempfile_in(dir)
            .map_err(|e| AudioError::file(dir, e))?;

        let sink = WavSink::new(staging.path().to_path_buf(), self.format)?;

        let (chunk_tx, chunk_rx) = mpsc::channel(100);
        let capture = AudioCapture::start(self.format, chunk_tx)?;
        let writer = tokio::task::spawn_local(pump(chunk_rx, Box::new(sink)));

        tracing::info!("Recording started: {}", path.display());
        Ok(Box::new(CpalCaptureHandle {
            capture,
            writer,
            staging,
            target: path.to_path_buf(),
        }))
    }
}

struct CpalCaptureHandle {
    capture: ActiveCapture,
    writer: JoinHandle<Result<Box<dyn AudioSink>, AudioError>>,
    staging: NamedTempFile,
    target: PathBuf,
}

#[async_trait(?Send)]
impl CaptureHandle for CpalCaptureHandle {
    async fn stop(self: Box<Self>) -> Result<(), AudioError> {
        let CpalCaptureHandle {
            capture,
            writer,
            staging,
            target,
        } = *self;

        capture.stop();

        // The pump returns the sink once the bridge has flushed and closed the channel
        let mut sink = writer
            .await
            .map_err(|e| AudioError::WorkerGone(format!("Capture writer task failed: {}", e)))??;
        sink.finalize().await?;

        staging
            .persist(&target)
            .map_err(|e| AudioError::file(&target, e.error))?;

        tracing::info!("Recording saved to {}", target.display());
        Ok(())
    }
}

/// Streams captured chunks into the sink until the capture side hangs up
async fn pump(
    mut chunks: mpsc::Receiver<Vec<f32>>,
    mut sink: Box<dyn AudioSink>,
) -> Result<Box<dyn AudioSink>, AudioError> {
    while let Some(chunk) = chunks.recv().await {
        sink.write_chunk(chunk)?;
    }
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pump_drains_channel_into_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pumped.wav");
        let sink = WavSink::new(path.clone(), AudioFormat::default()).unwrap();

        let (tx, rx) = mpsc::channel(4);
        let pumping = tokio::spawn(pump(rx, Box::new(sink)));

        tx.send(vec![0.25; 10]).await.unwrap();
        tx.send(vec![-0.25; 6]).await.unwrap();
        drop(tx);

        let mut sink = pumping.await.unwrap().unwrap();
        sink.finalize().await.unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 16);
    }
}
