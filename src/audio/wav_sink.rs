use super::format::AudioFormat;
use super::sink::AudioSink;
use crate::error::AudioError;
use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};

enum WavCommand {
    WriteChunk(Vec<f32>),
    Finalize {
        reply: oneshot::Sender<Result<(), AudioError>>,
    },
}

/// WAV encoder using a dedicated blocking thread for I/O
///
/// Chunks are sent to the writer thread over a channel and written in order.
/// A write failure is remembered and reported when the sink is finalized, so
/// the caller learns about it exactly once.
pub struct WavSink {
    tx: mpsc::UnboundedSender<WavCommand>,
}

impl WavSink {
    pub fn new(path: PathBuf, format: AudioFormat) -> Result<Self, AudioError> {
        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: AudioFormat::BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(&path, spec)
            .map_err(|e| AudioError::Encoder(format!("Failed to create WAV writer: {}", e)))?;

        let (tx, mut rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("wav-writer".to_string())
            .spawn(move || {
                let mut write_error: Option<String> = None;

                while let Some(cmd) = rx.blocking_recv() {
                    match cmd {
                        WavCommand::WriteChunk(samples) => {
                            if write_error.is_some() {
                                continue;
                            }
                            for sample in samples {
                                let amplitude = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                                if let Err(e) = writer.write_sample(amplitude) {
                                    tracing::error!("Failed to write sample: {}", e);
                                    write_error = Some(e.to_string());
                                    break;
                                }
                            }
                        }
                        WavCommand::Finalize { reply } => {
                            let result = match write_error.take() {
                                Some(e) => Err(AudioError::Encoder(e)),
                                None => writer.finalize().map_err(|e| {
                                    AudioError::Encoder(format!("Failed to finalize WAV: {}", e))
                                }),
                            };
                            let _ = reply.send(result);
                            return;
                        }
                    }
                }
            })
            .map_err(|e| AudioError::WorkerGone(format!("Failed to spawn WAV writer: {}", e)))?;

        Ok(Self { tx })
    }
}

#[async_trait]
impl AudioSink for WavSink {
    fn write_chunk(&mut self, samples: Vec<f32>) -> Result<(), AudioError> {
        self.tx
            .send(WavCommand::WriteChunk(samples))
            .map_err(|_| AudioError::WorkerGone("WAV writer is gone".to_string()))
    }

    async fn finalize(&mut self) -> Result<(), AudioError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(WavCommand::Finalize { reply })
            .map_err(|_| AudioError::WorkerGone("WAV writer is gone".to_string()))?;

        rx.await
            .map_err(|_| AudioError::WorkerGone("WAV writer dropped finalize reply".to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_readable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let format = AudioFormat::default();

        let mut sink = WavSink::new(path.clone(), format).unwrap();
        sink.write_chunk(vec![0.0, 0.5, -0.5]).unwrap();
        sink.write_chunk(vec![1.0, 2.0]).unwrap();
        sink.finalize().await.unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().bits_per_sample, 16);

        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], 0);
        assert_eq!(samples[3], i16::MAX);
        // Out-of-range input is clamped
        assert_eq!(samples[4], i16::MAX);
    }

    #[tokio::test]
    async fn test_write_after_finalize_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = WavSink::new(dir.path().join("out.wav"), AudioFormat::default()).unwrap();
        sink.finalize().await.unwrap();

        // The writer thread exits after finalize; give it a moment to drop its receiver
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(sink.write_chunk(vec![0.1]).is_err());
    }
}
