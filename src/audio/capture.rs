use super::format::AudioFormat;
use crate::error::AudioError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use ringbuf::{HeapRb, traits::*};
use std::sync::Arc;
use tokio::sync::{Notify, mpsc, oneshot};

pub struct AudioCapture;

/// A running microphone stream
///
/// Dropping it stops the device. Use [`ActiveCapture::stop`] to also have the
/// bridge task flush whatever is still buffered before closing the chunk channel.
pub struct ActiveCapture {
    stream: cpal::Stream,
    shutdown: oneshot::Sender<()>,
}

impl ActiveCapture {
    pub fn stop(self) {
        drop(self.stream);
        let _ = self.shutdown.send(());
    }
}

impl AudioCapture {
    /// Start capturing from the default input device
    ///
    /// Audio chunks are sent via chunk_tx. The channel is closed once the
    /// capture is stopped or dropped and the remaining samples are delivered.
    /// Must be called from within a `LocalSet`.
    pub fn start(
        format: AudioFormat,
        chunk_tx: mpsc::Sender<Vec<f32>>,
    ) -> Result<ActiveCapture, AudioError> {
        let ring = HeapRb::<f32>::new(format.samples_for_duration(60.0));
        let (mut producer, consumer) = ring.split();

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioError::NoInputDevice)?;

        let config = StreamConfig {
            channels: format.channels,
            sample_rate: SampleRate(format.sample_rate),
            buffer_size: BufferSize::Default,
        };

        let notify = Arc::new(Notify::new());
        let notify_callback = notify.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _info: &cpal::InputCallbackInfo| {
                    producer.push_slice(data);
                    notify_callback.notify_one();
                },
                move |err| {
                    tracing::error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::Stream(format!("Failed to build input stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AudioError::Stream(format!("Failed to start audio stream: {}", e)))?;

        let (shutdown, shutdown_rx) = oneshot::channel();
        let chunk_size = chunk_size(format);
        tokio::task::spawn_local(bridge_task(
            consumer,
            chunk_tx,
            chunk_size,
            notify,
            shutdown_rx,
        ));

        tracing::info!(
            "Audio capture started ({} Hz, {} ch)",
            format.sample_rate,
            format.channels
        );
        Ok(ActiveCapture { stream, shutdown })
    }
}

/// Half a second of audio per chunk, never less than one sample
fn chunk_size(format: AudioFormat) -> usize {
    format.samples_for_duration(0.5).max(1)
}

/// Moves samples from the realtime ring buffer into the async chunk channel
async fn bridge_task(
    mut consumer: impl Consumer<Item = f32>,
    tx: mpsc::Sender<Vec<f32>>,
    chunk_size: usize,
    notify: Arc<Notify>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = notify.notified() => {
                while consumer.occupied_len() >= chunk_size {
                    let mut chunk = vec![0.0f32; chunk_size];
                    let n = consumer.pop_slice(&mut chunk);
                    chunk.truncate(n);

                    if tx.send(chunk).await.is_err() {
                        return;
                    }
                }
            }
            // Fires on explicit stop and when the capture is dropped
            _ = &mut shutdown => break,
        }
    }

    let remaining = consumer.occupied_len();
    if remaining > 0 {
        let mut tail = vec![0.0f32; remaining];
        let n = consumer.pop_slice(&mut tail);
        tail.truncate(n);
        let _ = tx.send(tail).await;
    }
    tracing::debug!("Capture bridge exited");
}
