use crate::error::AudioError;
use async_trait::async_trait;

/// Trait for streaming audio encoding
///
/// Implementations encode samples as they arrive rather than buffering the
/// whole recording.
#[async_trait]
pub trait AudioSink: Send {
    /// Write audio samples (called repeatedly during recording)
    fn write_chunk(&mut self, samples: Vec<f32>) -> Result<(), AudioError>;

    /// Flush headers and close the output
    async fn finalize(&mut self) -> Result<(), AudioError>;
}
