// Recordings are always 16-bit signed integer PCM WAV. Capture works in f32 and
// the WAV writer converts on the way out.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFormat {
    pub const BITS_PER_SAMPLE: u16 = 16;

    /// Number of interleaved samples covering `seconds` of audio
    pub fn samples_for_duration(&self, seconds: f32) -> usize {
        (self.sample_rate as f32 * self.channels as f32 * seconds) as usize
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_for_duration_counts_all_channels() {
        let mono = AudioFormat::default();
        assert_eq!(mono.samples_for_duration(0.5), 8000);

        let stereo = AudioFormat {
            sample_rate: 44100,
            channels: 2,
        };
        assert_eq!(stereo.samples_for_duration(1.0), 88200);
    }
}
