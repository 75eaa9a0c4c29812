pub mod capture;
pub mod format;
pub mod player;
pub mod sink;
pub mod wav_sink;

pub use capture::{ActiveCapture, AudioCapture};
pub use format::AudioFormat;
pub use player::{AudioPlayer, PlayerHandle};
pub use sink::AudioSink;
pub use wav_sink::WavSink;
