use crate::audio::AudioFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lowest accepted sample rate (narrowband telephone quality)
pub const MIN_SAMPLE_RATE: u32 = 8000;

/// File name of the single recording kept in the media directory
pub const AUDIO_FILE_NAME: &str = "recording.wav";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Overrides the application-private media directory
    #[serde(default)]
    pub media_dir: Option<PathBuf>,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Set once the user has allowed microphone access
    #[serde(default)]
    pub microphone_access: Option<bool>,
}

fn default_sample_rate() -> u32 {
    AudioFormat::default().sample_rate
}

fn default_channels() -> u16 {
    AudioFormat::default().channels
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media_dir: None,
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            microphone_access: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/voicerecord/config.json)
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `config_path`, writing defaults there if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("voicerecord").join("config.json"))
    }

    /// Directory holding the recording
    pub fn media_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.media_dir {
            return Ok(dir.clone());
        }

        let data_dir = if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".local").join("share")
        };

        Ok(data_dir.join("voicerecord").join("music"))
    }

    /// Resolve the fixed recording path, creating the media directory if needed
    pub fn audio_file_path(&self) -> Result<PathBuf> {
        let dir = self.media_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create media directory: {:?}", dir))?;
        Ok(dir.join(AUDIO_FILE_NAME))
    }

    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate < MIN_SAMPLE_RATE {
            return Err(anyhow::anyhow!(
                "sample_rate must be at least {} Hz",
                MIN_SAMPLE_RATE
            ));
        }

        if !(1..=2).contains(&self.channels) {
            return Err(anyhow::anyhow!("channels must be 1 (mono) or 2 (stereo)"));
        }

        Ok(())
    }
}
