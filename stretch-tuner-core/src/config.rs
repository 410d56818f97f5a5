//! # Detector Configuration
//!
//! Capture and estimator settings for the live detector. Defaults reproduce
//! the classic setup: 11025 Hz mono, 0.75 s frames, 50 ms pause between
//! cycles. Any subset of fields can be overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::pitch::PitchConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Requested capture rate in Hz.
    pub sample_rate: u32,
    /// Length of one analysed frame in seconds.
    pub frame_duration: f64,
    /// Pause between two detection cycles in milliseconds.
    pub cycle_pause_ms: u64,
    pub pitch: PitchConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            sample_rate: 11025,
            frame_duration: 0.75,
            cycle_pause_ms: 50,
            pitch: PitchConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigurationError::io(path, e))?;
        let config: DetectorConfig =
            serde_json::from_str(&content).map_err(|source| ConfigurationError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.sample_rate == 0 {
            return Err(ConfigurationError::InvalidSetting(
                "sample_rate must be positive".into(),
            ));
        }
        if !(self.frame_duration.is_finite() && self.frame_duration > 0.0) {
            return Err(ConfigurationError::InvalidSetting(
                "frame_duration must be finite and positive".into(),
            ));
        }
        if self.frame_len() < 2 {
            return Err(ConfigurationError::InvalidSetting(format!(
                "a {} s frame at {} Hz holds fewer than two samples",
                self.frame_duration, self.sample_rate
            )));
        }
        self.pitch.validate()
    }

    /// Number of samples per frame at the configured rate.
    pub fn frame_len(&self) -> usize {
        self.frame_len_at(self.sample_rate)
    }

    /// Number of samples per frame at an arbitrary rate (the device may not
    /// honour the requested one).
    pub fn frame_len_at(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.frame_duration) as usize
    }
}
