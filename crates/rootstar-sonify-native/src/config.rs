//! Sonification configuration
//!
//! Every field has a default, so a JSON file only needs to name the values
//! it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rootstar_sonify_core::{SignalError, DEFAULT_AUDIO_SAMPLE_RATE};

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for [`SonifyConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(#[from] SignalError),
}

/// Sonification parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SonifyConfig {
    /// Output sample rate (Hz)
    pub audio_sample_rate: u32,
    /// Tone mapping pitch for the signal minimum (Hz)
    pub min_frequency_hz: f64,
    /// Tone mapping pitch for the signal maximum (Hz)
    pub max_frequency_hz: f64,
    /// Tone mapping sine amplitude
    pub tone_amplitude: f64,
    /// Length of every multiband rendering (s)
    pub multiband_duration_s: f64,
    /// Peak level the multiband mix is scaled to
    pub headroom: f64,
    /// Playback volume applied after synthesis
    pub volume: f64,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        Self {
            audio_sample_rate: DEFAULT_AUDIO_SAMPLE_RATE,
            min_frequency_hz: 100.0,
            max_frequency_hz: 1000.0,
            tone_amplitude: 0.5,
            multiband_duration_s: 10.0,
            headroom: 0.9,
            volume: 0.5,
        }
    }
}

impl SonifyConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// As [`SonifyConfig::from_json_str`], plus [`ConfigError::Io`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), "loaded sonification config");
        Ok(config)
    }

    /// Check every value is in range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value as
    /// [`SignalError::InvalidParameter`].
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.audio_sample_rate == 0 {
            return Err(SignalError::invalid("audio_sample_rate", 0.0, "a rate > 0 Hz"));
        }
        if !(self.min_frequency_hz.is_finite() && self.min_frequency_hz > 0.0) {
            return Err(SignalError::invalid("min_frequency_hz", self.min_frequency_hz, "a finite frequency > 0 Hz"));
        }
        if !(self.max_frequency_hz.is_finite() && self.max_frequency_hz > self.min_frequency_hz) {
            return Err(SignalError::invalid(
                "max_frequency_hz",
                self.max_frequency_hz,
                "a finite frequency above min_frequency_hz",
            ));
        }
        if !(self.tone_amplitude > 0.0 && self.tone_amplitude <= 1.0) {
            return Err(SignalError::invalid("tone_amplitude", self.tone_amplitude, "0 < amplitude <= 1"));
        }
        if !(self.multiband_duration_s.is_finite() && self.multiband_duration_s > 0.0) {
            return Err(SignalError::invalid(
                "multiband_duration_s",
                self.multiband_duration_s,
                "a finite duration > 0 s",
            ));
        }
        if !(self.headroom > 0.0 && self.headroom <= 1.0) {
            return Err(SignalError::invalid("headroom", self.headroom, "0 < headroom <= 1"));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(SignalError::invalid("volume", self.volume, "0 <= volume <= 1"));
        }
        Ok(())
    }

    /// Builder: set the playback volume
    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SonifyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.audio_sample_rate, 44_100);
        assert_eq!(config.headroom, 0.9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SonifyConfig::from_json_str(r#"{ "volume": 0.8, "max_frequency_hz": 2000.0 }"#).unwrap();
        assert_eq!(config.volume, 0.8);
        assert_eq!(config.max_frequency_hz, 2000.0);
        assert_eq!(config.min_frequency_hz, 100.0);
        assert_eq!(config.multiband_duration_s, 10.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SonifyConfig::from_json_str(r#"{ "min_frequency_hz": 500.0, "max_frequency_hz": 400.0 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SonifyConfig::from_json_str(r#"{ "volume": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SonifyConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SonifyConfig::from_json_file("/nonexistent/rootstar-sonify.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
