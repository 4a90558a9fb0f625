//! Amplitude-to-pitch tone mapping
//!
//! The EEG amplitude drives the instantaneous frequency of a single sine.
//! Phase is accumulated sample by sample, so pitch changes never click.

use std::f64::consts::TAU;

use rootstar_sonify_core::types::{AudioBuffer, EegSignal};
use rootstar_sonify_core::{SignalError, SignalResult};

use super::resample::{normalize, resample_linear};
use crate::config::SonifyConfig;

/// Frequency-modulated sine driven by EEG amplitude
#[derive(Clone, Debug, PartialEq)]
pub struct ToneMapper {
    audio_sample_rate: u32,
    min_frequency_hz: f64,
    max_frequency_hz: f64,
    amplitude: f64,
}

impl Default for ToneMapper {
    fn default() -> Self {
        Self::from_config(&SonifyConfig::default())
    }
}

impl ToneMapper {
    /// Tone mapper using the rate, pitch range and amplitude of `config`
    #[must_use]
    pub fn from_config(config: &SonifyConfig) -> Self {
        Self {
            audio_sample_rate: config.audio_sample_rate,
            min_frequency_hz: config.min_frequency_hz,
            max_frequency_hz: config.max_frequency_hz,
            amplitude: config.tone_amplitude,
        }
    }

    /// Pitch for a normalized amplitude in [0, 1]
    #[must_use]
    pub fn frequency_for(&self, normalized: f64) -> f64 {
        self.min_frequency_hz + normalized * (self.max_frequency_hz - self.min_frequency_hz)
    }

    /// Render `duration_s` seconds of audio.
    ///
    /// A constant signal maps every instant to the lowest pitch.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] for a non-finite or
    /// non-positive duration, or one shorter than a single audio sample.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(&self, signal: &EegSignal, duration_s: f64) -> SignalResult<AudioBuffer> {
        if !(duration_s.is_finite() && duration_s > 0.0) {
            return Err(SignalError::invalid("duration", duration_s, "a finite duration > 0 s"));
        }
        let rate = f64::from(self.audio_sample_rate);
        let n_audio = (duration_s * rate).floor() as usize;
        if n_audio == 0 {
            return Err(SignalError::invalid("duration", duration_s, "at least one audio sample"));
        }

        let resampled = resample_linear(signal, n_audio, self.audio_sample_rate);
        let normalized = normalize(&resampled).unwrap_or_else(|| vec![0.0; n_audio]);

        let mut phase = 0.0;
        let samples = normalized
            .iter()
            .map(|&norm| {
                phase += TAU * self.frequency_for(norm) / rate;
                self.amplitude * phase.sin()
            })
            .collect();

        tracing::debug!(samples = n_audio, "tone mapping rendered");
        AudioBuffer::new(samples, self.audio_sample_rate)
    }
}

/// Tone mapping with the default 100-1000 Hz range at 44.1 kHz.
///
/// # Errors
///
/// See [`ToneMapper::render`].
pub fn tone_mapping(signal: &EegSignal, duration_s: f64) -> SignalResult<AudioBuffer> {
    ToneMapper::default().render(signal, duration_s)
}
