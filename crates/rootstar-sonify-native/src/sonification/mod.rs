//! EEG sonification
//!
//! - [`tone`]: Amplitude-to-pitch mapping of the raw signal
//! - [`multiband`]: One synthesizer voice per EEG band
//! - [`resample`]: EEG-rate to audio-rate interpolation
//! - [`export`]: 16-bit WAV output

pub mod export;
pub mod multiband;
pub mod resample;
pub mod tone;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rootstar_sonify_core::types::{AudioBuffer, EegSignal};
use rootstar_sonify_core::SignalResult;

use crate::config::{ConfigError, SonifyConfig};
use crate::processing::filters::decompose;

pub use export::{encode_wav, write_wav, ExportError};
pub use multiband::{multiband_synthesis, BandVoice, MultibandSynth, Waveform};
pub use tone::{tone_mapping, ToneMapper};

/// Sonification strategy
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SonificationMethod {
    /// Single FM sine following the raw amplitude
    Tone,
    /// Five band voices mixed together
    Multiband,
}

impl SonificationMethod {
    /// All methods
    pub const ALL: [Self; 2] = [Self::Tone, Self::Multiband];

    /// Short lowercase name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tone => "tone",
            Self::Multiband => "multiband",
        }
    }
}

impl fmt::Display for SonificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized sonification method name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sonification method '{0}' (expected tone or multiband)")]
pub struct ParseMethodError(String);

impl FromStr for SonificationMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseMethodError(s.to_string()))
    }
}

/// Configured front end to both sonification engines
#[derive(Clone, Debug, PartialEq)]
pub struct Sonifier {
    config: SonifyConfig,
    tone: ToneMapper,
    multiband: MultibandSynth,
}

impl Default for Sonifier {
    fn default() -> Self {
        Self::build(SonifyConfig::default())
    }
}

impl Sonifier {
    /// Create a sonifier from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for out-of-range values.
    pub fn new(config: SonifyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SonifyConfig) -> Self {
        Self {
            tone: ToneMapper::from_config(&config),
            multiband: MultibandSynth::from_config(&config),
            config,
        }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &SonifyConfig {
        &self.config
    }

    /// Synthesize `signal` with `method`, without volume.
    ///
    /// Tone mapping spans the signal's own duration. Multiband decomposes the
    /// signal first and renders the configured fixed duration.
    ///
    /// # Errors
    ///
    /// Propagates decomposition and synthesis errors.
    pub fn sonify<R: Rng + ?Sized>(
        &self,
        method: SonificationMethod,
        signal: &EegSignal,
        rng: &mut R,
    ) -> SignalResult<AudioBuffer> {
        tracing::debug!(%method, samples = signal.len(), "sonifying");
        match method {
            SonificationMethod::Tone => self.tone.render(signal, signal.duration()),
            SonificationMethod::Multiband => self.multiband.render(&decompose(signal)?, rng),
        }
    }

    /// [`Sonifier::sonify`] followed by the configured volume.
    ///
    /// # Errors
    ///
    /// As [`Sonifier::sonify`].
    pub fn render<R: Rng + ?Sized>(
        &self,
        method: SonificationMethod,
        signal: &EegSignal,
        rng: &mut R,
    ) -> SignalResult<AudioBuffer> {
        self.sonify(method, signal, rng)?.with_volume(self.config.volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::generate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rootstar_sonify_core::types::BrainState;

    #[test]
    fn test_method_parsing() {
        assert_eq!("tone".parse::<SonificationMethod>().unwrap(), SonificationMethod::Tone);
        assert_eq!(" Multiband ".parse::<SonificationMethod>().unwrap(), SonificationMethod::Multiband);
        assert!("granular".parse::<SonificationMethod>().is_err());
        assert_eq!(SonificationMethod::Multiband.to_string(), "multiband");
    }

    #[test]
    fn test_tone_spans_signal_duration() {
        let mut rng = StdRng::seed_from_u64(12);
        let signal = generate(BrainState::Awake, 256.0, 5.0, &mut rng).unwrap();
        let audio = Sonifier::default().sonify(SonificationMethod::Tone, &signal, &mut rng).unwrap();
        assert_eq!(audio.len(), 5 * 44_100);
    }

    #[test]
    fn test_render_applies_volume() {
        let mut rng = StdRng::seed_from_u64(13);
        let signal = generate(BrainState::N3, 256.0, 5.0, &mut rng).unwrap();
        let sonifier = Sonifier::new(SonifyConfig::default().with_volume(0.5)).unwrap();

        let audio = sonifier.render(SonificationMethod::Multiband, &signal, &mut rng).unwrap();
        assert_eq!(audio.len(), 441_000);
        assert!((audio.peak() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SonifyConfig { headroom: 0.0, ..SonifyConfig::default() };
        assert!(matches!(Sonifier::new(config), Err(ConfigError::Invalid(_))));
    }
}
