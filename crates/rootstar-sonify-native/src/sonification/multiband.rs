//! Multiband additive synthesis
//!
//! Each EEG band drives its own voice: a distinct waveform on a distinct
//! base pitch, frequency-modulated by the band's normalized amplitude.
//! The voices are summed and the mix is peak-normalized.

use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use rootstar_sonify_core::types::{AudioBuffer, BandDecomposition, EegBand};
use rootstar_sonify_core::{SignalError, SignalResult};

use super::resample::{normalize, resample_linear};
use crate::config::SonifyConfig;
use crate::waveforms::{sawtooth, square, triangle};

/// Voice timbre
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure sine
    Sine,
    /// Symmetric triangle
    Triangle,
    /// Square, 50% duty
    Square,
    /// Rising ramp
    Sawtooth,
    /// Sine with per-sample Gaussian amplitude jitter
    NoisySine,
}

impl Waveform {
    /// Sample the waveform at `phase`
    fn sample<R: Rng + ?Sized>(self, phase: f64, rng: &mut R) -> f64 {
        match self {
            Self::Sine => phase.sin(),
            Self::Triangle => triangle(phase),
            Self::Square => square(phase, 0.5),
            Self::Sawtooth => sawtooth(phase, 1.0),
            Self::NoisySine => {
                let noise: f64 = StandardNormal.sample(rng);
                phase.sin() * (0.5 + 0.5 * (0.5 * noise))
            }
        }
    }
}

/// One band's synthesizer voice
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BandVoice {
    /// Timbre
    pub waveform: Waveform,
    /// Pitch at the band's minimum amplitude (Hz)
    pub base_hz: f64,
    /// Pitch swing at the band's maximum amplitude (Hz)
    pub deviation_hz: f64,
    /// Voice gain
    pub amplitude: f64,
}

impl BandVoice {
    /// Voice for `band`; base pitches step up 100 Hz per band
    #[must_use]
    pub fn for_band(band: EegBand) -> Self {
        let (waveform, deviation_hz, amplitude) = match band {
            EegBand::Delta => (Waveform::Sine, 50.0, 0.15),
            EegBand::Theta => (Waveform::Triangle, 100.0, 0.1),
            EegBand::Alpha => (Waveform::Square, 200.0, 0.1),
            EegBand::Beta => (Waveform::Sawtooth, 300.0, 0.05),
            EegBand::Gamma => (Waveform::NoisySine, 400.0, 0.05),
        };
        Self {
            waveform,
            base_hz: 100.0 * (band.index() + 1) as f64,
            deviation_hz,
            amplitude,
        }
    }

    /// Accumulate this voice into `mix`, driven by normalized amplitudes.
    fn render_into<R: Rng + ?Sized>(&self, normalized: &[f64], rate: f64, mix: &mut [f64], rng: &mut R) {
        let mut phase = 0.0;
        for (out, &norm) in mix.iter_mut().zip(normalized) {
            phase += TAU * (self.base_hz + self.deviation_hz * norm) / rate;
            *out += self.amplitude * self.waveform.sample(phase, rng);
        }
    }
}

/// Multiband additive synthesizer
#[derive(Clone, Debug, PartialEq)]
pub struct MultibandSynth {
    audio_sample_rate: u32,
    duration_s: f64,
    headroom: f64,
}

impl Default for MultibandSynth {
    fn default() -> Self {
        Self::from_config(&SonifyConfig::default())
    }
}

impl MultibandSynth {
    /// Synthesizer using the rate, duration and headroom of `config`
    #[must_use]
    pub fn from_config(config: &SonifyConfig) -> Self {
        Self {
            audio_sample_rate: config.audio_sample_rate,
            duration_s: config.multiband_duration_s,
            headroom: config.headroom,
        }
    }

    /// Render the mix of all five band voices.
    ///
    /// Output length is fixed by the configured duration, independent of
    /// the EEG length. A band with no amplitude range stays silent, so an
    /// all-flat decomposition renders exact silence.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] if the configured duration
    /// yields no audio samples.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render<R: Rng + ?Sized>(&self, bands: &BandDecomposition, rng: &mut R) -> SignalResult<AudioBuffer> {
        let rate = f64::from(self.audio_sample_rate);
        let n_audio = (self.duration_s * rate).floor() as usize;
        if !(self.duration_s.is_finite() && n_audio > 0) {
            return Err(SignalError::invalid(
                "multiband_duration_s",
                self.duration_s,
                "a finite duration of at least one audio sample",
            ));
        }

        let mut mix = vec![0.0; n_audio];
        for (band, signal) in bands.iter() {
            let resampled = resample_linear(signal, n_audio, self.audio_sample_rate);
            match normalize(&resampled) {
                Some(normalized) => BandVoice::for_band(band).render_into(&normalized, rate, &mut mix, rng),
                None => {
                    tracing::debug!(band = band.name(), "flat band muted");
                }
            }
        }

        let peak = mix.iter().fold(0.0, |m: f64, s| m.max(s.abs()));
        if peak > 0.0 {
            let gain = self.headroom / peak;
            for s in &mut mix {
                *s *= gain;
            }
        }

        AudioBuffer::new(mix, self.audio_sample_rate)
    }
}

/// Ten seconds of multiband synthesis at 44.1 kHz, peak 0.9.
///
/// # Errors
///
/// See [`MultibandSynth::render`].
pub fn multiband_synthesis<R: Rng + ?Sized>(bands: &BandDecomposition, rng: &mut R) -> SignalResult<AudioBuffer> {
    MultibandSynth::default().render(bands, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::filters::decompose;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rootstar_sonify_core::types::EegSignal;

    fn zero_bands() -> BandDecomposition {
        let signal = EegSignal::new(vec![0.0; 512], 256.0).unwrap();
        BandDecomposition::new(std::array::from_fn(|_| signal.clone())).unwrap()
    }

    fn noisy_bands() -> BandDecomposition {
        let mut rng = StdRng::seed_from_u64(8);
        let samples = (0..1024).map(|_| rng.gen_range(-1.0..1.0)).collect();
        decompose(&EegSignal::new(samples, 256.0).unwrap()).unwrap()
    }

    #[test]
    fn test_voice_catalog() {
        let bases: Vec<f64> = EegBand::ALL.iter().map(|&b| BandVoice::for_band(b).base_hz).collect();
        assert_eq!(bases, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
        assert_eq!(BandVoice::for_band(EegBand::Alpha).waveform, Waveform::Square);
        assert_eq!(BandVoice::for_band(EegBand::Gamma).deviation_hz, 400.0);
    }

    #[test]
    fn test_all_zero_bands_render_silence() {
        let mut rng = StdRng::seed_from_u64(1);
        let audio = multiband_synthesis(&zero_bands(), &mut rng).unwrap();
        assert_eq!(audio.len(), 441_000);
        assert!(audio.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_mix_is_peak_normalized() {
        let mut rng = StdRng::seed_from_u64(2);
        let audio = multiband_synthesis(&noisy_bands(), &mut rng).unwrap();
        assert_eq!(audio.len(), 441_000);
        assert!((audio.peak() - 0.9).abs() < 1e-12);
        assert!(audio.samples().iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_configured_duration() {
        let config = SonifyConfig { multiband_duration_s: 0.5, audio_sample_rate: 8000, ..SonifyConfig::default() };
        let synth = MultibandSynth::from_config(&config);
        let audio = synth.render(&noisy_bands(), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(audio.len(), 4000);
        assert_eq!(audio.sample_rate(), 8000);

        let config = SonifyConfig { multiband_duration_s: 1e-9, ..SonifyConfig::default() };
        let err = MultibandSynth::from_config(&config)
            .render(&noisy_bands(), &mut StdRng::seed_from_u64(3))
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_seeded_render_is_reproducible() {
        let bands = noisy_bands();
        let a = multiband_synthesis(&bands, &mut StdRng::seed_from_u64(4)).unwrap();
        let b = multiband_synthesis(&bands, &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(a, b);
    }
}
