//! Core data types for the sonification pipeline
//!
//! - [`EegSignal`]: single-channel EEG buffer with its sample rate
//! - [`EegBand`]: the fixed catalog of canonical frequency bands
//! - [`BrainState`]: simulated brain states
//! - [`BandDecomposition`], [`SpectralEstimate`], [`HjorthParameters`]:
//!   analyzer outputs
//! - [`AudioBuffer`]: audio-rate output of the sonifiers

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseBrainStateError, SignalError, SignalResult};

// ============================================================================
// EEG Signal
// ============================================================================

/// A single-channel EEG time series.
///
/// Samples are conventionally in µV. The buffer is never empty, every sample
/// is finite and the sample rate is strictly positive. Derived signals are
/// always new instances.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EegSignal {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl EegSignal {
    /// Wrap a sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] if the buffer is empty,
    /// contains NaN/Inf, or the sample rate is not a positive finite number.
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> SignalResult<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SignalError::invalid("sample_rate", sample_rate, "a finite rate > 0 Hz"));
        }
        if samples.is_empty() {
            return Err(SignalError::invalid("samples", 0.0, "at least one sample"));
        }
        if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
            return Err(SignalError::invalid("samples", *bad, "finite sample values"));
        }
        Ok(Self { samples, sample_rate })
    }

    /// Build a signal that shares this signal's sample rate.
    ///
    /// # Errors
    ///
    /// Same conditions as [`EegSignal::new`].
    pub fn derive(&self, samples: Vec<f64>) -> SignalResult<Self> {
        Self::new(samples, self.sample_rate)
    }

    /// Sample values
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz
    #[inline]
    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Nyquist frequency in Hz
    #[inline]
    #[must_use]
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Number of samples
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (`len / sample_rate`)
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Consume the signal, returning the raw buffer.
    #[must_use]
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

// ============================================================================
// Frequency Bands
// ============================================================================

/// Canonical EEG frequency bands, ordered from slowest to fastest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EegBand {
    /// Delta: 0.5-4 Hz (deep sleep)
    Delta,
    /// Theta: 4-8 Hz (drowsiness, memory)
    Theta,
    /// Alpha: 8-13 Hz (relaxed, eyes closed)
    Alpha,
    /// Beta: 13-30 Hz (active thinking)
    Beta,
    /// Gamma: 30-100 Hz (cognitive processing)
    Gamma,
}

impl EegBand {
    /// All bands in catalog order
    pub const ALL: [Self; 5] = [Self::Delta, Self::Theta, Self::Alpha, Self::Beta, Self::Gamma];

    /// Get the frequency range for this band (low, high) in Hz
    #[inline]
    #[must_use]
    pub const fn range_hz(self) -> (f64, f64) {
        match self {
            Self::Delta => (0.5, 4.0),
            Self::Theta => (4.0, 8.0),
            Self::Alpha => (8.0, 13.0),
            Self::Beta => (13.0, 30.0),
            Self::Gamma => (30.0, 100.0),
        }
    }

    /// Position in [`EegBand::ALL`]
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Get the band name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Delta => "delta",
            Self::Theta => "theta",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Gamma => "gamma",
        }
    }
}

impl fmt::Display for EegBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Brain States
// ============================================================================

/// Simulated brain states.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrainState {
    /// Relaxed wakefulness, alpha dominant
    Awake,
    /// Light sleep: theta dominant with vertex waves
    N1,
    /// Slow-wave sleep: high-amplitude delta
    N3,
    /// REM sleep: mixed frequencies with sawtooth waves
    Rem,
    /// Absence-type seizure: 3 Hz spike-wave discharges
    Seizure,
}

impl BrainState {
    /// All states
    pub const ALL: [Self; 5] = [Self::Awake, Self::N1, Self::N3, Self::Rem, Self::Seizure];

    /// Short identifier, also accepted by [`FromStr`]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Awake => "awake",
            Self::N1 => "n1",
            Self::N3 => "n3",
            Self::Rem => "rem",
            Self::Seizure => "seizure",
        }
    }

    /// One-line description of the simulated morphology
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Awake => "Normal awake: dominant alpha with subdominant delta, theta and beta",
            Self::N1 => "Sleep stage N1: theta dominant with Gaussian vertex waves",
            Self::N3 => "Slow-wave sleep (N3): high-amplitude delta",
            Self::Rem => "REM sleep: mixed theta/alpha/beta with sawtooth bursts",
            Self::Seizure => "Seizure: 3 Hz spike-wave discharges with onset and offset ramps",
        }
    }
}

impl fmt::Display for BrainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrainState {
    type Err = ParseBrainStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseBrainStateError { input: s.to_string() })
    }
}

// ============================================================================
// Band Decomposition
// ============================================================================

/// One band-passed copy of a source signal per [`EegBand`].
///
/// All constituents share the source's length and sample rate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BandDecomposition {
    bands: [EegSignal; 5],
}

impl BandDecomposition {
    /// Assemble a decomposition from signals in [`EegBand::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] if the signals differ in
    /// length or sample rate.
    pub fn new(bands: [EegSignal; 5]) -> SignalResult<Self> {
        let (len, rate) = (bands[0].len(), bands[0].sample_rate());
        for signal in &bands[1..] {
            if signal.len() != len {
                return Err(SignalError::invalid(
                    "band_length",
                    signal.len() as f64,
                    "every band to share the source length",
                ));
            }
            if (signal.sample_rate() - rate).abs() > f64::EPSILON {
                return Err(SignalError::invalid(
                    "band_sample_rate",
                    signal.sample_rate(),
                    "every band to share the source sample rate",
                ));
            }
        }
        Ok(Self { bands })
    }

    /// Signal for one band
    #[inline]
    #[must_use]
    pub fn get(&self, band: EegBand) -> &EegSignal {
        &self.bands[band.index()]
    }

    /// Iterate `(band, signal)` pairs in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (EegBand, &EegSignal)> {
        EegBand::ALL.into_iter().zip(self.bands.iter())
    }

    /// Shared sample rate
    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.bands[0].sample_rate()
    }

    /// Shared length
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands[0].len()
    }

    /// Always `false`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands[0].is_empty()
    }

    /// Sample-wise sum of all bands (approximate reconstruction)
    #[must_use]
    pub fn reconstruct(&self) -> EegSignal {
        let mut sum = vec![0.0; self.len()];
        for signal in &self.bands {
            for (acc, &x) in sum.iter_mut().zip(signal.samples()) {
                *acc += x;
            }
        }
        EegSignal { samples: sum, sample_rate: self.sample_rate() }
    }
}

// ============================================================================
// Spectral Estimate
// ============================================================================

/// Power spectral density on a one-sided frequency grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectralEstimate {
    frequencies: Vec<f64>,
    power: Vec<f64>,
}

impl SpectralEstimate {
    /// Pair a frequency grid with its power values.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] if the vectors are empty or
    /// differ in length, or if the grid is negative or not strictly
    /// increasing.
    pub fn new(frequencies: Vec<f64>, power: Vec<f64>) -> SignalResult<Self> {
        if frequencies.is_empty() || frequencies.len() != power.len() {
            return Err(SignalError::invalid(
                "power_len",
                power.len() as f64,
                "a non-empty power vector matching the frequency grid",
            ));
        }
        if frequencies[0] < 0.0 {
            return Err(SignalError::invalid("frequency", frequencies[0], "non-negative frequencies"));
        }
        if let Some(w) = frequencies.windows(2).find(|w| w[1] <= w[0]) {
            return Err(SignalError::invalid(
                "frequency",
                w[1],
                "a strictly increasing frequency grid",
            ));
        }
        Ok(Self { frequencies, power })
    }

    /// Frequency grid (Hz)
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Power per bin (units²/Hz)
    #[must_use]
    pub fn power(&self) -> &[f64] {
        &self.power
    }

    /// Number of bins
    #[must_use]
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Always `false`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Mean power over all bins
    #[must_use]
    pub fn mean_power(&self) -> f64 {
        self.power.iter().sum::<f64>() / self.power.len() as f64
    }

    /// Mean power over bins with `low_hz <= f <= high_hz`, or 0 if none.
    #[must_use]
    pub fn mean_power_in(&self, low_hz: f64, high_hz: f64) -> f64 {
        let (sum, count) = self
            .frequencies
            .iter()
            .zip(&self.power)
            .filter(|(f, _)| **f >= low_hz && **f <= high_hz)
            .fold((0.0, 0usize), |(s, n), (_, &p)| (s + p, n + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Frequency of the strongest bin
    #[must_use]
    pub fn peak_frequency(&self) -> f64 {
        let (idx, _) = self
            .power
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best });
        self.frequencies[idx]
    }
}

// ============================================================================
// Hjorth Parameters
// ============================================================================

/// Hjorth time-domain descriptors.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HjorthParameters {
    /// Signal variance
    pub activity: f64,
    /// Mean-frequency proxy: sqrt(var(x') / var(x))
    pub mobility: f64,
    /// Spectral-spread proxy: mobility(x') / mobility(x)
    pub complexity: f64,
}

impl HjorthParameters {
    /// All-NaN triple, the usual display fallback for degenerate input
    pub const NAN: Self = Self { activity: f64::NAN, mobility: f64::NAN, complexity: f64::NAN };

    /// Collapse a Hjorth result to parameters, substituting NaN on error.
    #[must_use]
    pub fn or_nan(result: SignalResult<Self>) -> Self {
        result.unwrap_or(Self::NAN)
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Default audio sample rate (CD quality)
pub const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Audio-rate samples in roughly [-1, 1], produced by the sonifiers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AudioBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wrap finished audio samples.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] for an empty buffer, a zero
    /// sample rate, or non-finite samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> SignalResult<Self> {
        if sample_rate == 0 {
            return Err(SignalError::invalid("audio_sample_rate", 0.0, "a rate > 0 Hz"));
        }
        if samples.is_empty() {
            return Err(SignalError::invalid("audio_samples", 0.0, "at least one sample"));
        }
        if let Some(bad) = samples.iter().find(|s| !s.is_finite()) {
            return Err(SignalError::invalid("audio_samples", *bad, "finite sample values"));
        }
        Ok(Self { samples, sample_rate })
    }

    /// Sample values
    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Audio sample rate in Hz
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Largest absolute sample value
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |m: f64, s| m.max(s.abs()))
    }

    /// Scale every sample by a linear volume in [0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] if `volume` is outside
    /// [0, 1].
    pub fn with_volume(mut self, volume: f64) -> SignalResult<Self> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(SignalError::invalid("volume", volume, "0 <= volume <= 1"));
        }
        for s in &mut self.samples {
            *s *= volume;
        }
        Ok(self)
    }

    /// 16-bit PCM: `round(clamp(x, -1, 1) * 32767)`
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_pcm16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|s| (s.clamp(-1.0, 1.0) * f64::from(i16::MAX)).round() as i16)
            .collect()
    }

    /// Consume the buffer, returning the raw samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eeg_signal_validation() {
        assert!(EegSignal::new(vec![], 256.0).unwrap_err().is_invalid_parameter());
        assert!(EegSignal::new(vec![1.0], 0.0).is_err());
        assert!(EegSignal::new(vec![1.0], -5.0).is_err());
        assert!(EegSignal::new(vec![1.0, f64::NAN], 256.0).is_err());

        let sig = EegSignal::new(vec![0.0; 512], 256.0).unwrap();
        assert_eq!(sig.len(), 512);
        assert!((sig.duration() - 2.0).abs() < 1e-12);
        assert!((sig.nyquist() - 128.0).abs() < 1e-12);
    }

    #[test]
    fn test_band_ranges_are_contiguous() {
        for pair in EegBand::ALL.windows(2) {
            let (_, high) = pair[0].range_hz();
            let (low, _) = pair[1].range_hz();
            assert!((high - low).abs() < 1e-12);
        }
        assert_eq!(EegBand::Gamma.index(), 4);
    }

    #[test]
    fn test_brain_state_parse() {
        assert_eq!("REM".parse::<BrainState>().unwrap(), BrainState::Rem);
        assert_eq!(" n3 ".parse::<BrainState>().unwrap(), BrainState::N3);
        assert!("coma".parse::<BrainState>().is_err());
    }

    #[test]
    fn test_decomposition_rejects_mismatched_lengths() {
        let a = EegSignal::new(vec![0.0; 10], 100.0).unwrap();
        let b = EegSignal::new(vec![0.0; 11], 100.0).unwrap();
        let bands = [a.clone(), a.clone(), b, a.clone(), a];
        assert!(BandDecomposition::new(bands).is_err());
    }

    #[test]
    fn test_decomposition_reconstruct_sums_bands() {
        let bands = core::array::from_fn(|i| EegSignal::new(vec![i as f64; 4], 100.0).unwrap());
        let decomposition = BandDecomposition::new(bands).unwrap();
        let sum = decomposition.reconstruct();
        assert_eq!(sum.samples(), &[10.0; 4]);
        assert_eq!(decomposition.get(EegBand::Alpha).samples()[0], 2.0);
    }

    #[test]
    fn test_spectral_estimate_requires_increasing_grid() {
        assert!(SpectralEstimate::new(vec![0.0, 1.0, 1.0], vec![1.0; 3]).is_err());
        assert!(SpectralEstimate::new(vec![0.0, 1.0], vec![1.0]).is_err());

        let est = SpectralEstimate::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 4.0, 2.0, 1.0]).unwrap();
        assert!((est.peak_frequency() - 1.0).abs() < 1e-12);
        assert!((est.mean_power_in(1.0, 2.0) - 3.0).abs() < 1e-12);
        assert!((est.mean_power() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_audio_volume() {
        let audio = AudioBuffer::new(vec![0.5, -1.0], DEFAULT_AUDIO_SAMPLE_RATE).unwrap();
        let quiet = audio.clone().with_volume(0.5).unwrap();
        assert_eq!(quiet.samples(), &[0.25, -0.5]);
        assert!(audio.with_volume(1.5).is_err());
    }

    #[test]
    fn test_pcm16_clips_and_rounds() {
        let audio = AudioBuffer::new(vec![0.0, 1.0, -1.0, 1.7, -3.0, 0.5], 8000).unwrap();
        assert_eq!(audio.to_pcm16(), vec![0, 32767, -32767, 32767, -32767, 16384]);
    }

    #[test]
    fn test_hjorth_or_nan() {
        let fallback = HjorthParameters::or_nan(Err(SignalError::degenerate("activity", "zero")));
        assert!(fallback.activity.is_nan());
    }
}
