//! FFT-based spectral analysis
//!
//! Provides Welch power spectral density, a short-time spectrogram, and
//! band power extraction from a [`BandDecomposition`].

use std::f64::consts::PI;

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use rootstar_sonify_core::types::{BandDecomposition, EegBand, EegSignal, SpectralEstimate};
use rootstar_sonify_core::{SignalError, SignalResult};

/// Taper applied to each analysis segment
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Taper {
    /// Periodic Hann window
    Hann,
    /// Periodic Tukey window with the given cosine fraction
    Tukey(f64),
}

impl Taper {
    /// Window coefficients of the given length
    #[must_use]
    pub fn coefficients(self, size: usize) -> Vec<f64> {
        match self {
            Self::Hann => hann_window(size),
            Self::Tukey(alpha) => tukey_window(size, alpha),
        }
    }
}

/// FFT-based spectral analyzer over fixed-length segments
pub struct SpectralAnalyzer {
    segment_len: usize,
    sample_rate: f64,
    planner: FftPlanner<f64>,
    window: Vec<f64>,
    /// Density scale `1 / (fs · Σw²)`
    scale: f64,
    buffer: Vec<Complex<f64>>,
}

impl SpectralAnalyzer {
    /// Create a new spectral analyzer
    ///
    /// # Arguments
    ///
    /// * `segment_len` - Samples per segment (any length; FFT need not be a power of 2)
    /// * `sample_rate` - Sample rate in Hz
    /// * `taper` - Window applied to each segment
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] for a zero segment length or
    /// a non-positive sample rate.
    pub fn new(segment_len: usize, sample_rate: f64, taper: Taper) -> SignalResult<Self> {
        if segment_len == 0 {
            return Err(SignalError::invalid("segment_len", 0.0, "at least one sample per segment"));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SignalError::invalid("sample_rate", sample_rate, "a finite rate > 0 Hz"));
        }
        let window = taper.coefficients(segment_len);
        let power: f64 = window.iter().map(|w| w * w).sum();

        Ok(Self {
            segment_len,
            sample_rate,
            planner: FftPlanner::new(),
            window,
            scale: 1.0 / (sample_rate * power),
            buffer: vec![Complex::new(0.0, 0.0); segment_len],
        })
    }

    /// Samples per segment
    #[must_use]
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Frequency resolution (Hz per bin)
    #[must_use]
    pub fn frequency_resolution(&self) -> f64 {
        self.sample_rate / self.segment_len as f64
    }

    /// One-sided frequency grid, 0 to Nyquist
    #[must_use]
    pub fn frequencies(&self) -> Vec<f64> {
        let res = self.frequency_resolution();
        (0..=self.segment_len / 2).map(|k| k as f64 * res).collect()
    }

    /// One-sided power spectral density of a single segment
    ///
    /// The segment mean is removed before tapering. Interior bins are doubled
    /// so the one-sided density integrates to the signal variance.
    pub fn segment_psd(&mut self, segment: &[f64]) -> Vec<f64> {
        debug_assert_eq!(segment.len(), self.segment_len);
        let mean = segment.iter().sum::<f64>() / segment.len() as f64;

        for (slot, (&s, &w)) in self.buffer.iter_mut().zip(segment.iter().zip(&self.window)) {
            *slot = Complex::new((s - mean) * w, 0.0);
        }

        let fft = self.planner.plan_fft_forward(self.segment_len);
        fft.process(&mut self.buffer);

        let n_freqs = self.segment_len / 2 + 1;
        let nyquist_bin = (self.segment_len % 2 == 0).then_some(self.segment_len / 2);

        self.buffer[..n_freqs]
            .iter()
            .enumerate()
            .map(|(k, c)| {
                let p = c.norm_sqr() * self.scale;
                if k == 0 || Some(k) == nyquist_bin {
                    p
                } else {
                    2.0 * p
                }
            })
            .collect()
    }

    /// Welch estimate: average segment spectra with the given hop.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] if the signal is shorter
    /// than one segment or the hop is zero.
    pub fn welch(&mut self, samples: &[f64], hop: usize) -> SignalResult<SpectralEstimate> {
        if samples.len() < self.segment_len {
            return Err(SignalError::invalid(
                "samples",
                samples.len() as f64,
                "at least one full segment of samples",
            ));
        }
        if hop == 0 {
            return Err(SignalError::invalid("hop", 0.0, "a hop of at least one sample"));
        }

        let n_segments = (samples.len() - self.segment_len) / hop + 1;
        let mut average = vec![0.0; self.segment_len / 2 + 1];
        for start in (0..n_segments).map(|i| i * hop) {
            let psd = self.segment_psd(&samples[start..start + self.segment_len]);
            for (acc, p) in average.iter_mut().zip(psd) {
                *acc += p;
            }
        }
        for acc in &mut average {
            *acc /= n_segments as f64;
        }

        tracing::debug!(segments = n_segments, segment_len = self.segment_len, "welch estimate");
        SpectralEstimate::new(self.frequencies(), average)
    }
}

/// Welch power spectral density with 1-second Hann segments and 50% overlap.
///
/// Signals shorter than one second use a single segment spanning the whole
/// signal. The resulting resolution is about 1 Hz.
///
/// # Errors
///
/// Propagates [`SpectralAnalyzer`] construction errors.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn power_spectrum(signal: &EegSignal) -> SignalResult<SpectralEstimate> {
    let segment_len = (signal.sample_rate().round() as usize).clamp(1, signal.len());
    let hop = segment_len - segment_len / 2;
    let mut analyzer = SpectralAnalyzer::new(segment_len, signal.sample_rate(), Taper::Hann)?;
    analyzer.welch(signal.samples(), hop)
}

// ============================================================================
// Spectrogram
// ============================================================================

/// Short-time power spectral density
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spectrogram {
    /// Frequency grid (Hz)
    pub frequencies: Vec<f64>,
    /// Segment center times (s)
    pub times: Vec<f64>,
    /// `power[t][f]`: density per segment and bin
    pub power: Vec<Vec<f64>>,
}

/// Spectrogram with `min(256, len / 10)`-sample Tukey(0.25) segments and
/// one-eighth overlap.
///
/// # Errors
///
/// Returns [`SignalError::InvalidParameter`] for signals shorter than 20
/// samples.
pub fn spectrogram(signal: &EegSignal) -> SignalResult<Spectrogram> {
    let segment_len = (signal.len() / 10).min(256);
    if segment_len < 2 {
        return Err(SignalError::invalid(
            "samples",
            signal.len() as f64,
            "at least 20 samples for a spectrogram",
        ));
    }
    let hop = segment_len - segment_len / 8;
    let fs = signal.sample_rate();
    let mut analyzer = SpectralAnalyzer::new(segment_len, fs, Taper::Tukey(0.25))?;

    let n_segments = (signal.len() - segment_len) / hop + 1;
    let mut times = Vec::with_capacity(n_segments);
    let mut power = Vec::with_capacity(n_segments);
    for start in (0..n_segments).map(|i| i * hop) {
        times.push((start as f64 + segment_len as f64 / 2.0) / fs);
        power.push(analyzer.segment_psd(&signal.samples()[start..start + segment_len]));
    }

    Ok(Spectrogram { frequencies: analyzer.frequencies(), times, power })
}

// ============================================================================
// Band Powers
// ============================================================================

/// EEG band powers container
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandPowers {
    /// Delta band power (0.5-4 Hz)
    pub delta: f64,
    /// Theta band power (4-8 Hz)
    pub theta: f64,
    /// Alpha band power (8-13 Hz)
    pub alpha: f64,
    /// Beta band power (13-30 Hz)
    pub beta: f64,
    /// Gamma band power (30-100 Hz)
    pub gamma: f64,
}

impl BandPowers {
    /// Power for one band
    #[must_use]
    pub fn get(&self, band: EegBand) -> f64 {
        match band {
            EegBand::Delta => self.delta,
            EegBand::Theta => self.theta,
            EegBand::Alpha => self.alpha,
            EegBand::Beta => self.beta,
            EegBand::Gamma => self.gamma,
        }
    }

    fn set(&mut self, band: EegBand, value: f64) {
        match band {
            EegBand::Delta => self.delta = value,
            EegBand::Theta => self.theta = value,
            EegBand::Alpha => self.alpha = value,
            EegBand::Beta => self.beta = value,
            EegBand::Gamma => self.gamma = value,
        }
    }

    /// Total power across all bands
    #[must_use]
    pub fn total(&self) -> f64 {
        self.delta + self.theta + self.alpha + self.beta + self.gamma
    }

    /// Band powers normalized to total power
    #[must_use]
    pub fn relative(&self) -> Self {
        let total = self.total();
        if total > 0.0 {
            Self {
                delta: self.delta / total,
                theta: self.theta / total,
                alpha: self.alpha / total,
                beta: self.beta / total,
                gamma: self.gamma / total,
            }
        } else {
            Self::default()
        }
    }

    /// Band with the largest power (earliest band wins ties)
    #[must_use]
    pub fn dominant(&self) -> EegBand {
        EegBand::ALL
            .into_iter()
            .fold(EegBand::Delta, |best, band| if self.get(band) > self.get(best) { band } else { best })
    }

    /// Alpha/theta ratio (attention/relaxation metric)
    #[must_use]
    pub fn alpha_theta_ratio(&self) -> f64 {
        if self.theta > 0.0 {
            self.alpha / self.theta
        } else {
            0.0
        }
    }

    /// Beta/alpha ratio (engagement metric)
    #[must_use]
    pub fn beta_alpha_ratio(&self) -> f64 {
        if self.alpha > 0.0 {
            self.beta / self.alpha
        } else {
            0.0
        }
    }
}

/// Mean Welch power of each band-passed signal.
///
/// # Errors
///
/// Propagates [`power_spectrum`] errors.
pub fn band_powers(decomposition: &BandDecomposition) -> SignalResult<BandPowers> {
    let mut powers = BandPowers::default();
    for (band, signal) in decomposition.iter() {
        powers.set(band, power_spectrum(signal)?.mean_power());
    }
    Ok(powers)
}

/// Generate periodic Hann window coefficients
fn hann_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / size as f64).cos()))
        .collect()
}

/// Generate periodic Tukey window coefficients
fn tukey_window(size: usize, alpha: f64) -> Vec<f64> {
    if size == 1 || alpha <= 0.0 {
        return vec![1.0; size];
    }
    if alpha >= 1.0 {
        return hann_window(size);
    }
    // Periodic: symmetric window of size + 1 with the last point dropped
    let m = size as f64;
    let edge = alpha * m / 2.0;
    (0..size)
        .map(|i| {
            let n = i as f64;
            if n < edge {
                0.5 * (1.0 + (PI * (n / edge - 1.0)).cos())
            } else if n > m - edge {
                0.5 * (1.0 + (PI * ((m - n) / edge - 1.0)).cos())
            } else {
                1.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::filters::decompose;

    fn sine_signal(freq_hz: f64, amplitude: f64, sample_rate: f64, n: usize) -> EegSignal {
        let samples = (0..n)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
            .collect();
        EegSignal::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_welch_grid_and_peak() {
        let signal = sine_signal(10.0, 1.0, 256.0, 2560);
        let psd = power_spectrum(&signal).unwrap();

        assert_eq!(psd.len(), 129);
        assert_eq!(psd.frequencies()[0], 0.0);
        assert!((psd.frequencies()[128] - 128.0).abs() < 1e-12);
        assert!((psd.peak_frequency() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_welch_density_integrates_to_variance() {
        let signal = sine_signal(10.0, 2.0, 256.0, 2560);
        let psd = power_spectrum(&signal).unwrap();
        let resolution = psd.frequencies()[1] - psd.frequencies()[0];
        let integrated: f64 = psd.power().iter().sum::<f64>() * resolution;
        // Variance of a sine with amplitude 2 is 2
        assert!((integrated - 2.0).abs() < 0.05, "integrated {integrated}");
    }

    #[test]
    fn test_short_signal_uses_single_segment() {
        let signal = sine_signal(10.0, 1.0, 256.0, 100);
        let psd = power_spectrum(&signal).unwrap();
        assert_eq!(psd.len(), 51);
        assert!(psd.power().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_single_sample_signal() {
        let signal = EegSignal::new(vec![3.0], 256.0).unwrap();
        let psd = power_spectrum(&signal).unwrap();
        assert_eq!(psd.len(), 1);
        assert_eq!(psd.power()[0], 0.0);
    }

    #[test]
    fn test_spectrogram_shape() {
        let signal = sine_signal(20.0, 1.0, 256.0, 2560);
        let spec = spectrogram(&signal).unwrap();
        assert_eq!(spec.frequencies.len(), 129);
        // 2560 samples, 256-sample segments, hop 224
        assert_eq!(spec.times.len(), 11);
        assert_eq!(spec.power.len(), spec.times.len());

        let peak_bin = spec.power[5]
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
            .0;
        assert!((spec.frequencies[peak_bin] - 20.0).abs() <= 1.0);

        let tiny = EegSignal::new(vec![0.0; 10], 256.0).unwrap();
        assert!(spectrogram(&tiny).is_err());
    }

    #[test]
    fn test_band_powers_follow_dominant_rhythm() {
        let signal = sine_signal(10.0, 1.0, 256.0, 2560);
        let bands = decompose(&signal).unwrap();
        let powers = band_powers(&bands).unwrap();

        assert_eq!(powers.dominant(), EegBand::Alpha);
        assert!(powers.alpha_theta_ratio() > 10.0);
        let relative = powers.relative();
        assert!((relative.total() - 1.0).abs() < 1e-9);
        assert!(relative.alpha > 0.9);
    }

    #[test]
    fn test_windows() {
        let hann = hann_window(8);
        assert_eq!(hann[0], 0.0);
        assert!((hann[4] - 1.0).abs() < 1e-12);

        let tukey = tukey_window(16, 0.25);
        assert_eq!(tukey[0], 0.0);
        assert!((tukey[8] - 1.0).abs() < 1e-12);
        assert!(tukey.iter().all(|w| (0.0..=1.0).contains(w)));
    }
}
