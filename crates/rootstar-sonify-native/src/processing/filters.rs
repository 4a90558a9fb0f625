//! Digital filters for EEG processing
//!
//! Provides the zero-phase Butterworth band-pass shared by the simulator
//! (band-limited noise) and the analyzer (band decomposition). The filter is
//! designed as cascaded second-order sections and applied forward-backward
//! with odd-extension padding and steady-state initial conditions.

use std::f64::consts::PI;

use rootstar_sonify_core::types::{BandDecomposition, EegBand, EegSignal};
use rootstar_sonify_core::{SignalError, SignalResult};
use rustfft::num_complex::Complex64;

/// Order of the Butterworth low-pass prototype used for every band-pass.
///
/// The resulting band-pass has twice this many poles.
pub const BUTTERWORTH_ORDER: usize = 4;

/// Poles at or beyond this radius are treated as unstable.
const MAX_POLE_RADIUS: f64 = 1.0 - 1e-12;

/// Second-order section coefficients, normalized so that `a[0] == 1`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BiquadCoeffs {
    /// Numerator coefficients [b0, b1, b2]
    pub b: [f64; 3],
    /// Denominator coefficients [a0=1, a1, a2]
    pub a: [f64; 3],
}

impl BiquadCoeffs {
    /// Response of this section at `z = e^{jω}`
    fn response(&self, z_inv: Complex64) -> Complex64 {
        let z_inv2 = z_inv * z_inv;
        let num = self.b[0] + z_inv * self.b[1] + z_inv2 * self.b[2];
        let den = self.a[0] + z_inv * self.a[1] + z_inv2 * self.a[2];
        num / den
    }

    /// DC gain `Σb / Σa`
    fn dc_gain(&self) -> f64 {
        (self.b[0] + self.b[1] + self.b[2]) / (self.a[0] + self.a[1] + self.a[2])
    }
}

/// Second-order biquad section (transposed direct form II)
#[derive(Clone, Debug)]
pub struct Biquad {
    coeffs: BiquadCoeffs,
    /// State: [z1, z2]
    state: [f64; 2],
}

impl Biquad {
    /// Create a new biquad section with given coefficients
    #[must_use]
    pub fn new(coeffs: BiquadCoeffs) -> Self {
        Self { coeffs, state: [0.0, 0.0] }
    }

    /// Process a single sample
    pub fn filter(&mut self, input: f64) -> f64 {
        let BiquadCoeffs { b, a } = self.coeffs;
        let output = b[0] * input + self.state[0];
        self.state[0] = b[1] * input - a[1] * output + self.state[1];
        self.state[1] = b[2] * input - a[2] * output;
        output
    }

    /// Load the state this section settles to under a constant input.
    pub fn settle(&mut self, input: f64) {
        let BiquadCoeffs { b, a } = self.coeffs;
        let gain = self.coeffs.dc_gain();
        let z2 = (b[2] - a[2] * gain) * input;
        let z1 = (b[1] - a[1] * gain) * input + z2;
        self.state = [z1, z2];
    }

    /// Reset filter state
    pub fn reset(&mut self) {
        self.state = [0.0, 0.0];
    }
}

/// Butterworth band-pass as a cascade of second-order sections.
#[derive(Clone, Debug)]
pub struct BandpassFilter {
    sections: Vec<BiquadCoeffs>,
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
}

impl BandpassFilter {
    /// Design a Butterworth band-pass with a prototype of the given order.
    ///
    /// Edges are pre-warped for the bilinear transform, the analog low-pass
    /// prototype is shifted to a band-pass, and each pole pair becomes one
    /// section with zeros at `z = ±1`. The cascade is scaled to unit gain at
    /// the geometric center frequency.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::InvalidParameter`] unless
    /// `0 < low_hz < high_hz < sample_rate / 2` and `order > 0`, or if the
    /// resulting design is numerically unstable.
    pub fn butterworth(
        order: usize,
        low_hz: f64,
        high_hz: f64,
        sample_rate: f64,
    ) -> SignalResult<Self> {
        validate_band(low_hz, high_hz, sample_rate)?;
        if order == 0 {
            return Err(SignalError::invalid("order", 0.0, "a filter order >= 1"));
        }

        let fs2 = 2.0 * sample_rate;
        let w_low = prewarp(low_hz, sample_rate);
        let w_high = prewarp(high_hz, sample_rate);
        let bandwidth = w_high - w_low;
        let w_center = (w_low * w_high).sqrt();

        let to_digital = |s: Complex64| (fs2 + s) / (fs2 - s);
        let mut sections = Vec::with_capacity(order);

        for pole in butterworth_poles(order) {
            // Conjugates of upper-half poles land in the same sections
            if pole.im < -1e-12 {
                continue;
            }
            let half = pole * (bandwidth / 2.0);
            let disc = (half * half - w_center * w_center).sqrt();
            let z1 = to_digital(half + disc);
            let z2 = to_digital(half - disc);

            if pole.im > 1e-12 {
                sections.push(conjugate_section(z1));
                sections.push(conjugate_section(z2));
            } else {
                sections.push(BiquadCoeffs {
                    b: [1.0, 0.0, -1.0],
                    a: [1.0, -(z1 + z2).re, (z1 * z2).re],
                });
            }
        }

        let mut filter = Self { sections, low_hz, high_hz, sample_rate };

        if !filter.is_stable() {
            return Err(SignalError::invalid(
                "low_hz",
                low_hz,
                "band edges far enough from 0 Hz and Nyquist for a stable filter",
            ));
        }

        let center_hz = sample_rate / PI * (w_center / fs2).atan();
        let gain = filter.magnitude_response(center_hz);
        if !(gain.is_finite() && gain > 0.0) {
            return Err(SignalError::invalid(
                "high_hz",
                high_hz,
                "band edges that yield a finite pass-band gain",
            ));
        }
        let per_section = gain.powf(-1.0 / filter.sections.len() as f64);
        for section in &mut filter.sections {
            for b in &mut section.b {
                *b *= per_section;
            }
        }

        tracing::debug!(
            low_hz,
            high_hz,
            sample_rate,
            sections = filter.sections.len(),
            "designed Butterworth band-pass"
        );

        Ok(filter)
    }

    /// Design the standard filter for a canonical EEG band
    ///
    /// # Errors
    ///
    /// Fails if the band's upper edge is at or above Nyquist.
    pub fn for_band(sample_rate: f64, band: EegBand) -> SignalResult<Self> {
        let (low, high) = band.range_hz();
        Self::butterworth(BUTTERWORTH_ORDER, low, high, sample_rate)
    }

    /// Second-order sections
    #[must_use]
    pub fn sections(&self) -> &[BiquadCoeffs] {
        &self.sections
    }

    /// Lower edge in Hz
    #[must_use]
    pub fn low_hz(&self) -> f64 {
        self.low_hz
    }

    /// Upper edge in Hz
    #[must_use]
    pub fn high_hz(&self) -> f64 {
        self.high_hz
    }

    /// True if every pole lies strictly inside the unit circle
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(|s| {
            let [_, a1, a2] = s.a;
            // Jury conditions for a monic quadratic
            a2.abs() < MAX_POLE_RADIUS && a1.abs() < 1.0 + a2 && a1.is_finite() && a2.is_finite()
        })
    }

    /// Magnitude of the single-pass frequency response at `freq_hz`
    #[must_use]
    pub fn magnitude_response(&self, freq_hz: f64) -> f64 {
        let omega = 2.0 * PI * freq_hz / self.sample_rate;
        let z_inv = Complex64::from_polar(1.0, -omega);
        self.sections
            .iter()
            .fold(Complex64::new(1.0, 0.0), |h, s| h * s.response(z_inv))
            .norm()
    }

    /// Filter a block causally, starting from the given per-section states.
    fn run(&self, input: &[f64], initial: f64) -> Vec<f64> {
        let mut stages: Vec<Biquad> = self.sections.iter().copied().map(Biquad::new).collect();

        // Cascade steady state: each stage sees the previous stage's DC output
        let mut level = initial;
        for stage in &mut stages {
            stage.settle(level);
            level *= stage.coeffs.dc_gain();
        }

        input
            .iter()
            .map(|&x| stages.iter_mut().fold(x, |acc, stage| stage.filter(acc)))
            .collect()
    }

    /// Zero-phase forward-backward filtering.
    ///
    /// The input is extended at both ends by odd reflection so the start-up
    /// transient falls outside the returned window; the output has the same
    /// length as the input and no phase delay.
    #[must_use]
    pub fn filtfilt(&self, input: &[f64]) -> Vec<f64> {
        let n = input.len();
        if n == 0 {
            return Vec::new();
        }
        let padlen = (3 * (2 * self.sections.len() + 1)).min(n - 1);
        let extended = odd_extension(input, padlen);

        let mut forward = self.run(&extended, extended[0]);
        forward.reverse();
        let mut backward = self.run(&forward, forward[0]);
        backward.reverse();

        backward.drain(..padlen);
        backward.truncate(n);
        backward
    }
}

/// Zero-phase 4th-order Butterworth band-pass of an EEG signal.
///
/// # Errors
///
/// Returns [`SignalError::InvalidParameter`] unless
/// `0 < low_hz < high_hz < sample_rate / 2`.
pub fn bandpass(signal: &EegSignal, low_hz: f64, high_hz: f64) -> SignalResult<EegSignal> {
    let filter = BandpassFilter::butterworth(BUTTERWORTH_ORDER, low_hz, high_hz, signal.sample_rate())?;
    signal.derive(filter.filtfilt(signal.samples()))
}

/// Split a signal into the five canonical EEG bands.
///
/// # Errors
///
/// Fails if any band edge is at or above the signal's Nyquist frequency
/// (the gamma band needs a sample rate above 200 Hz).
pub fn decompose(signal: &EegSignal) -> SignalResult<BandDecomposition> {
    let mut bands = Vec::with_capacity(EegBand::ALL.len());
    for band in EegBand::ALL {
        let (low, high) = band.range_hz();
        bands.push(bandpass(signal, low, high)?);
    }
    let bands: [EegSignal; 5] = bands
        .try_into()
        .map_err(|_| SignalError::invalid("bands", 0.0, "one signal per canonical band"))?;
    BandDecomposition::new(bands)
}

/// Check `0 < low < high < nyquist`.
fn validate_band(low_hz: f64, high_hz: f64, sample_rate: f64) -> SignalResult<()> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(SignalError::invalid("sample_rate", sample_rate, "a finite rate > 0 Hz"));
    }
    if !(low_hz.is_finite() && low_hz > 0.0) {
        return Err(SignalError::invalid("low_hz", low_hz, "0 < low_hz"));
    }
    if !(high_hz.is_finite() && high_hz > low_hz) {
        return Err(SignalError::invalid("high_hz", high_hz, "low_hz < high_hz"));
    }
    if high_hz >= sample_rate / 2.0 {
        return Err(SignalError::invalid(
            "high_hz",
            high_hz,
            "high_hz < sample_rate / 2 (Nyquist)",
        ));
    }
    Ok(())
}

/// Pre-warp frequency for bilinear transform (rad/s).
fn prewarp(freq_hz: f64, sample_rate: f64) -> f64 {
    2.0 * sample_rate * (PI * freq_hz / sample_rate).tan()
}

/// Left-half-plane poles of the unit-cutoff Butterworth prototype.
fn butterworth_poles(order: usize) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::from_polar(1.0, theta)
        })
        .collect()
}

/// Section with poles at `z` and `conj(z)` and zeros at `±1`.
fn conjugate_section(z: Complex64) -> BiquadCoeffs {
    BiquadCoeffs {
        b: [1.0, 0.0, -1.0],
        a: [1.0, -2.0 * z.re, z.norm_sqr()],
    }
}

/// Extend `x` by `padlen` samples at each end via odd reflection about the
/// end points.
fn odd_extension(x: &[f64], padlen: usize) -> Vec<f64> {
    let n = x.len();
    let (first, last) = (x[0], x[n - 1]);
    let mut out = Vec::with_capacity(n + 2 * padlen);
    out.extend((1..=padlen).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=padlen).map(|i| 2.0 * last - x[n - 1 - i]));
    out
}
