//! State-specific transient waveforms
//!
//! Vertex waves (N1), sawtooth bursts (REM) and the 3 Hz spike-wave train
//! with its onset/plateau/offset envelope (absence seizure).

use std::f64::consts::TAU;

use rand::seq::index;
use rand::Rng;

use rootstar_sonify_core::math::linspace;
use rootstar_sonify_core::{SignalError, SignalResult};

use crate::waveforms::{gaussian_window, sawtooth};

/// Vertex wave length in samples
pub const VERTEX_WAVE_LEN: usize = 50;
/// Vertex wave Gaussian width in samples
pub const VERTEX_WAVE_SIGMA: f64 = 10.0;
/// Vertex wave peak amplitude
pub const VERTEX_WAVE_GAIN: f64 = 2.0;
/// Vertex waves per N1 signal
pub const VERTEX_WAVE_COUNT: usize = 5;

/// Sawtooth burst length in samples
pub const SAWTOOTH_BURST_LEN: usize = 100;
/// Cycles per burst window
pub const SAWTOOTH_BURST_CYCLES: f64 = 5.0;
/// Sawtooth burst amplitude
pub const SAWTOOTH_BURST_GAIN: f64 = 0.5;
/// Sawtooth bursts per REM signal
pub const SAWTOOTH_BURST_COUNT: usize = 8;

/// Spike-wave discharge rate (Hz)
pub const SPIKE_WAVE_HZ: f64 = 3.0;

/// Gaussian vertex wave pulse
#[must_use]
pub fn vertex_wave() -> Vec<f64> {
    gaussian_window(VERTEX_WAVE_LEN, VERTEX_WAVE_SIGMA)
        .into_iter()
        .map(|w| w * VERTEX_WAVE_GAIN)
        .collect()
}

/// Rising-ramp sawtooth burst
#[must_use]
pub fn sawtooth_burst() -> Vec<f64> {
    linspace(0.0, 1.0, SAWTOOTH_BURST_LEN)
        .into_iter()
        .map(|t| sawtooth(TAU * SAWTOOTH_BURST_CYCLES * t, 1.0) * SAWTOOTH_BURST_GAIN)
        .collect()
}

/// Add `count` copies of `pulse` at distinct onsets drawn uniformly from
/// `[0, len - pulse.len())`.
///
/// # Errors
///
/// Returns [`SignalError::InvalidParameter`] if the buffer does not leave
/// room for `count` distinct onsets.
pub fn add_at_random_onsets<R: Rng + ?Sized>(
    signal: &mut [f64],
    pulse: &[f64],
    count: usize,
    rng: &mut R,
) -> SignalResult<()> {
    let room = signal.len().saturating_sub(pulse.len());
    if room < count {
        return Err(SignalError::invalid(
            "duration",
            signal.len() as f64,
            "a buffer long enough for every transient onset",
        ));
    }

    for onset in index::sample(rng, room, count) {
        for (s, p) in signal[onset..onset + pulse.len()].iter_mut().zip(pulse) {
            *s += p;
        }
    }
    Ok(())
}

/// One spike-wave complex: a narrow Gaussian spike shifted to dip to -1
/// on both sides.
#[must_use]
pub fn spike_wave(half_width: usize) -> Vec<f64> {
    gaussian_window(2 * half_width, half_width as f64 / 5.0)
        .into_iter()
        .map(|g| g * 2.0 - 1.0)
        .collect()
}

/// Train of 3 Hz spike-wave complexes over `n` samples.
///
/// Complexes are centered every third of a second. Any complex that would
/// cross either end of the buffer is skipped, as is everything when the
/// sample rate is below 20 Hz.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn spike_train(n: usize, sample_rate: f64, duration_s: f64) -> Vec<f64> {
    let mut train = vec![0.0; n];
    let half_width = (sample_rate / 20.0).floor() as usize;
    if half_width == 0 {
        return train;
    }

    let count = (duration_s * SPIKE_WAVE_HZ).floor() as usize;
    let complex = spike_wave(half_width);
    let mut skipped = 0usize;
    for i in 0..count {
        let center = (i as f64 / SPIKE_WAVE_HZ * sample_rate).floor() as usize;
        if center < half_width || center + half_width >= n {
            skipped += 1;
            continue;
        }
        for (s, c) in train[center - half_width..center + half_width].iter_mut().zip(&complex) {
            *s += c;
        }
    }

    tracing::debug!(count, skipped, half_width, "spike-wave train");
    train
}

/// Seizure amplitude envelope: linear onset over the first fifth, a
/// plateau over the next three fifths, linear offset over the last fifth.
///
/// Rounding leftovers at the end are zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn seizure_envelope(n: usize) -> Vec<f64> {
    let ramp = n / 5;
    let plateau = (n as f64 / 5.0 * 3.0).floor() as usize;

    let mut envelope = linspace(0.0, 1.0, ramp);
    envelope.extend(std::iter::repeat(1.0).take(plateau));
    envelope.extend(linspace(1.0, 0.0, ramp));
    envelope.resize(n, 0.0);
    envelope
}
