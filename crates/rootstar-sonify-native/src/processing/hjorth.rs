//! Hjorth time-domain descriptors

use rootstar_sonify_core::math::{diff_padded, second_diff_padded, variance};
use rootstar_sonify_core::types::{EegSignal, HjorthParameters};
use rootstar_sonify_core::{SignalError, SignalResult};

/// Compute Hjorth activity, mobility and complexity.
///
/// Derivatives are zero-padded finite differences, so all three variances
/// are taken over the full signal length.
///
/// # Errors
///
/// Returns [`SignalError::DegenerateSignal`] when the signal or its first
/// difference has zero variance.
pub fn hjorth(signal: &EegSignal) -> SignalResult<HjorthParameters> {
    let samples = signal.samples();
    let activity = variance(samples);
    if activity == 0.0 {
        return Err(SignalError::degenerate("mobility", "signal variance is zero"));
    }

    let var_d1 = variance(&diff_padded(samples));
    if var_d1 == 0.0 {
        return Err(SignalError::degenerate("complexity", "first-difference variance is zero"));
    }
    let var_d2 = variance(&second_diff_padded(samples));

    let mobility = (var_d1 / activity).sqrt();
    let complexity = (var_d2 / var_d1).sqrt() / mobility;

    Ok(HjorthParameters { activity, mobility, complexity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_sine_mobility_tracks_frequency() {
        let fs = 256.0;
        let f = 10.0;
        let samples = (0..2560).map(|i| (2.0 * PI * f * i as f64 / fs).sin()).collect();
        let signal = EegSignal::new(samples, fs).unwrap();
        let params = hjorth(&signal).unwrap();

        assert!((params.activity - 0.5).abs() < 0.01);
        let expected = 2.0 * PI * f / fs;
        assert!((params.mobility - expected).abs() / expected < 0.02, "mobility {}", params.mobility);
        // A pure tone has complexity close to one
        assert!((params.complexity - 1.0).abs() < 0.05, "complexity {}", params.complexity);
    }

    #[test]
    fn test_constant_signal_is_degenerate() {
        let signal = EegSignal::new(vec![1.5; 64], 256.0).unwrap();
        let err = hjorth(&signal).unwrap_err();
        assert!(err.is_degenerate());
        assert!(HjorthParameters::or_nan(Err(err)).mobility.is_nan());
    }

    #[test]
    fn test_single_sample_is_degenerate() {
        let signal = EegSignal::new(vec![0.3], 256.0).unwrap();
        assert!(hjorth(&signal).unwrap_err().is_degenerate());
    }
}
