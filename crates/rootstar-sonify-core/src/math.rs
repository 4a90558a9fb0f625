//! Math utilities for EEG signal processing
//!
//! This module provides:
//! - Population statistics (mean, variance, extrema)
//! - Finite differences used by the Hjorth descriptors
//! - `linspace`, matching the endpoint-inclusive convention used by the
//!   waveform generators

use serde::{Deserialize, Serialize};

// ============================================================================
// Statistics
// ============================================================================

/// Arithmetic mean; 0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`); 0 for an empty slice.
#[must_use]
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / values.len() as f64
}

/// Minimum and maximum, or `None` for an empty slice.
#[must_use]
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x))))
}

/// First difference `x[i+1] - x[i]`, zero-padded at the end to `x.len()`.
#[must_use]
pub fn diff_padded(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    out.resize(values.len(), 0.0);
    out
}

/// Second difference `x[i+2] - 2x[i+1] + x[i]`, zero-padded to `x.len()`.
#[must_use]
pub fn second_diff_padded(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.windows(3).map(|w| w[2] - 2.0 * w[1] + w[0]).collect();
    out.resize(values.len(), 0.0);
    out
}

/// `n` evenly spaced points from `start` to `end` inclusive.
///
/// `n == 1` yields `[start]`.
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

// ============================================================================
// Summary Statistics
// ============================================================================

/// Basic descriptive statistics of a signal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalStatistics {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum sample
    pub min: f64,
    /// Maximum sample
    pub max: f64,
    /// Peak-to-peak range (`max - min`)
    pub range: f64,
}

impl SignalStatistics {
    /// Summarise a slice; all zeros for an empty slice.
    #[must_use]
    pub fn compute(values: &[f64]) -> Self {
        let Some((min, max)) = min_max(values) else {
            return Self::default();
        };
        Self {
            mean: mean(values),
            std_dev: variance(values).sqrt(),
            min,
            max,
            range: max - min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_is_population() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!((mean(&v) - 2.5).abs() < 1e-12);
        assert!((variance(&v) - 1.25).abs() < 1e-12);
        assert_eq!(variance(&[]), 0.0);
    }

    #[test]
    fn test_diff_padding_preserves_length() {
        let x = [1.0, 4.0, 9.0, 16.0];
        assert_eq!(diff_padded(&x), vec![3.0, 5.0, 7.0, 0.0]);
        assert_eq!(second_diff_padded(&x), vec![2.0, 2.0, 0.0, 0.0]);
        assert_eq!(diff_padded(&[5.0]), vec![0.0]);
    }

    #[test]
    fn test_linspace_endpoints() {
        let l = linspace(1.0, 0.0, 5);
        assert_eq!(l.len(), 5);
        assert!((l[0] - 1.0).abs() < 1e-12);
        assert!(l[4].abs() < 1e-12);
        assert_eq!(linspace(0.0, 1.0, 1), vec![0.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_signal_statistics() {
        let stats = SignalStatistics::compute(&[-2.0, 0.0, 2.0]);
        assert!(stats.mean.abs() < 1e-12);
        assert!((stats.range - 4.0).abs() < 1e-12);
        assert!((stats.std_dev - (8.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(SignalStatistics::compute(&[]), SignalStatistics::default());
    }
}
