//! EEG-rate to audio-rate resampling and normalization

use rootstar_sonify_core::math::min_max;
use rootstar_sonify_core::types::EegSignal;

/// Linearly interpolate `signal` onto `n_out` instants spaced
/// `1 / out_rate` seconds apart.
///
/// Instants past the last EEG sample hold its value.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resample_linear(signal: &EegSignal, n_out: usize, out_rate: u32) -> Vec<f64> {
    let samples = signal.samples();
    let last = samples.len() - 1;
    let step = signal.sample_rate() / f64::from(out_rate);

    (0..n_out)
        .map(|j| {
            let pos = j as f64 * step;
            let idx = pos.floor() as usize;
            if idx >= last {
                return samples[last];
            }
            let frac = pos - idx as f64;
            samples[idx] + (samples[idx + 1] - samples[idx]) * frac
        })
        .collect()
}

/// Min-max normalize to [0, 1].
///
/// Returns `None` for a constant (or empty) input, which has no range to
/// normalize against.
#[must_use]
pub fn normalize(values: &[f64]) -> Option<Vec<f64>> {
    let (min, max) = min_max(values)?;
    let range = max - min;
    if range <= 0.0 {
        return None;
    }
    Some(values.iter().map(|v| (v - min) / range).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_interpolates_and_holds() {
        let signal = EegSignal::new(vec![0.0, 1.0, 0.0], 2.0).unwrap();
        // Output at 8 Hz: 4 points per EEG sample period
        let out = resample_linear(&signal, 12, 8);
        assert_eq!(out.len(), 12);
        assert!((out[1] - 0.25).abs() < 1e-12);
        assert!((out[4] - 1.0).abs() < 1e-12);
        assert!((out[6] - 0.5).abs() < 1e-12);
        // Past the last sample (t = 1 s) the value holds
        assert_eq!(out[11], 0.0);
    }

    #[test]
    fn test_single_sample_holds() {
        let signal = EegSignal::new(vec![3.0], 256.0).unwrap();
        assert_eq!(resample_linear(&signal, 4, 44_100), vec![3.0; 4]);
    }

    #[test]
    fn test_normalize() {
        let norm = normalize(&[2.0, 4.0, 3.0]).unwrap();
        assert_eq!(norm, vec![0.0, 1.0, 0.5]);
        assert!(normalize(&[1.0; 5]).is_none());
        assert!(normalize(&[]).is_none());
    }
}
