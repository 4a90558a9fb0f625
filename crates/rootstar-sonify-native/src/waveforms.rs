//! Periodic waveforms and windows shared by the simulator and synthesizers
//!
//! Phases are in radians with period `2π`.

use std::f64::consts::{PI, TAU};

/// Gaussian window of `size` points with standard deviation `std` samples,
/// peaking at 1 in the middle.
#[must_use]
pub fn gaussian_window(size: usize, std: f64) -> Vec<f64> {
    let center = (size as f64 - 1.0) / 2.0;
    (0..size)
        .map(|n| {
            let x = (n as f64 - center) / std;
            (-0.5 * x * x).exp()
        })
        .collect()
}

/// Sawtooth wave in [-1, 1].
///
/// Rises from -1 to 1 over the first `width` fraction of each period, then
/// falls back. `width = 1` is a rising ramp, `width = 0.5` a triangle.
#[must_use]
pub fn sawtooth(phase: f64, width: f64) -> f64 {
    let t = phase.rem_euclid(TAU);
    let w = width.clamp(0.0, 1.0);
    if t < w * TAU {
        t / (PI * w) - 1.0
    } else {
        (PI * (w + 1.0) - t) / (PI * (1.0 - w))
    }
}

/// Triangle wave in [-1, 1]
#[must_use]
pub fn triangle(phase: f64) -> f64 {
    sawtooth(phase, 0.5)
}

/// Square wave: 1 for the first `duty` fraction of each period, -1 after.
#[must_use]
pub fn square(phase: f64, duty: f64) -> f64 {
    if phase.rem_euclid(TAU) < duty * TAU {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_window_symmetry() {
        let w = gaussian_window(50, 10.0);
        assert_eq!(w.len(), 50);
        for i in 0..25 {
            assert!((w[i] - w[49 - i]).abs() < 1e-12);
        }
        // Even length: peak straddles the two middle samples
        assert!((w[24] - (-0.5_f64 * 0.05 * 0.05).exp()).abs() < 1e-12);
        assert!(w[0] < 0.05);
    }

    #[test]
    fn test_sawtooth_shapes() {
        assert!((sawtooth(0.0, 1.0) + 1.0).abs() < 1e-12);
        assert!(sawtooth(PI, 1.0).abs() < 1e-12);
        assert!((sawtooth(TAU - 1e-9, 1.0) - 1.0).abs() < 1e-6);

        assert!((triangle(0.0) + 1.0).abs() < 1e-12);
        assert!((triangle(PI) - 1.0).abs() < 1e-12);
        assert!(triangle(PI / 2.0).abs() < 1e-12);
        assert!(triangle(3.0 * PI / 2.0).abs() < 1e-12);

        // Negative phases wrap
        assert!((sawtooth(-PI, 1.0) - sawtooth(PI, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_square_duty_cycle() {
        assert_eq!(square(0.1, 0.5), 1.0);
        assert_eq!(square(PI + 0.1, 0.5), -1.0);
        assert_eq!(square(TAU + 0.1, 0.5), 1.0);
    }
}
