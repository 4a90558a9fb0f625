//! One-shot analysis summary of an EEG signal

use serde::Serialize;

use rootstar_sonify_core::types::{EegBand, EegSignal, HjorthParameters};
use rootstar_sonify_core::{SignalResult, SignalStatistics};

use super::fft::{band_powers, power_spectrum, BandPowers};
use super::filters::decompose;
use super::hjorth::hjorth;

/// Everything the analyzer reports about one signal
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Sample rate (Hz)
    pub sample_rate: f64,
    /// Duration (s)
    pub duration_s: f64,
    /// Mean Welch power of each band-passed signal
    pub band_powers: BandPowers,
    /// Band powers as fractions of the total
    pub relative_powers: BandPowers,
    /// Band with the most power
    pub dominant_band: EegBand,
    /// Alpha/theta power ratio
    pub alpha_theta_ratio: f64,
    /// Beta/alpha power ratio
    pub beta_alpha_ratio: f64,
    /// Strongest bin of the broadband PSD (Hz)
    pub peak_frequency_hz: f64,
    /// Hjorth descriptors, `None` for a flat signal
    pub hjorth: Option<HjorthParameters>,
    /// Basic sample statistics
    pub statistics: SignalStatistics,
}

impl AnalysisReport {
    /// Decompose, estimate spectra and summarize `signal`.
    ///
    /// # Errors
    ///
    /// Propagates decomposition and spectral errors. A degenerate Hjorth
    /// result is reported as `None` instead of failing.
    pub fn compute(signal: &EegSignal) -> SignalResult<Self> {
        let decomposition = decompose(signal)?;
        let powers = band_powers(&decomposition)?;
        let psd = power_spectrum(signal)?;

        let hjorth = match hjorth(signal) {
            Ok(params) => Some(params),
            Err(err) => {
                tracing::debug!(%err, "hjorth parameters unavailable");
                None
            }
        };

        Ok(Self {
            sample_rate: signal.sample_rate(),
            duration_s: signal.duration(),
            band_powers: powers,
            relative_powers: powers.relative(),
            dominant_band: powers.dominant(),
            alpha_theta_ratio: powers.alpha_theta_ratio(),
            beta_alpha_ratio: powers.beta_alpha_ratio(),
            peak_frequency_hz: psd.peak_frequency(),
            hjorth,
            statistics: SignalStatistics::compute(signal.samples()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_report_for_theta_rhythm() {
        let fs = 256.0;
        let samples = (0..2560).map(|i| (2.0 * PI * 6.0 * i as f64 / fs).sin()).collect();
        let signal = EegSignal::new(samples, fs).unwrap();
        let report = AnalysisReport::compute(&signal).unwrap();

        assert_eq!(report.dominant_band, EegBand::Theta);
        assert!((report.peak_frequency_hz - 6.0).abs() < 1e-9);
        assert!(report.hjorth.is_some());
        assert!((report.duration_s - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_signal_has_no_hjorth() {
        let signal = EegSignal::new(vec![0.0; 1024], 256.0).unwrap();
        let report = AnalysisReport::compute(&signal).unwrap();
        assert!(report.hjorth.is_none());
        assert_eq!(report.band_powers.total(), 0.0);
        assert_eq!(report.relative_powers, BandPowers::default());
    }

    #[test]
    fn test_report_serializes() {
        let samples = (0..512).map(|i| (i as f64 * 0.3).sin()).collect();
        let signal = EegSignal::new(samples, 256.0).unwrap();
        let report = AnalysisReport::compute(&signal).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("band_powers").is_some());
        assert!(json["statistics"]["std_dev"].as_f64().unwrap() > 0.0);
    }
}
