//! EEG analysis pipeline
//!
//! - [`filters`]: Zero-phase Butterworth band-pass and band decomposition
//! - [`fft`]: Welch PSD, spectrogram and band power
//! - [`hjorth`]: Hjorth activity, mobility and complexity
//! - [`report`]: Combined per-signal analysis summary

pub mod fft;
pub mod filters;
pub mod hjorth;
pub mod report;

pub use fft::{band_powers, power_spectrum, spectrogram, BandPowers, SpectralAnalyzer, Spectrogram, Taper};
pub use filters::{bandpass, decompose, BandpassFilter, Biquad, BiquadCoeffs};
pub use hjorth::hjorth;
pub use report::AnalysisReport;
