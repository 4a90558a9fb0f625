//! Rootstar Sonify Native - Host-side EEG simulation, analysis and sonification
//!
//! This crate provides the processing pipeline on top of the core types:
//! - Synthetic EEG for five brain states
//! - Zero-phase band-pass filtering and band decomposition
//! - Welch power spectra, spectrograms, band powers and Hjorth descriptors
//! - Tone-mapping and multiband sonification with WAV export
//!
//! # Modules
//!
//! - [`simulation`]: Brain-state signal generator
//! - [`processing`]: Filters and spectral/temporal analysis
//! - [`sonification`]: Audio synthesis and export
//! - [`config`]: JSON-loadable sonification settings
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use rootstar_sonify_core::BrainState;
//! use rootstar_sonify_native::{generate, Sonifier, SonificationMethod};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let eeg = generate(BrainState::Awake, 256.0, 5.0, &mut rng).unwrap();
//! let audio = Sonifier::default()
//!     .sonify(SonificationMethod::Tone, &eeg, &mut rng)
//!     .unwrap();
//! assert_eq!(audio.len(), 5 * 44_100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod processing;
pub mod simulation;
pub mod sonification;
pub mod waveforms;

// Re-export key types
pub use config::{ConfigError, SonifyConfig};
pub use processing::{
    band_powers, bandpass, decompose, hjorth, power_spectrum, spectrogram, AnalysisReport,
    BandPowers, Spectrogram,
};
pub use simulation::{generate, EegSimulator};
pub use sonification::{
    multiband_synthesis, tone_mapping, write_wav, ExportError, SonificationMethod, Sonifier,
};
