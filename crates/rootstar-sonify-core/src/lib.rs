//! Rootstar Sonify Core - shared types and utilities
//!
//! This crate provides the foundational types, error taxonomy and statistics
//! for the Rootstar EEG sonification pipeline. Host-side signal processing
//! lives in `rootstar-sonify-native`.
//!
//! # Modules
//!
//! - [`types`]: Signals, bands, brain states, analyzer outputs, audio buffers
//! - [`error`]: `InvalidParameter` / `DegenerateSignal` error taxonomy
//! - [`math`]: Statistics, finite differences and `linspace`
//!
//! # Example
//!
//! ```rust
//! use rootstar_sonify_core::types::{EegBand, EegSignal};
//!
//! let signal = EegSignal::new(vec![0.0, 1.0, 0.0, -1.0], 4.0).unwrap();
//! assert_eq!(signal.duration(), 1.0);
//!
//! let (low, high) = EegBand::Alpha.range_hz();
//! assert!(low < high);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod math;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ParseBrainStateError, SignalError, SignalResult};
pub use math::SignalStatistics;
pub use types::{
    AudioBuffer, BandDecomposition, BrainState, EegBand, EegSignal, HjorthParameters,
    SpectralEstimate, DEFAULT_AUDIO_SAMPLE_RATE,
};
