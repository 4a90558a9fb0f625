//! Synthetic EEG generation
//!
//! - [`generator`]: Band-limited background rhythms per brain state
//! - [`transients`]: Vertex waves, sawtooth bursts and spike-wave discharges

pub mod generator;
pub mod transients;

pub use generator::{background_rhythms, generate, EegSimulator, Rhythm};
