//! Error types for the Rootstar sonification pipeline
//!
//! Every failure is deterministic for a given input, so errors carry enough
//! context (which parameter, what bound) for the caller to correct the
//! request. Nothing in the pipeline retries.

use core::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Signal Errors
// ============================================================================

/// Errors raised by generation, analysis and sonification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalError {
    /// A parameter lies outside its valid domain
    InvalidParameter {
        /// Name of the offending parameter
        parameter: &'static str,
        /// The value that was supplied
        value: f64,
        /// Human-readable bound that was violated
        constraint: &'static str,
    },
    /// The signal has no variance, so a ratio-based metric is undefined
    DegenerateSignal {
        /// Metric that could not be computed
        metric: &'static str,
        /// Why it is undefined
        reason: &'static str,
    },
}

impl SignalError {
    /// Shorthand for an [`SignalError::InvalidParameter`].
    #[must_use]
    pub const fn invalid(parameter: &'static str, value: f64, constraint: &'static str) -> Self {
        Self::InvalidParameter { parameter, value, constraint }
    }

    /// Shorthand for a [`SignalError::DegenerateSignal`].
    #[must_use]
    pub const fn degenerate(metric: &'static str, reason: &'static str) -> Self {
        Self::DegenerateSignal { metric, reason }
    }

    /// Whether this error reports an out-of-domain parameter.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Whether this error reports a zero-variance input.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateSignal { .. })
    }
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { parameter, value, constraint } => {
                write!(f, "Invalid parameter `{parameter}` = {value}: expected {constraint}")
            }
            Self::DegenerateSignal { metric, reason } => {
                write!(f, "Degenerate signal: {metric} undefined ({reason})")
            }
        }
    }
}

impl std::error::Error for SignalError {}

/// Result alias used throughout the pipeline.
pub type SignalResult<T> = Result<T, SignalError>;

// ============================================================================
// Parsing
// ============================================================================

/// Returned when a brain state name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBrainStateError {
    /// The rejected input
    pub input: String,
}

impl fmt::Display for ParseBrainStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown brain state '{}': expected one of awake, n1, n3, rem, seizure",
            self.input
        )
    }
}

impl std::error::Error for ParseBrainStateError {}
