//! Error types for the analysis pipeline.
//!
//! Only malformed input or configuration is reported here. Degenerate but
//! well-formed signals (too short, no spectral content in the heart-rate
//! band, zero power) are scored as 0 and reported through
//! [`SqiStatus`](crate::sqi::SqiStatus) instead.

use thiserror::Error;

/// Errors that can occur while preparing or running an analysis.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// A sampling rate was zero, negative, or not finite.
    #[error("invalid sample rate {rate} Hz: must be finite and greater than zero")]
    InvalidRate {
        /// The rejected rate in Hz.
        rate: f64,
    },

    /// The ratio between two rates cannot be expressed with the resampler's
    /// bounded denominator.
    #[error("cannot resample from {fs_in} Hz to {fs_out} Hz: ratio out of range")]
    UnsupportedRatio {
        /// Source rate in Hz.
        fs_in: f64,
        /// Target rate in Hz.
        fs_out: f64,
    },

    /// A buffer was handed to a filter designed for another rate.
    #[error("sample rate mismatch: filter designed for {expected} Hz, buffer is {actual} Hz")]
    RateMismatch {
        /// Rate the filter was designed for.
        expected: f64,
        /// Rate of the offending buffer.
        actual: f64,
    },

    /// A frequency band had non-finite, negative, or inverted edges.
    #[error("invalid band [{low_hz}, {high_hz}] Hz: {reason}")]
    InvalidBand {
        /// Lower edge in Hz.
        low_hz: f64,
        /// Upper edge in Hz.
        high_hz: f64,
        /// Why the band was rejected.
        reason: &'static str,
    },

    /// Bandpass order must be even and at least 2.
    #[error("invalid filter order {order}: must be even and at least 2")]
    InvalidFilterOrder {
        /// The rejected order.
        order: usize,
    },

    /// A sample was NaN or infinite.
    #[error("non-finite sample at index {index}")]
    NonFiniteSample {
        /// Position of the first offending sample.
        index: usize,
    },

    /// Too few samples for a meaningful spectral estimate.
    #[error("insufficient samples: need at least {required}, got {available}")]
    InsufficientSamples {
        /// Minimum number of samples per segment.
        required: usize,
        /// Samples actually available.
        available: usize,
    },

    /// Frequency and magnitude sequences violate the spectrum invariants.
    #[error("malformed spectrum: {0}")]
    MalformedSpectrum(&'static str),

    /// A configuration field is out of its valid range.
    #[error("invalid configuration field '{field}': {reason}")]
    InvalidConfig {
        /// Name of the field.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Checks that `rate` is a usable sampling rate.
pub(crate) fn check_rate(rate: f64) -> Result<f64> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(AnalysisError::InvalidRate { rate })
    }
}
