//! Plethysm Core - IIR filter primitives for biosignal preprocessing
//!
//! This crate provides the filtering building blocks used by
//! `plethysm-analysis`, kept free of `std` so they can also run on the
//! acquisition side of a sensor pipeline.
//!
//! # Filters
//!
//! - [`Biquad`] - Second-order IIR section (Direct Form I, `f64`)
//! - [`BiquadCoefficients`] - Normalized `[b0, b1, b2, 1, a1, a2]` section
//! - [`SosCascade`] - Cascade of sections with zero-phase [`SosCascade::filtfilt`]
//!
//! ## Design helpers
//!
//! - [`lowpass_coefficients`], [`highpass_coefficients`] - RBJ cookbook formulas
//! - [`butterworth_q`] - Per-section Q of a Butterworth cascade
//!
//! # no_std Support
//!
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! plethysm-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use plethysm_core::SosCascade;
//!
//! // 4th-order Butterworth band-pass, 0.5-7 Hz at 50 Hz
//! let bandpass = SosCascade::butterworth_highpass(4, 0.5, 50.0)
//!     .then(SosCascade::butterworth_lowpass(4, 7.0, 50.0));
//!
//! let signal = vec![0.0; 500];
//! let filtered = bandpass.filtfilt(&signal);
//! assert_eq!(filtered.len(), signal.len());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod sos;

// Re-export main types at crate root
pub use biquad::{
    Biquad, BiquadCoefficients, butterworth_q, highpass_coefficients, lowpass_coefficients,
};
pub use sos::SosCascade;
