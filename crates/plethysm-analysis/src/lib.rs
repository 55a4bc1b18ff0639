//! Plethysm Analysis - Spectral signal quality scoring for PPG waveforms
//!
//! This crate turns a raw photoplethysmography (PPG) trace into a quality
//! score in `[0, 1]` and a dominant heart-rate frequency:
//!
//! - [`resample`] - Rational polyphase resampling to the analysis rate
//! - [`filter`] - Zero-phase Butterworth bandpass
//! - [`detrend`] - Optional running-median baseline removal
//! - [`spectrum`] - Welch power spectral density
//! - [`peak`] - Heart-rate peak search
//! - [`bandpower`] - Trapezoidal band power
//! - [`sqi`] - The scoring pipeline
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`band`] - Frequency band type and the standard PPG bands
//!
//! Every stage is a pure function of its input buffer and configuration, so
//! one [`SqiScorer`] can be shared between threads.
//!
//! ## Example
//!
//! ```rust
//! use plethysm_analysis::{SampleBuffer, SqiConfig, SqiScorer};
//!
//! let fs = 128.0;
//! let samples: Vec<f64> = (0..1280)
//!     .map(|i| 512.0 + 40.0 * (2.0 * std::f64::consts::PI * 1.25 * i as f64 / fs).sin())
//!     .collect();
//!
//! let scorer = SqiScorer::new(SqiConfig::default()).unwrap();
//! let buffer = SampleBuffer::new(samples, fs).unwrap();
//! let result = scorer.score(&buffer).unwrap();
//!
//! assert!(result.sqi > 0.8);
//! println!("SQI {:.3} at {:.1} bpm", result.sqi, result.heart_rate_bpm());
//! ```
//!
//! ## Features
//!
//! - `serde` - `Serialize`/`Deserialize` for configuration and result types
//! - `tracing` - debug/trace events from the pipeline stages

pub mod band;
pub mod bandpower;
pub mod buffer;
pub mod detrend;
pub mod error;
pub mod fft;
pub mod filter;
pub mod peak;
pub mod resample;
pub mod spectrum;
pub mod sqi;

pub use band::{Band, ppg_bands};
pub use bandpower::band_power;
pub use buffer::SampleBuffer;
pub use error::{AnalysisError, Result};
pub use fft::Window;
pub use filter::{ZeroPhaseBandpass, bandpass_zero_phase};
pub use peak::{SpectralPeak, find_peak};
pub use resample::resample;
pub use spectrum::{Spectrum, WelchConfig, welch_psd};
pub use sqi::{
    HarmonicConfig, SqiAnalysis, SqiConfig, SqiResult, SqiScorer, SqiStatus, compute_sqi,
};
