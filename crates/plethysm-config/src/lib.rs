//! Settings file for plethysm PPG quality scoring.
//!
//! One TOML file configures where recordings are found, how the scoring
//! pipeline runs, and where reports go. Every field has a default, so an
//! empty file is a valid configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! use plethysm_config::Settings;
//!
//! // Load and validate
//! let mut settings = Settings::load("plethysm.toml").unwrap();
//!
//! // Enable the second-harmonic term and save back
//! settings.sqi.harmonic = Some(Default::default());
//! settings.save("plethysm.toml").unwrap();
//! ```

mod error;
mod settings;

pub use error::{ConfigError, Result};
pub use settings::{InputSettings, ReportSettings, Settings};
