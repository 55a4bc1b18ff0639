//! Settings file format and operations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use plethysm_analysis::{AnalysisError, SqiConfig};

use crate::error::{ConfigError, Result};

/// Where recordings come from and how to read them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputSettings {
    /// Directory searched recursively by `plethysm batch`
    pub root_dir: PathBuf,
    /// File name every recording is saved under
    pub file_name: String,
    /// Nominal sampling rate of the recordings in Hz
    pub sample_rate_hz: f64,
    /// Zero-based index of the signal column in the CSV log
    pub signal_column: usize,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("./data/rawsignal"),
            file_name: "pulse_data.csv".to_string(),
            sample_rate_hz: 50.0,
            signal_column: 3,
        }
    }
}

/// Where SQI reports are written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// First directory level of every report
    pub output_dir: PathBuf,
    /// Report file name inside each per-recording folder
    pub file_name: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./data/ppg_reports"),
            file_name: "PPG_SQIs.csv".to_string(),
        }
    }
}

impl ReportSettings {
    /// Report path for a recording: `<output_dir>/<recording's folder name>/<file_name>`.
    ///
    /// A recording with no parent folder name reports directly into `output_dir`.
    pub fn path_for(&self, recording: &Path) -> PathBuf {
        let folder = recording
            .parent()
            .and_then(Path::file_name)
            .map(PathBuf::from)
            .unwrap_or_default();
        self.output_dir.join(folder).join(&self.file_name)
    }
}

/// Complete settings file.
///
/// # TOML Format
///
/// Every section and field is optional; missing values take their defaults.
///
/// ```toml
/// [input]
/// root_dir = "./data/rawsignal"
/// file_name = "pulse_data.csv"
/// sample_rate_hz = 50.0
/// signal_column = 3
///
/// [sqi]
/// target_rate_hz = 50.0
/// filter_order = 4
/// main_half_width_hz = 0.2
///
/// [sqi.hr_band]
/// low_hz = 0.8
/// high_hz = 7.0
///
/// [sqi.harmonic]
/// bandwidth_hz = 0.3
///
/// [report]
/// output_dir = "./data/ppg_reports"
/// file_name = "PPG_SQIs.csv"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Recording input
    pub input: InputSettings,
    /// Scoring pipeline
    pub sqi: SqiConfig,
    /// Report output
    pub report: ReportSettings,
}

impl Settings {
    /// Load settings from a TOML file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let settings = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from a TOML string and validate them.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(toml_str)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::info!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        let rate = self.input.sample_rate_hz;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(AnalysisError::InvalidRate { rate }.into());
        }
        if self.input.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                field: "input.file_name",
                reason: "must not be empty".to_string(),
            });
        }
        if self.report.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                field: "report.file_name",
                reason: "must not be empty".to_string(),
            });
        }
        self.sqi.validate()?;
        Ok(())
    }
}
