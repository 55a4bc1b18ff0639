//! File I/O for the plethysm PPG quality pipeline.
//!
//! This crate provides:
//!
//! - **PPG logs**: [`read_ppg_csv`] and [`write_ppg_csv`] for the sensor's CSV log format
//! - **Discovery**: [`find_recordings`] to collect every log under a data directory
//! - **Reports**: [`write_report`] for the per-recording `PPG_SQIs.csv` summary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plethysm_analysis::{SqiConfig, compute_sqi};
//! use plethysm_io::{ReportRow, find_recordings, read_ppg_csv, write_report};
//!
//! for path in find_recordings("./data/rawsignal", "pulse_data.csv")? {
//!     let recording = read_ppg_csv(&path, 3)?;
//!     let result = compute_sqi(&recording.samples, 50.0, &SqiConfig::default())?;
//!     let row = ReportRow::new(recording.file_name(), 0, &result);
//!     write_report("PPG_SQIs.csv", &[row])?;
//! }
//! ```

mod discover;
mod recording;
mod report;

use std::path::PathBuf;

pub use discover::find_recordings;
pub use recording::{LOG_COLUMNS, PpgRecording, read_ppg_csv, write_ppg_csv};
pub use report::{AVERAGE_CHANNEL, REPORT_COLUMNS, ReportRow, write_report};

/// Error types for PPG file I/O.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// A file or directory could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file or directory could not be written.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a usable CSV log.
    #[error("failed to parse '{path}' at line {line}: {reason}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// The header has no column at the requested index.
    #[error("'{path}' has {available} columns, signal column {column} is out of range")]
    MissingColumn {
        /// Path of the offending file.
        path: PathBuf,
        /// Requested zero-based column index.
        column: usize,
        /// Number of columns in the header.
        available: usize,
    },
}

impl IoError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, err: &csv::Error) -> Self {
        IoError::Parse {
            path: path.into(),
            line: err.position().map_or(0, |pos| pos.line() as usize),
            reason: err.to_string(),
        }
    }
}

/// Convenience result type for PPG file I/O.
pub type Result<T> = std::result::Result<T, IoError>;
