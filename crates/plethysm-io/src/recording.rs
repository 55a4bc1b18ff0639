//! PPG sensor CSV logs.
//!
//! The logger writes one header row and then one row per sample:
//!
//! ```text
//! PC_Timestamp_ms,PC_DateTime,Arduino_millis,Signal_Value,Package_Num
//! ```
//!
//! Only the signal column is read back, selected by index so that renamed
//! headers still load.

use std::path::{Path, PathBuf};

use plethysm_analysis::{AnalysisError, SampleBuffer};

use crate::{IoError, Result};

/// Header row written by [`write_ppg_csv`].
pub const LOG_COLUMNS: [&str; 5] = [
    "PC_Timestamp_ms",
    "PC_DateTime",
    "Arduino_millis",
    "Signal_Value",
    "Package_Num",
];

/// Samples read from one PPG log.
#[derive(Debug, Clone, PartialEq)]
pub struct PpgRecording {
    /// File the samples came from
    pub path: PathBuf,
    /// Cleaned signal values: integral, positive, in file order
    pub samples: Vec<f64>,
}

impl PpgRecording {
    /// Base name of the log file, as written in reports.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Wraps the samples in a buffer at the logger's nominal rate.
    pub fn to_buffer(&self, sample_rate: f64) -> std::result::Result<SampleBuffer, AnalysisError> {
        SampleBuffer::new(self.samples.clone(), sample_rate)
    }
}

/// Cleans one signal cell: truncate toward zero, take the magnitude, drop zeros.
fn clean_value(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let value = value.trunc().abs();
    (value != 0.0).then_some(value)
}

/// Reads the signal column of a PPG log.
///
/// The first record is the header and must have a column at `signal_column`.
/// Quoted fields may contain commas. In data rows, missing, empty or
/// unparsable cells are skipped; values are truncated toward zero, made
/// positive, and zeros are dropped.
///
/// # Errors
///
/// [`IoError::Read`] if the file cannot be read, [`IoError::Parse`] if it has
/// no header row or a malformed record, [`IoError::MissingColumn`] if the
/// header is too narrow.
pub fn read_ppg_csv(path: impl AsRef<Path>, signal_column: usize) -> Result<PpgRecording> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| IoError::read(path, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    if text.trim().is_empty() {
        return Err(IoError::Parse {
            path: path.to_path_buf(),
            line: 1,
            reason: "missing header row".to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let available = reader
        .headers()
        .map_err(|e| IoError::parse(path, &e))?
        .len();
    if signal_column >= available {
        return Err(IoError::MissingColumn {
            path: path.to_path_buf(),
            column: signal_column,
            available,
        });
    }

    let mut rows = 0usize;
    let mut samples = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::parse(path, &e))?;
        rows += 1;
        if let Some(value) = record.get(signal_column).and_then(clean_value) {
            samples.push(value);
        }
    }

    tracing::debug!(
        path = %path.display(),
        rows,
        kept = samples.len(),
        "read PPG log"
    );

    Ok(PpgRecording {
        path: path.to_path_buf(),
        samples,
    })
}

/// Elapsed time as `HH:MM:SS.mmm`.
fn clock(elapsed_ms: u64) -> String {
    let (secs, ms) = (elapsed_ms / 1000, elapsed_ms % 1000);
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        secs / 60 % 60,
        secs % 60,
        ms
    )
}

/// Writes `buffer` as a PPG log.
///
/// Timestamps start at zero and follow the buffer's sample rate; signal
/// values are rounded to the nearest integer as the sensor's ADC reports them.
/// Parent directories are created as needed.
///
/// # Errors
///
/// [`IoError::Write`] if the file or its directory cannot be created.
pub fn write_ppg_csv(path: impl AsRef<Path>, buffer: &SampleBuffer) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IoError::write(parent, e))?;
    }

    let fail = |e: csv::Error| IoError::write(path, e.into());
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(fail)?;
    writer.write_record(LOG_COLUMNS).map_err(fail)?;

    let fs = buffer.sample_rate();
    for (i, value) in buffer.samples().iter().enumerate() {
        let ms = (i as f64 * 1000.0 / fs).round() as u64;
        writer
            .write_record([
                ms.to_string(),
                clock(ms),
                ms.to_string(),
                format!("{:.0}", value.round()),
                i.to_string(),
            ])
            .map_err(fail)?;
    }
    writer.flush().map_err(|e| IoError::write(path, e))?;

    tracing::info!(path = %path.display(), samples = buffer.len(), "wrote PPG log");
    Ok(())
}
