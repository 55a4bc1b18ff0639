//! SQI report files.
//!
//! A report is a small CSV with one row per scored channel and a closing
//! `AVG_ALL` row holding the column means. It is written UTF-8 with a byte
//! order mark so spreadsheet tools pick the right encoding.

use std::path::Path;

use plethysm_analysis::SqiResult;

use crate::{IoError, Result};

/// Header row of every report.
pub const REPORT_COLUMNS: [&str; 4] = ["file", "ch", "SQI_final", "HR_peak_Hz"];

/// Channel label of the summary row.
pub const AVERAGE_CHANNEL: &str = "AVG_ALL";

const BOM: &str = "\u{feff}";

/// One scored channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Base name of the recording file
    pub file: String,
    /// Channel index within the recording
    pub channel: usize,
    /// Signal quality index in `[0, 1]`
    pub sqi: f64,
    /// Dominant heart-rate frequency in Hz
    pub hr_peak_hz: f64,
}

impl ReportRow {
    /// Row for `result` on `channel` of `file`.
    pub fn new(file: impl Into<String>, channel: usize, result: &SqiResult) -> Self {
        Self {
            file: file.into(),
            channel,
            sqi: result.sqi,
            hr_peak_hz: result.hr_peak_hz,
        }
    }
}

fn write_row<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    file: &str,
    channel: &str,
    sqi: f64,
    hr_peak_hz: f64,
) -> csv::Result<()> {
    let sqi = format!("{sqi:?}");
    let hr_peak_hz = format!("{hr_peak_hz:?}");
    writer.write_record([file, channel, sqi.as_str(), hr_peak_hz.as_str()])
}

/// Renders a report, including the `AVG_ALL` row when `rows` is non-empty.
pub(crate) fn render(rows: &[ReportRow]) -> std::io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(BOM.as_bytes().to_vec());
    writer.write_record(REPORT_COLUMNS)?;
    for row in rows {
        write_row(&mut writer, &row.file, &row.channel.to_string(), row.sqi, row.hr_peak_hz)?;
    }

    if let Some(last) = rows.last() {
        let n = rows.len() as f64;
        let sqi = rows.iter().map(|r| r.sqi).sum::<f64>() / n;
        let hr = rows.iter().map(|r| r.hr_peak_hz).sum::<f64>() / n;
        write_row(&mut writer, &last.file, AVERAGE_CHANNEL, sqi, hr)?;
    }
    writer.into_inner().map_err(|e| e.into_error())
}

/// Writes a report to `path`, creating parent directories as needed.
///
/// # Errors
///
/// [`IoError::Write`] if the directory or file cannot be created.
pub fn write_report(path: impl AsRef<Path>, rows: &[ReportRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IoError::write(parent, e))?;
    }
    let bytes = render(rows).map_err(|e| IoError::write(path, e))?;
    std::fs::write(path, bytes).map_err(|e| IoError::write(path, e))?;
    tracing::info!(path = %path.display(), rows = rows.len(), "saved SQI report");
    Ok(())
}
