//! Running-median baseline removal.

use crate::buffer::SampleBuffer;
use crate::error::{AnalysisError, Result};

/// Window length in samples for `window_secs` at `sample_rate`.
///
/// Rounded to the nearest sample and forced odd, at least 1.
pub fn median_window_len(window_secs: f64, sample_rate: f64) -> usize {
    let len = (window_secs * sample_rate).round().max(1.0) as usize;
    if len.is_multiple_of(2) { len + 1 } else { len }
}

/// Subtracts a running median of `window_secs` from every sample.
///
/// The window is centered; samples beyond either end are taken as copies of
/// the nearest end sample.
///
/// # Errors
///
/// [`AnalysisError::InvalidConfig`] if `window_secs` is not a finite
/// positive number.
pub fn median_detrend(buffer: &SampleBuffer, window_secs: f64) -> Result<SampleBuffer> {
    if !window_secs.is_finite() || window_secs <= 0.0 {
        return Err(AnalysisError::InvalidConfig {
            field: "detrend_window_secs",
            reason: format!("must be a positive number of seconds, got {window_secs}"),
        });
    }

    let samples = buffer.samples();
    let n = samples.len();
    if n == 0 {
        return Ok(buffer.clone());
    }

    // Past 4n + 1 samples the added edge copies no longer move any median.
    let len = median_window_len(window_secs, buffer.sample_rate()).min(4 * n + 1);
    let half = len / 2;
    let mut window = vec![0.0f64; len];

    let detrended = (0..n)
        .map(|i| {
            for (j, slot) in window.iter_mut().enumerate() {
                let idx = (i + j).saturating_sub(half).min(n - 1);
                *slot = samples[idx];
            }
            window.sort_unstable_by(f64::total_cmp);
            samples[i] - window[half]
        })
        .collect();

    Ok(SampleBuffer::from_parts(detrended, buffer.sample_rate()))
}
