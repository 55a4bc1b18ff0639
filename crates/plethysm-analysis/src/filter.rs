//! Zero-phase Butterworth bandpass.
//!
//! The bandpass is a Butterworth high-pass at the lower edge cascaded with a
//! Butterworth low-pass at the upper edge, each of the requested order and
//! kept as second-order sections. It is applied forward and backward
//! ([`SosCascade::filtfilt`]) so the waveform is not shifted in time.
//!
//! # Example
//!
//! ```rust
//! use plethysm_analysis::SampleBuffer;
//! use plethysm_analysis::band::ppg_bands;
//! use plethysm_analysis::filter::bandpass_zero_phase;
//!
//! let buffer = SampleBuffer::new(vec![1.0; 500], 50.0).unwrap();
//! let filtered = bandpass_zero_phase(&buffer, &ppg_bands::BANDPASS, 4).unwrap();
//! assert_eq!(filtered.len(), buffer.len());
//! ```

use plethysm_core::SosCascade;

use crate::band::Band;
use crate::buffer::SampleBuffer;
use crate::error::{AnalysisError, Result, check_rate};

/// Default bandpass order.
pub const DEFAULT_FILTER_ORDER: usize = 4;

/// Band edges are clamped to this open interval after normalizing by Nyquist.
const EDGE_MIN: f64 = 0.001;
const EDGE_MAX: f64 = 0.999;

/// Band edges normalized by Nyquist and clamped to `(0.001, 0.999)`.
pub fn normalized_edges(band: &Band, sample_rate: f64) -> (f64, f64) {
    let nyquist = sample_rate / 2.0;
    (
        (band.low_hz / nyquist).clamp(EDGE_MIN, EDGE_MAX),
        (band.high_hz / nyquist).clamp(EDGE_MIN, EDGE_MAX),
    )
}

fn check_order(order: usize) -> Result<usize> {
    if order >= 2 && order.is_multiple_of(2) {
        Ok(order)
    } else {
        Err(AnalysisError::InvalidFilterOrder { order })
    }
}

/// A bandpass filter designed for one sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroPhaseBandpass {
    cascade: SosCascade,
    sample_rate: f64,
    order: usize,
}

impl ZeroPhaseBandpass {
    /// Designs the filter.
    ///
    /// Returns `Ok(None)` when the clamped edges leave no passband
    /// (`high <= low`); callers then pass the signal through unfiltered.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidRate`], [`AnalysisError::InvalidBand`] or
    /// [`AnalysisError::InvalidFilterOrder`].
    pub fn design(sample_rate: f64, band: &Band, order: usize) -> Result<Option<Self>> {
        check_rate(sample_rate)?;
        band.validate()?;
        check_order(order)?;

        let (lo, hi) = normalized_edges(band, sample_rate);
        if hi <= lo {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                low_hz = band.low_hz,
                high_hz = band.high_hz,
                sample_rate,
                "degenerate bandpass after clamping, filter skipped"
            );
            return Ok(None);
        }

        let nyquist = sample_rate / 2.0;
        let cascade = SosCascade::butterworth_highpass(order, lo * nyquist, sample_rate)
            .then(SosCascade::butterworth_lowpass(order, hi * nyquist, sample_rate));

        Ok(Some(Self {
            cascade,
            sample_rate,
            order,
        }))
    }

    /// Rate the filter was designed for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Order of each of the high-pass and low-pass halves.
    pub fn order(&self) -> usize {
        self.order
    }

    /// The underlying section cascade.
    pub fn cascade(&self) -> &SosCascade {
        &self.cascade
    }

    /// Filters `buffer` forward and backward.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::RateMismatch`] if the buffer is at another rate.
    pub fn apply(&self, buffer: &SampleBuffer) -> Result<SampleBuffer> {
        if (buffer.sample_rate() - self.sample_rate).abs() > f64::EPSILON * self.sample_rate {
            return Err(AnalysisError::RateMismatch {
                expected: self.sample_rate,
                actual: buffer.sample_rate(),
            });
        }
        let samples = self.cascade.filtfilt(buffer.samples());
        Ok(SampleBuffer::from_parts(samples, self.sample_rate))
    }
}

/// Designs and applies a zero-phase bandpass in one step.
///
/// A band that is empty after clamping returns a copy of the input.
pub fn bandpass_zero_phase(buffer: &SampleBuffer, band: &Band, order: usize) -> Result<SampleBuffer> {
    match ZeroPhaseBandpass::design(buffer.sample_rate(), band, order)? {
        Some(filter) => filter.apply(buffer),
        None => Ok(buffer.clone()),
    }
}
