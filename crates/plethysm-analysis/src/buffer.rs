//! Sampled signal container.

use crate::error::{AnalysisError, Result, check_rate};

/// An immutable run of real-valued samples at a known sampling rate.
///
/// Every pipeline stage takes a `&SampleBuffer` and returns a new one, so a
/// buffer handed to the scorer is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl SampleBuffer {
    /// Creates a buffer, validating the rate and every sample.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidRate`] for a non-positive or non-finite rate,
    /// [`AnalysisError::NonFiniteSample`] for the first NaN or infinite sample.
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        check_rate(sample_rate)?;
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::NonFiniteSample { index });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Builds a buffer from stage output without re-validating.
    pub(crate) fn from_parts(samples: Vec<f64>, sample_rate: f64) -> Self {
        debug_assert!(sample_rate > 0.0);
        Self {
            samples,
            sample_rate,
        }
    }

    /// The samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sampling rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Nyquist frequency in Hz.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Arithmetic mean, or 0.0 for an empty buffer.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().sum::<f64>() / self.samples.len() as f64
        }
    }

    /// Returns a copy with the mean subtracted from every sample.
    pub fn mean_removed(&self) -> SampleBuffer {
        let mean = self.mean();
        Self::from_parts(
            self.samples.iter().map(|s| s - mean).collect(),
            self.sample_rate,
        )
    }

    /// Largest absolute sample, or 0.0 for an empty buffer.
    pub fn peak_abs(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |acc, s| acc.max(s.abs()))
    }

    /// Returns a copy scaled so the largest absolute sample is 1.
    ///
    /// An all-zero or empty buffer is returned unchanged.
    pub fn peak_normalized(&self) -> SampleBuffer {
        let peak = self.peak_abs();
        if peak == 0.0 {
            return self.clone();
        }
        Self::from_parts(
            self.samples.iter().map(|s| s / peak).collect(),
            self.sample_rate,
        )
    }

    /// Consumes the buffer, returning the samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_rate() {
        assert!(matches!(
            SampleBuffer::new(vec![1.0], 0.0),
            Err(AnalysisError::InvalidRate { .. })
        ));
        assert!(matches!(
            SampleBuffer::new(vec![1.0], -50.0),
            Err(AnalysisError::InvalidRate { .. })
        ));
    }

    #[test]
    fn new_rejects_nan() {
        let err = SampleBuffer::new(vec![1.0, 2.0, f64::NAN], 50.0).unwrap_err();
        assert_eq!(err, AnalysisError::NonFiniteSample { index: 2 });
    }

    #[test]
    fn duration_and_mean() {
        let buffer = SampleBuffer::new(vec![1.0, 2.0, 3.0, 4.0], 2.0).unwrap();
        assert_eq!(buffer.duration_secs(), 2.0);
        assert_eq!(buffer.mean(), 2.5);
        assert_eq!(buffer.nyquist(), 1.0);
    }

    #[test]
    fn mean_removed_is_centered() {
        let buffer = SampleBuffer::new(vec![10.0, 12.0, 14.0], 50.0).unwrap();
        let centered = buffer.mean_removed();
        assert_eq!(centered.samples(), &[-2.0, 0.0, 2.0]);
        assert_eq!(centered.sample_rate(), 50.0);
    }

    #[test]
    fn empty_buffer_mean_is_zero() {
        let buffer = SampleBuffer::new(Vec::new(), 50.0).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.mean(), 0.0);
    }
}
