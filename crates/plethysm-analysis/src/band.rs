//! Frequency bands.
//!
//! # Example
//!
//! ```rust
//! use plethysm_analysis::band::{Band, ppg_bands};
//!
//! let window = Band::around(1.2, 0.2).intersect(&ppg_bands::HEART_RATE);
//! assert!(window.is_some());
//! ```

use crate::error::{AnalysisError, Result};

/// A closed frequency interval `[low_hz, high_hz]`.
///
/// Valid bands have finite, non-negative edges with `low_hz <= high_hz`.
/// [`Band::new`] enforces this; bands read from configuration files are
/// checked with [`Band::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Band {
    /// Lower edge in Hz
    pub low_hz: f64,
    /// Upper edge in Hz
    pub high_hz: f64,
}

impl Band {
    /// Creates a validated band.
    pub fn new(low_hz: f64, high_hz: f64) -> Result<Self> {
        let band = Self { low_hz, high_hz };
        band.validate()?;
        Ok(band)
    }

    /// Creates a band without validation, for constants.
    pub const fn from_edges(low_hz: f64, high_hz: f64) -> Self {
        Self { low_hz, high_hz }
    }

    /// A band of half-width `half_width_hz` around `center_hz`.
    ///
    /// The lower edge is floored at 0 Hz.
    pub fn around(center_hz: f64, half_width_hz: f64) -> Self {
        Self {
            low_hz: (center_hz - half_width_hz).max(0.0),
            high_hz: center_hz + half_width_hz,
        }
    }

    /// Checks the band invariants.
    pub fn validate(&self) -> Result<()> {
        let reason = if !self.low_hz.is_finite() || !self.high_hz.is_finite() {
            Some("edges must be finite")
        } else if self.low_hz < 0.0 {
            Some("edges must be non-negative")
        } else if self.low_hz > self.high_hz {
            Some("lower edge exceeds upper edge")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AnalysisError::InvalidBand {
                low_hz: self.low_hz,
                high_hz: self.high_hz,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Returns true if `frequency_hz` lies inside the closed interval.
    #[inline]
    pub fn contains(&self, frequency_hz: f64) -> bool {
        frequency_hz >= self.low_hz && frequency_hz <= self.high_hz
    }

    /// Width in Hz.
    pub fn width(&self) -> f64 {
        self.high_hz - self.low_hz
    }

    /// Center frequency in Hz.
    pub fn center_hz(&self) -> f64 {
        (self.low_hz + self.high_hz) / 2.0
    }

    /// Overlap of two bands, or `None` if they do not touch.
    pub fn intersect(&self, other: &Band) -> Option<Band> {
        let low_hz = self.low_hz.max(other.low_hz);
        let high_hz = self.high_hz.min(other.high_hz);
        (low_hz <= high_hz).then_some(Band { low_hz, high_hz })
    }
}

/// Standard bands for PPG quality scoring.
pub mod ppg_bands {
    use super::Band;

    /// Preprocessing bandpass (0.5-7 Hz): removes baseline wander and high-frequency spikes
    pub const BANDPASS: Band = Band::from_edges(0.5, 7.0);

    /// Heart-rate search band (0.8-7 Hz), 48-420 beats per minute
    pub const HEART_RATE: Band = Band::from_edges(0.8, 7.0);

    /// Total-power integration band (0-10 Hz)
    pub const TOTAL: Band = Band::from_edges(0.0, 10.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_inverted() {
        assert!(matches!(
            Band::new(3.0, 1.0),
            Err(AnalysisError::InvalidBand { reason: "lower edge exceeds upper edge", .. })
        ));
    }

    #[test]
    fn new_rejects_negative_and_nan() {
        assert!(Band::new(-0.1, 1.0).is_err());
        assert!(Band::new(0.0, f64::NAN).is_err());
        assert!(Band::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn degenerate_point_band_is_valid() {
        let band = Band::new(2.0, 2.0).unwrap();
        assert_eq!(band.width(), 0.0);
        assert!(band.contains(2.0));
    }

    #[test]
    fn contains_is_closed() {
        let band = ppg_bands::HEART_RATE;
        assert!(band.contains(0.8));
        assert!(band.contains(7.0));
        assert!(!band.contains(0.79));
        assert!(!band.contains(7.01));
    }

    #[test]
    fn around_floors_at_zero() {
        let band = Band::around(0.1, 0.3);
        assert_eq!(band.low_hz, 0.0);
        assert!((band.high_hz - 0.4).abs() < 1e-12);
    }

    #[test]
    fn intersect_overlapping_and_disjoint() {
        let hr = ppg_bands::HEART_RATE;
        let window = Band::around(0.9, 0.2).intersect(&hr).unwrap();
        assert_eq!(window.low_hz, 0.8);
        assert!((window.high_hz - 1.1).abs() < 1e-12);

        assert!(Band::around(12.0, 0.3).intersect(&ppg_bands::TOTAL).is_none());
    }

    #[test]
    fn standard_bands_are_valid() {
        for band in [ppg_bands::BANDPASS, ppg_bands::HEART_RATE, ppg_bands::TOTAL] {
            band.validate().unwrap();
        }
    }
}
