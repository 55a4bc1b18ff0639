//! Power spectral density estimation (Welch's method).
//!
//! The signal is split into overlapping windowed segments, each segment's
//! periodogram is computed, and the periodograms are averaged. Averaging trades
//! frequency resolution for a lower-variance estimate, which is what a heart-rate
//! peak search on a noisy optical signal needs.
//!
//! Density scaling is one-sided: `|X[k]|² / (fs · Σw²)`, doubled for every bin
//! except DC and (for even segment lengths) Nyquist, so integrating the result
//! over `[0, fs/2]` gives the signal variance.
//!
//! Reference: P. D. Welch, "The use of fast Fourier transform for the estimation
//! of power spectra", *IEEE Trans. Audio Electroacoustics* 15(2), 1967.

use crate::buffer::SampleBuffer;
use crate::error::{AnalysisError, Result};
use crate::fft::{Fft, Window};

/// Smallest usable segment length.
pub const MIN_SEGMENT_LEN: usize = 8;

/// Signals shorter than this are analysed as a single segment.
const SHORT_SIGNAL_LEN: usize = 16;

/// A one-sided power spectral density.
///
/// Frequencies are non-negative and non-decreasing; `psd[i]` is the
/// density at `frequencies[i]` in units²/Hz.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spectrum {
    frequencies: Vec<f64>,
    psd: Vec<f64>,
}

impl Spectrum {
    /// Creates a spectrum from matching frequency and density sequences.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::MalformedSpectrum`] if the lengths differ, a
    /// frequency is negative or non-finite, the frequencies decrease, or a
    /// density is negative.
    pub fn new(frequencies: Vec<f64>, psd: Vec<f64>) -> Result<Self> {
        if frequencies.len() != psd.len() {
            return Err(AnalysisError::MalformedSpectrum(
                "frequency and density lengths differ",
            ));
        }
        if frequencies.iter().any(|f| !f.is_finite() || *f < 0.0) {
            return Err(AnalysisError::MalformedSpectrum(
                "frequencies must be finite and non-negative",
            ));
        }
        if frequencies.windows(2).any(|w| w[1] < w[0]) {
            return Err(AnalysisError::MalformedSpectrum(
                "frequencies must be non-decreasing",
            ));
        }
        if psd.iter().any(|p| *p < 0.0) {
            return Err(AnalysisError::MalformedSpectrum(
                "densities must be non-negative",
            ));
        }
        Ok(Self { frequencies, psd })
    }

    pub(crate) fn from_parts(frequencies: Vec<f64>, psd: Vec<f64>) -> Self {
        debug_assert_eq!(frequencies.len(), psd.len());
        Self { frequencies, psd }
    }

    /// Bin frequencies in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Power spectral density per bin.
    pub fn psd(&self) -> &[f64] {
        &self.psd
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Returns true if the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Spacing of the first two bins, or 0.0 with fewer than two bins.
    pub fn bin_width(&self) -> f64 {
        match self.frequencies.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    /// `(frequency, density)` pairs in increasing frequency.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.psd.iter().copied())
    }
}

/// Welch estimator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WelchConfig {
    /// Upper bound on samples per segment
    pub max_segment_len: usize,
    /// Fraction of each segment shared with the next, in `[0, 1)`
    pub overlap: f64,
    /// Window applied to every segment
    pub window: Window,
}

impl Default for WelchConfig {
    fn default() -> Self {
        Self {
            max_segment_len: 1024,
            overlap: 0.5,
            window: Window::Hann,
        }
    }
}

impl WelchConfig {
    /// Checks the field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_segment_len < MIN_SEGMENT_LEN {
            return Err(AnalysisError::InvalidConfig {
                field: "welch.max_segment_len",
                reason: format!("must be at least {MIN_SEGMENT_LEN}"),
            });
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(AnalysisError::InvalidConfig {
                field: "welch.overlap",
                reason: "must be in [0, 1)".to_string(),
            });
        }
        Ok(())
    }

    /// Samples shared by consecutive segments of length `segment_len`.
    pub fn overlap_len(&self, segment_len: usize) -> usize {
        let overlap = (segment_len as f64 * self.overlap) as usize;
        overlap.min(segment_len.saturating_sub(1))
    }
}

/// Segment length used for a signal of `num_samples`.
///
/// `min(max_segment_len, num_samples)`, except that signals shorter than 16
/// samples use their full length.
pub fn segment_len(num_samples: usize, max_segment_len: usize) -> usize {
    if num_samples >= SHORT_SIGNAL_LEN {
        num_samples.min(max_segment_len)
    } else {
        num_samples
    }
}

/// Estimates the one-sided PSD of `buffer` with Welch's method.
///
/// The buffer mean is removed first, and each segment has its own mean
/// removed before windowing. Only full segments are averaged.
///
/// # Errors
///
/// [`AnalysisError::InsufficientSamples`] if the segment length is below
/// [`MIN_SEGMENT_LEN`]; [`AnalysisError::InvalidConfig`] for a bad config.
pub fn welch_psd(buffer: &SampleBuffer, config: &WelchConfig) -> Result<Spectrum> {
    config.validate()?;

    let fs = buffer.sample_rate();
    let nperseg = segment_len(buffer.len(), config.max_segment_len);
    if nperseg < MIN_SEGMENT_LEN {
        return Err(AnalysisError::InsufficientSamples {
            required: MIN_SEGMENT_LEN,
            available: nperseg,
        });
    }

    let centered = buffer.mean_removed();
    let signal = centered.samples();

    let hop = nperseg - config.overlap_len(nperseg);
    let window = config.window.coefficients(nperseg);
    let win_norm: f64 = window.iter().map(|w| w * w).sum();
    let fft = Fft::new(nperseg);

    let num_bins = nperseg / 2 + 1;
    let mut accum = vec![0.0f64; num_bins];
    let mut segment = vec![0.0f64; nperseg];
    let mut count = 0usize;

    for start in (0..=signal.len() - nperseg).step_by(hop) {
        let chunk = &signal[start..start + nperseg];
        let mean = chunk.iter().sum::<f64>() / nperseg as f64;
        for ((s, &x), &w) in segment.iter_mut().zip(chunk).zip(&window) {
            *s = (x - mean) * w;
        }

        let bins = fft.forward(&segment);
        for (k, (acc, bin)) in accum.iter_mut().zip(&bins).enumerate() {
            let mut density = bin.norm_sqr() / (fs * win_norm);
            if k != 0 && !(nperseg.is_multiple_of(2) && k == nperseg / 2) {
                density *= 2.0;
            }
            *acc += density;
        }
        count += 1;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(nperseg, hop, segments = count, "welch estimate");

    let scale = 1.0 / count as f64;
    let psd = accum.into_iter().map(|p| p * scale).collect();
    let frequencies = (0..num_bins)
        .map(|k| k as f64 * fs / nperseg as f64)
        .collect();

    Ok(Spectrum::from_parts(frequencies, psd))
}
