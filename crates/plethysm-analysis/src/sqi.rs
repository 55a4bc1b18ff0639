//! Spectral signal quality index.
//!
//! A clean pulse waveform concentrates its power in a narrow peak at the heart
//! rate. The score is the share of in-band power that sits within a small
//! window around the strongest heart-rate bin:
//!
//! ```text
//! sqi = P([f_hr - 0.2, f_hr + 0.2] ∩ hr_band) / P(total_band)
//! ```
//!
//! clamped to `[0, 1]`. Optionally the power around the second harmonic is
//! added to the numerator, which rewards the sharp systolic upstroke of a real
//! pulse over a pure sinusoid of the same frequency.
//!
//! # Pipeline
//!
//! 1. Scale to a unit peak, then resample to `target_rate_hz` (50 Hz).
//! 2. Zero-phase Butterworth bandpass (0.5-7 Hz, order 4).
//! 3. Optional running-median detrend.
//! 4. Welch PSD.
//! 5. Peak search in `hr_band`, then band-power ratio.
//!
//! Degenerate but well-formed inputs score 0 with a [`SqiStatus`] explaining
//! why; only malformed input or configuration returns an error.
//!
//! # Example
//!
//! ```rust
//! use plethysm_analysis::{SqiConfig, SqiStatus, compute_sqi};
//!
//! let fs = 50.0;
//! let samples: Vec<f64> = (0..500)
//!     .map(|i| (2.0 * std::f64::consts::PI * 1.2 * i as f64 / fs).sin())
//!     .collect();
//!
//! let result = compute_sqi(&samples, fs, &SqiConfig::default()).unwrap();
//! assert_eq!(result.status, SqiStatus::Scored);
//! assert!(result.sqi > 0.9);
//! assert!((result.hr_peak_hz - 1.2).abs() < 0.11);
//! ```

use crate::band::{Band, ppg_bands};
use crate::bandpower::band_power;
use crate::buffer::SampleBuffer;
use crate::detrend::median_detrend;
use crate::error::{AnalysisError, Result, check_rate};
use crate::filter::{DEFAULT_FILTER_ORDER, bandpass_zero_phase};
use crate::peak::find_peak;
use crate::resample::resample;
use crate::spectrum::{MIN_SEGMENT_LEN, Spectrum, WelchConfig, segment_len, welch_psd};

/// Second-harmonic contribution to the numerator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HarmonicConfig {
    /// Half-width of the window around `2 * f_hr`, in Hz
    pub bandwidth_hz: f64,
}

impl Default for HarmonicConfig {
    fn default() -> Self {
        Self { bandwidth_hz: 0.3 }
    }
}

/// Scoring configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SqiConfig {
    /// Rate every input is resampled to before analysis
    pub target_rate_hz: f64,
    /// Preprocessing bandpass
    pub bandpass: Band,
    /// Even order of each half of the bandpass
    pub filter_order: usize,
    /// Band searched for the heart-rate peak
    pub hr_band: Band,
    /// Denominator band
    pub total_band: Band,
    /// Half-width of the numerator window around the peak, in Hz
    pub main_half_width_hz: f64,
    /// Second-harmonic term, off when `None`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub harmonic: Option<HarmonicConfig>,
    /// Running-median detrend window in seconds, off when `None`
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub detrend_window_secs: Option<f64>,
    /// Spectral estimator settings
    pub welch: WelchConfig,
}

impl Default for SqiConfig {
    fn default() -> Self {
        Self {
            target_rate_hz: 50.0,
            bandpass: ppg_bands::BANDPASS,
            filter_order: DEFAULT_FILTER_ORDER,
            hr_band: ppg_bands::HEART_RATE,
            total_band: ppg_bands::TOTAL,
            main_half_width_hz: 0.2,
            harmonic: None,
            detrend_window_secs: None,
            welch: WelchConfig::default(),
        }
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig {
            field,
            reason: format!("must be finite and positive, got {value}"),
        })
    }
}

impl SqiConfig {
    /// Default configuration with the second-harmonic term enabled.
    pub fn with_harmonics() -> Self {
        Self {
            harmonic: Some(HarmonicConfig::default()),
            ..Self::default()
        }
    }

    /// Checks every field.
    pub fn validate(&self) -> Result<()> {
        check_rate(self.target_rate_hz)?;
        self.bandpass.validate()?;
        self.hr_band.validate()?;
        self.total_band.validate()?;
        if self.filter_order < 2 || !self.filter_order.is_multiple_of(2) {
            return Err(AnalysisError::InvalidFilterOrder {
                order: self.filter_order,
            });
        }
        check_positive("main_half_width_hz", self.main_half_width_hz)?;
        if let Some(harmonic) = &self.harmonic {
            check_positive("harmonic.bandwidth_hz", harmonic.bandwidth_hz)?;
        }
        if let Some(window_secs) = self.detrend_window_secs {
            check_positive("detrend_window_secs", window_secs)?;
        }
        self.welch.validate()
    }
}

/// How a score was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SqiStatus {
    /// Full pipeline ran and a ratio was computed
    Scored,
    /// Fewer than 8 samples per segment after resampling
    InsufficientSamples,
    /// No spectral bin inside the heart-rate band
    NoPeakFound,
    /// Total band power was zero
    ZeroPower,
}

impl SqiStatus {
    /// Short label for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SqiStatus::Scored => "scored",
            SqiStatus::InsufficientSamples => "insufficient_samples",
            SqiStatus::NoPeakFound => "no_peak_found",
            SqiStatus::ZeroPower => "zero_power",
        }
    }
}

impl std::fmt::Display for SqiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality score and dominant heart-rate frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SqiResult {
    /// Score in `[0, 1]`
    pub sqi: f64,
    /// Frequency of the heart-rate peak in Hz, 0.0 when none was found
    pub hr_peak_hz: f64,
    /// Outcome of the pipeline
    pub status: SqiStatus,
}

impl SqiResult {
    /// A zero score with the given status.
    pub fn zero(status: SqiStatus) -> Self {
        Self {
            sqi: 0.0,
            hr_peak_hz: 0.0,
            status,
        }
    }

    /// Heart rate in beats per minute.
    pub fn heart_rate_bpm(&self) -> f64 {
        self.hr_peak_hz * 60.0
    }
}

/// Intermediate artifacts of one scoring run, for plotting or inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct SqiAnalysis {
    /// Signal after peak normalization, resampling, filtering and detrending
    pub preprocessed: SampleBuffer,
    /// Welch estimate, absent when the signal was too short
    pub spectrum: Option<Spectrum>,
    /// The score
    pub result: SqiResult,
}

/// Scores buffers against a validated configuration.
///
/// Stateless between calls; share one scorer across threads freely.
#[derive(Debug, Clone, PartialEq)]
pub struct SqiScorer {
    config: SqiConfig,
}

impl SqiScorer {
    /// Validates `config` and builds a scorer.
    pub fn new(config: SqiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &SqiConfig {
        &self.config
    }

    /// Scores one buffer.
    pub fn score(&self, buffer: &SampleBuffer) -> Result<SqiResult> {
        self.analyze(buffer).map(|analysis| analysis.result)
    }

    /// Scores one buffer, keeping the intermediate signal and spectrum.
    pub fn analyze(&self, buffer: &SampleBuffer) -> Result<SqiAnalysis> {
        let config = &self.config;

        // Unit peak keeps squared magnitudes finite for any finite input.
        let resampled = resample(&buffer.peak_normalized(), config.target_rate_hz)?;
        let nperseg = segment_len(resampled.len(), config.welch.max_segment_len);
        if nperseg < MIN_SEGMENT_LEN {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                samples = resampled.len(),
                required = MIN_SEGMENT_LEN,
                "too few samples after resampling, scoring 0"
            );
            return Ok(SqiAnalysis {
                preprocessed: resampled,
                spectrum: None,
                result: SqiResult::zero(SqiStatus::InsufficientSamples),
            });
        }

        let mut preprocessed =
            bandpass_zero_phase(&resampled, &config.bandpass, config.filter_order)?;
        if let Some(window_secs) = config.detrend_window_secs {
            preprocessed = median_detrend(&preprocessed, window_secs)?;
        }

        let spectrum = welch_psd(&preprocessed, &config.welch)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            samples = preprocessed.len(),
            bins = spectrum.len(),
            bin_width_hz = spectrum.bin_width(),
            "spectrum ready"
        );

        let Some(peak) = find_peak(&spectrum, &config.hr_band) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                low_hz = config.hr_band.low_hz,
                high_hz = config.hr_band.high_hz,
                "no spectral bin in heart-rate band, scoring 0"
            );
            return Ok(SqiAnalysis {
                preprocessed,
                spectrum: Some(spectrum),
                result: SqiResult::zero(SqiStatus::NoPeakFound),
            });
        };
        let f_hr = peak.frequency_hz;

        let mut p_main = Band::around(f_hr, config.main_half_width_hz)
            .intersect(&config.hr_band)
            .map_or(0.0, |band| band_power(&spectrum, &band));
        if let Some(harmonic) = &config.harmonic {
            p_main += Band::around(2.0 * f_hr, harmonic.bandwidth_hz)
                .intersect(&config.total_band)
                .map_or(0.0, |band| band_power(&spectrum, &band));
        }
        let p_total = band_power(&spectrum, &config.total_band);

        let ratio = p_main / p_total;
        let result = if p_total > 0.0 && ratio.is_finite() {
            SqiResult {
                sqi: ratio.clamp(0.0, 1.0),
                hr_peak_hz: f_hr,
                status: SqiStatus::Scored,
            }
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!(hr_peak_hz = f_hr, "zero total band power, scoring 0");
            SqiResult {
                sqi: 0.0,
                hr_peak_hz: f_hr,
                status: SqiStatus::ZeroPower,
            }
        };

        Ok(SqiAnalysis {
            preprocessed,
            spectrum: Some(spectrum),
            result,
        })
    }
}

/// Scores raw samples recorded at `fs_in`.
///
/// # Errors
///
/// [`AnalysisError::InvalidRate`] or [`AnalysisError::NonFiniteSample`] for
/// malformed input, or any configuration error from [`SqiConfig::validate`].
pub fn compute_sqi(samples: &[f64], fs_in: f64, config: &SqiConfig) -> Result<SqiResult> {
    let buffer = SampleBuffer::new(samples.to_vec(), fs_in)?;
    SqiScorer::new(config.clone())?.score(&buffer)
}
