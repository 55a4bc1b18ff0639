//! Second-order-section cascades and zero-phase (forward-backward) filtering.
//!
//! High-order IIR filters are numerically fragile when expressed as a single
//! transfer function: narrow bands push the poles close together and the
//! polynomial coefficients lose precision. [`SosCascade`] keeps the filter
//! factored into biquads and runs them one after another.
//!
//! [`SosCascade::filtfilt`] applies the cascade forward, then again over the
//! time-reversed output. The phase responses cancel, so peaks stay where they
//! were in the input, and the magnitude response is squared.
//!
//! # Edge handling
//!
//! Before filtering, the signal is extended at both ends by an odd reflection
//! about its end points (`2·x[0] − x[i]`), and each pass starts from the
//! cascade's steady state for the first sample. The extension is discarded
//! afterwards, so the output has exactly the input's length.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::biquad::{
    Biquad, BiquadCoefficients, butterworth_q, highpass_coefficients, lowpass_coefficients,
};

/// A cascade of second-order sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SosCascade {
    sections: Vec<BiquadCoefficients>,
}

impl SosCascade {
    /// Creates a cascade from normalized sections, applied in order.
    pub fn new(sections: Vec<BiquadCoefficients>) -> Self {
        Self { sections }
    }

    /// Butterworth high-pass of the given even `order` as `order / 2` sections.
    pub fn butterworth_highpass(order: usize, frequency: f64, sample_rate: f64) -> Self {
        let sections = (0..order / 2)
            .map(|k| highpass_coefficients(frequency, butterworth_q(order, k), sample_rate))
            .collect();
        Self { sections }
    }

    /// Butterworth low-pass of the given even `order` as `order / 2` sections.
    pub fn butterworth_lowpass(order: usize, frequency: f64, sample_rate: f64) -> Self {
        let sections = (0..order / 2)
            .map(|k| lowpass_coefficients(frequency, butterworth_q(order, k), sample_rate))
            .collect();
        Self { sections }
    }

    /// Appends the sections of `other` after this cascade's sections.
    pub fn then(mut self, other: SosCascade) -> Self {
        self.sections.extend(other.sections);
        self
    }

    /// The normalized sections in processing order.
    pub fn sections(&self) -> &[BiquadCoefficients] {
        &self.sections
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if the cascade has no sections (identity filter).
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns true if every section is stable.
    pub fn is_stable(&self) -> bool {
        self.sections.iter().all(BiquadCoefficients::is_stable)
    }

    /// Number of samples of odd extension used by [`filtfilt`](Self::filtfilt)
    /// on a sufficiently long signal: three times the equivalent
    /// transfer-function length.
    pub fn default_padlen(&self) -> usize {
        3 * (2 * self.sections.len() + 1)
    }

    /// Runs the cascade once over `signal` from a zeroed state.
    pub fn filter(&self, signal: &[f64]) -> Vec<f64> {
        let mut stages: Vec<Biquad> = self
            .sections
            .iter()
            .map(|&c| Biquad::with_coefficients(c))
            .collect();
        run_cascade(&mut stages, signal)
    }

    /// Runs the cascade once over `signal`, starting every section in the
    /// steady state that a constant `signal[0]` would produce.
    pub fn filter_primed(&self, signal: &[f64]) -> Vec<f64> {
        let mut stages: Vec<Biquad> = self
            .sections
            .iter()
            .map(|&c| Biquad::with_coefficients(c))
            .collect();
        if let Some(&first) = signal.first() {
            let mut level = first;
            for stage in &mut stages {
                level = stage.prime(level);
            }
        }
        run_cascade(&mut stages, signal)
    }

    /// Zero-phase forward-backward filtering.
    ///
    /// Output length always equals input length. Signals too short for the
    /// default padding use `len - 1` samples of padding instead; a single
    /// sample is passed through the cascade's DC gain.
    pub fn filtfilt(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n == 0 || self.sections.is_empty() {
            return signal.to_vec();
        }

        let padlen = self.default_padlen().min(n - 1);
        let extended = odd_extend(signal, padlen);

        let mut forward = self.filter_primed(&extended);
        forward.reverse();
        let mut backward = self.filter_primed(&forward);
        backward.reverse();

        backward.drain(..padlen);
        backward.truncate(n);
        backward
    }
}

fn run_cascade(stages: &mut [Biquad], signal: &[f64]) -> Vec<f64> {
    signal
        .iter()
        .map(|&x| stages.iter_mut().fold(x, |acc, stage| stage.process(acc)))
        .collect()
}

/// Odd reflection of `padlen` samples about each end point.
fn odd_extend(signal: &[f64], padlen: usize) -> Vec<f64> {
    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];

    let mut out = Vec::with_capacity(n + 2 * padlen);
    out.extend((1..=padlen).rev().map(|i| 2.0 * first - signal[i]));
    out.extend_from_slice(signal);
    out.extend((1..=padlen).map(|i| 2.0 * last - signal[n - 1 - i]));
    out
}
