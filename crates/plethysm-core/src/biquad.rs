//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a second-order IIR section in double precision, plus the
//! coefficient formulas needed to build Butterworth high-pass and low-pass
//! cascades for slow biosignals.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas, which are
//! the bilinear transform of the analog prototype with the cutoff pre-warped.

use core::f64::consts::PI;
use libm::{cos, sin};

/// Second-order section coefficients normalized so that `a0 == 1`.
///
/// Layout matches the usual SOS row `[b0, b1, b2, 1, a1, a2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n]
    pub b0: f64,
    /// Feedforward coefficient for x[n-1]
    pub b1: f64,
    /// Feedforward coefficient for x[n-2]
    pub b2: f64,
    /// Feedback coefficient for y[n-1]
    pub a1: f64,
    /// Feedback coefficient for y[n-2]
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds normalized coefficients from raw cookbook values.
    ///
    /// Divides every term by `a0`.
    pub fn from_raw(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Gain at DC (z = 1).
    ///
    /// Returns 0.0 when the section has a pole at DC, which cannot happen for
    /// a stable section.
    pub fn dc_gain(&self) -> f64 {
        let den = 1.0 + self.a1 + self.a2;
        if den.abs() < f64::EPSILON {
            0.0
        } else {
            (self.b0 + self.b1 + self.b2) / den
        }
    }

    /// Returns true if both poles lie strictly inside the unit circle.
    ///
    /// Uses the stability triangle: `|a2| < 1` and `|a1| < 1 + a2`.
    pub fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f64,
    x2: f64,

    /// Output delay line: y[n-1], y[n-2]
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    pub fn new() -> Self {
        Self::with_coefficients(BiquadCoefficients::IDENTITY)
    }

    /// Creates a biquad with the given normalized coefficients and zero state.
    pub fn with_coefficients(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the biquad coefficients from raw cookbook values.
    ///
    /// Normalizes by `a0` internally. Filter state is left untouched.
    pub fn set_coefficients(&mut self, b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) {
        self.coeffs = BiquadCoefficients::from_raw(b0, b1, b2, a0, a1, a2);
    }

    /// Returns the normalized coefficients.
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Loads the state the filter would have after an infinitely long
    /// constant input of value `x0`.
    ///
    /// Starting a block from this state removes the step transient that a
    /// zeroed filter produces when the signal begins far from zero. Returns
    /// the steady-state output, which is the value the next stage should be
    /// primed with.
    pub fn prime(&mut self, x0: f64) -> f64 {
        let y0 = x0 * self.coeffs.dc_gain();
        self.x1 = x0;
        self.x2 = x0;
        self.y1 = y0;
        self.y2 = y0;
        y0
    }

    /// Clears the filter state (delay lines).
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Q factor of section `section` in an `order`-th order Butterworth cascade.
///
/// The analog Butterworth poles sit at angles `(2k + 1)π / (2N)` from the
/// imaginary axis, giving `Q_k = 1 / (2 sin((2k + 1)π / (2N)))`. For a 4th
/// order cascade this yields 1.307 and 0.541.
pub fn butterworth_q(order: usize, section: usize) -> f64 {
    let angle = (2 * section + 1) as f64 * PI / (2 * order) as f64;
    1.0 / (2.0 * sin(angle))
}

/// Calculates low-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (0.707 for a single Butterworth section)
/// * `sample_rate` - Sample rate in Hz
pub fn lowpass_coefficients(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cos(omega);
    let alpha = sin(omega) / (2.0 * q);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::from_raw(b0, b1, b2, a0, a1, a2)
}

/// Calculates high-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor (0.707 for a single Butterworth section)
/// * `sample_rate` - Sample rate in Hz
pub fn highpass_coefficients(frequency: f64, q: f64, sample_rate: f64) -> BiquadCoefficients {
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cos(omega);
    let alpha = sin(omega) / (2.0 * q);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    BiquadCoefficients::from_raw(b0, b1, b2, a0, a1, a2)
}
