//! Rational resampling to a fixed analysis rate.
//!
//! Implements polyphase FIR resampling using a windowed-sinc lowpass filter with
//! Blackman windowing. The rate ratio `fs_out / fs_in` is approximated by the
//! closest fraction `up / down` with a bounded denominator (e.g. 128 Hz → 50 Hz
//! via up=25, down=64), then the signal is upsampled by `up`, lowpass filtered,
//! and downsampled by `down` in a single polyphase pass.
//!
//! # Theory
//!
//! Resampling by rational factor P/Q is equivalent to upsampling by P, applying
//! a lowpass filter at `1/max(P, Q)` (normalized frequency), then downsampling
//! by Q. The polyphase decomposition avoids explicit zero-insertion by computing
//! only the output samples actually needed.
//!
//! The anti-aliasing lowpass uses a windowed-sinc design:
//!   `h[n] = sinc(cutoff * (n - M/2)) * w[n]`
//! where `w[n]` is a Blackman window and the result is normalized to unity DC gain.
//! The filter's group delay of `M/2` upsampled samples is compensated, so output
//! sample `m` lines up with input time `m * Q / P`.
//!
//! Reference: P. P. Vaidyanathan, *Multirate Systems and Filter Banks*, Prentice Hall,
//! 1993, Chapter 4.
//!
//! # Example
//!
//! ```rust
//! use plethysm_analysis::SampleBuffer;
//! use plethysm_analysis::resample::{rational_ratio, resample};
//!
//! assert_eq!(rational_ratio(128.0, 50.0, 1000).unwrap(), (25, 64));
//!
//! let input = SampleBuffer::new(vec![0.0; 1280], 128.0).unwrap();
//! let output = resample(&input, 50.0).unwrap();
//! assert_eq!(output.len(), 500);
//! assert_eq!(output.sample_rate(), 50.0);
//! ```

use std::f64::consts::PI;

use crate::buffer::SampleBuffer;
use crate::error::{AnalysisError, Result, check_rate};

/// Largest denominator used when approximating a rate ratio.
pub const MAX_DENOMINATOR: u64 = 1000;

/// Rates closer than this are treated as equal and resampling is skipped.
pub const RATE_TOLERANCE_HZ: f64 = 1e-9;

/// Prototype filter half-length, in multiples of `max(up, down)`.
const HALF_LEN_FACTOR: usize = 10;

/// Compute windowed-sinc lowpass FIR coefficients.
///
/// Designs a Type I linear-phase FIR lowpass filter using the windowed-sinc
/// method with a Blackman window. The filter is normalized to have unity gain
/// at DC (sum of coefficients = 1.0).
///
/// The impulse response is:
///   `h[n] = sinc(cutoff * (n - M/2)) * w_blackman[n]`
/// where sinc(x) = sin(π·x) / (π·x) and M = num_taps - 1.
///
/// # Arguments
///
/// * `num_taps` - Number of filter taps. Odd tap counts produce a symmetric
///   Type I filter.
/// * `cutoff` - Normalized cutoff frequency in the range (0.0, 1.0],
///   where 1.0 corresponds to the Nyquist frequency (fs/2).
///
/// Reference: A. V. Oppenheim and R. W. Schafer, *Discrete-Time Signal Processing*,
/// 3rd ed., Prentice Hall, 2009, Section 7.6.
pub fn design_lowpass(num_taps: usize, cutoff: f64) -> Vec<f64> {
    if num_taps == 0 {
        return Vec::new();
    }

    let m = num_taps - 1;
    let mut coeffs = Vec::with_capacity(num_taps);

    for n in 0..num_taps {
        let x = n as f64 - m as f64 / 2.0;

        let sinc = if x.abs() < 1e-12 {
            cutoff
        } else {
            (PI * cutoff * x).sin() / (PI * x)
        };

        // Blackman window: w[n] = 0.42 - 0.5*cos(2πn/M) + 0.08*cos(4πn/M)
        let window = if m == 0 {
            1.0
        } else {
            let phase = 2.0 * PI * n as f64 / m as f64;
            0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
        };

        coeffs.push(sinc * window);
    }

    // Normalize to unity DC gain (sum of coefficients = 1.0)
    let sum: f64 = coeffs.iter().sum();
    if sum.abs() > 1e-12 {
        for c in coeffs.iter_mut() {
            *c /= sum;
        }
    }

    coeffs
}

/// Compute the greatest common divisor of two integers.
fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Exact value of a positive finite `f64` as a reduced fraction.
///
/// Returns `None` when numerator or denominator would exceed 2^100.
fn exact_fraction(x: f64) -> Option<(u128, u128)> {
    const LIMIT_BITS: i32 = 100;

    let bits = x.to_bits();
    let biased_exp = ((bits >> 52) & 0x7ff) as i32;
    let fraction = u128::from(bits & ((1u64 << 52) - 1));
    let (mantissa, exp) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u128 << 52), biased_exp - 1075)
    };
    if mantissa == 0 {
        return Some((0, 1));
    }

    let (num, den) = if exp >= 0 {
        if exp + 53 > LIMIT_BITS {
            return None;
        }
        (mantissa << exp, 1u128)
    } else {
        if -exp > LIMIT_BITS {
            return None;
        }
        (mantissa, 1u128 << -exp)
    };

    let g = gcd(num, den);
    Some((num / g, den / g))
}

/// Closest fraction to `num / den` with denominator at most `max_den`.
///
/// Continued-fraction expansion, finishing with the best semiconvergent.
/// When the last convergent and the semiconvergent are equally close the
/// convergent wins.
fn limit_denominator(num: u128, den: u128, max_den: u128) -> (u128, u128) {
    if den <= max_den {
        return (num, den);
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0u128, 1u128, 1u128, 0u128);
    let (mut n, mut d) = (num, den);
    loop {
        let a = n / d;
        let q2 = q0 + a * q1;
        if q2 > max_den {
            break;
        }
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }

    let k = (max_den - q0) / q1;
    let (pb, qb) = (p0 + k * p1, q0 + k * q1);

    // |p1/q1 - num/den| <= |pb/qb - num/den|, compared without division
    let dist_convergent = (p1 * den).abs_diff(num * q1) * qb;
    let dist_semi = (pb * den).abs_diff(num * qb) * q1;
    if dist_convergent <= dist_semi {
        (p1, q1)
    } else {
        (pb, qb)
    }
}

/// Best rational approximation `(up, down)` of `fs_out / fs_in`.
///
/// The fraction is in lowest terms with `down <= max_denominator`.
///
/// # Errors
///
/// [`AnalysisError::InvalidRate`] for a non-positive or non-finite rate;
/// [`AnalysisError::UnsupportedRatio`] when the ratio rounds to zero or is
/// too extreme to represent.
pub fn rational_ratio(fs_in: f64, fs_out: f64, max_denominator: u64) -> Result<(usize, usize)> {
    check_rate(fs_in)?;
    check_rate(fs_out)?;

    let unsupported = AnalysisError::UnsupportedRatio { fs_in, fs_out };
    let ratio = fs_out / fs_in;
    if !ratio.is_finite() || ratio <= 0.0 || max_denominator == 0 {
        return Err(unsupported);
    }

    let (num, den) = exact_fraction(ratio).ok_or_else(|| unsupported.clone())?;
    let (up, down) = limit_denominator(num, den, u128::from(max_denominator));
    if up == 0 {
        return Err(unsupported);
    }

    match (usize::try_from(up), usize::try_from(down)) {
        (Ok(up), Ok(down)) => Ok((up, down)),
        _ => Err(unsupported),
    }
}

/// Rational resampling by the factor `up / down`.
///
/// The output length is `ceil(input.len() * up / down)`.
///
/// # Algorithm
///
/// Polyphase decomposition avoids explicit zero-insertion:
/// 1. Simplify `up` and `down` by their GCD.
/// 2. Design a single prototype lowpass FIR of `2 * 10 * max(up, down) + 1`
///    taps with cutoff `1 / max(up, down)`.
/// 3. Decompose into `up` polyphase sub-filters.
/// 4. For each output sample `m`, locate the delay-compensated position
///    `m * down + M/2` in the upsampled sequence; its quotient by `up` is the
///    newest contributing input sample, its remainder the sub-filter phase.
/// 5. Apply that sub-filter to the input ending at that sample.
///
/// # Panics
///
/// Panics if `up` or `down` is zero.
///
/// Reference: P. P. Vaidyanathan, *Multirate Systems and Filter Banks*,
/// Prentice Hall, 1993, Section 4.3 (Polyphase Representation).
pub fn resample_poly(signal: &[f64], up: usize, down: usize) -> Vec<f64> {
    assert!(up >= 1, "upsample factor must be >= 1");
    assert!(down >= 1, "downsample factor must be >= 1");

    let g = gcd(up as u128, down as u128) as usize;
    let up = up / g;
    let down = down / g;

    if up == 1 && down == 1 {
        return signal.to_vec();
    }

    let max_factor = up.max(down);
    let num_taps = 2 * HALF_LEN_FACTOR * max_factor + 1;
    let half = (num_taps - 1) / 2;
    let prototype = design_lowpass(num_taps, 1.0 / max_factor as f64);

    let out_len = (signal.len() * up).div_ceil(down);
    let taps_per_phase = num_taps.div_ceil(up);

    // Sub-filter k holds prototype taps k, k+up, k+2*up, ...
    let mut polyphase = vec![vec![0.0f64; taps_per_phase]; up];
    for (tap_idx, &coeff) in prototype.iter().enumerate() {
        polyphase[tap_idx % up][tap_idx / up] = coeff;
    }

    let mut output = Vec::with_capacity(out_len);

    for m in 0..out_len {
        let full_idx = m * down + half;
        let n = full_idx / up;
        let k = full_idx % up;

        // y[m] = sum_i polyphase[k][i] * x[n - i]
        let mut acc = 0.0f64;
        for (i, &coeff) in polyphase[k].iter().enumerate() {
            if n >= i && (n - i) < signal.len() {
                acc += coeff * signal[n - i];
            }
        }

        // Scale by up so that the zero-stuffed energy is restored
        output.push(acc * up as f64);
    }

    output
}

/// Resamples `buffer` to `fs_out`.
///
/// Rates within [`RATE_TOLERANCE_HZ`] of each other return a copy of the
/// input unchanged.
///
/// # Errors
///
/// [`AnalysisError::InvalidRate`] if `fs_out` is not a valid rate;
/// [`AnalysisError::UnsupportedRatio`] if the ratio cannot be approximated.
pub fn resample(buffer: &SampleBuffer, fs_out: f64) -> Result<SampleBuffer> {
    let fs_in = buffer.sample_rate();
    check_rate(fs_out)?;

    if (fs_in - fs_out).abs() < RATE_TOLERANCE_HZ {
        return Ok(buffer.clone());
    }

    let (up, down) = rational_ratio(fs_in, fs_out, MAX_DENOMINATOR)?;

    #[cfg(feature = "tracing")]
    tracing::trace!(fs_in, fs_out, up, down, len = buffer.len(), "resampling");

    let samples = resample_poly(buffer.samples(), up, down);
    Ok(SampleBuffer::from_parts(samples, fs_out))
}
