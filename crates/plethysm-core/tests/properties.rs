//! Property-based tests for plethysm-core filter primitives.
//!
//! Tests stability and length preservation using proptest for randomized
//! cutoffs and inputs.

use proptest::prelude::*;
use plethysm_core::{Biquad, SosCascade, highpass_coefficients, lowpass_coefficients};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// For any cutoff strictly inside (0, Nyquist), RBJ sections are stable
    /// and produce finite output for random finite input.
    #[test]
    fn biquad_stability(
        norm_cutoff in 0.001f64..0.999f64,
        q in 0.5f64..2.0f64,
        highpass in any::<bool>(),
        input in prop::collection::vec(-1000.0f64..1000.0f64, 1..256),
    ) {
        let sample_rate = 50.0;
        let freq = norm_cutoff * sample_rate / 2.0;
        let coeffs = if highpass {
            highpass_coefficients(freq, q, sample_rate)
        } else {
            lowpass_coefficients(freq, q, sample_rate)
        };
        prop_assert!(coeffs.is_stable(), "unstable section at {} Hz, q={}", freq, q);

        let mut biquad = Biquad::with_coefficients(coeffs);
        for &sample in &input {
            let out = biquad.process(sample);
            prop_assert!(out.is_finite(), "non-finite output {} for input {}", out, sample);
        }
    }

    /// Forward-backward filtering never changes the buffer length.
    #[test]
    fn filtfilt_preserves_length(
        low in 0.1f64..5.0f64,
        width in 0.5f64..15.0f64,
        input in prop::collection::vec(-1.0f64..1.0f64, 0..600),
    ) {
        let sample_rate = 50.0;
        let high = (low + width).min(24.9);
        let cascade = SosCascade::butterworth_highpass(4, low, sample_rate)
            .then(SosCascade::butterworth_lowpass(4, high, sample_rate));

        let output = cascade.filtfilt(&input);
        prop_assert_eq!(output.len(), input.len());
        prop_assert!(output.iter().all(|v| v.is_finite()));
    }
}
