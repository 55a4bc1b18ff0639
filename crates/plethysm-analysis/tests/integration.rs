//! Integration tests for plethysm-analysis crate.
//!
//! Tests exercise the full scoring pipeline and its stages through the public
//! API using synthetic signals with known spectral content.

use std::f64::consts::PI;

use plethysm_analysis::band::{Band, ppg_bands};
use plethysm_analysis::resample::{rational_ratio, resample};
use plethysm_analysis::spectrum::{WelchConfig, welch_psd};
use plethysm_analysis::{
    SampleBuffer, SqiConfig, SqiResult, SqiScorer, SqiStatus, band_power, bandpass_zero_phase,
    compute_sqi, find_peak,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a sine wave at a given frequency and amplitude.
fn sine(freq_hz: f64, sample_rate: f64, num_samples: usize, amplitude: f64) -> Vec<f64> {
    (0..num_samples)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 / sample_rate).sin())
        .collect()
}

/// Generate deterministic white noise in [-1, 1].
fn white_noise(num_samples: usize, seed: u32) -> Vec<f64> {
    let mut state = seed;
    (0..num_samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as i32 as f64) / (i32::MAX as f64)
        })
        .collect()
}

/// Pulse-like waveform: sharp systolic peak, slower diastolic decay, DC offset.
fn synthetic_ppg(heart_rate_hz: f64, sample_rate: f64, secs: f64) -> Vec<f64> {
    let n = (sample_rate * secs) as usize;
    (0..n)
        .map(|i| {
            let phase = 2.0 * PI * heart_rate_hz * i as f64 / sample_rate;
            800.0 + 60.0 * phase.sin() + 25.0 * (2.0 * phase).sin() + 8.0 * (3.0 * phase).sin()
        })
        .collect()
}

fn buffer(samples: Vec<f64>, sample_rate: f64) -> SampleBuffer {
    SampleBuffer::new(samples, sample_rate).unwrap()
}

// ===========================================================================
// 1. Resampling
// ===========================================================================

#[test]
fn same_rate_resampling_is_identity() {
    let input = buffer(white_noise(777, 7), 50.0);
    let output = resample(&input, 50.0).unwrap();
    assert_eq!(output.samples(), input.samples());
    assert_eq!(output.sample_rate(), 50.0);
}

#[test]
fn resampling_preserves_duration() {
    for (fs_in, n) in [(128.0, 1000usize), (25.0, 333), (100.0, 1001), (30.0, 91), (250.0, 2500)] {
        let input = buffer(white_noise(n, 3), fs_in);
        let output = resample(&input, 50.0).unwrap();
        let diff = (output.duration_secs() - input.duration_secs()).abs();
        assert!(
            diff <= 1.0 / 50.0 + 1e-12,
            "{fs_in} Hz x {n}: duration drifted by {diff} s"
        );
    }
}

#[test]
fn resampling_keeps_heart_rate_tone() {
    let input = buffer(sine(1.3, 128.0, 128 * 20, 1.0), 128.0);
    let output = resample(&input, 50.0).unwrap();
    let spectrum = welch_psd(&output, &WelchConfig::default()).unwrap();
    let peak = find_peak(&spectrum, &ppg_bands::HEART_RATE).unwrap();
    assert!(
        (peak.frequency_hz - 1.3).abs() <= spectrum.bin_width(),
        "peak moved to {} Hz",
        peak.frequency_hz
    );
}

#[test]
fn rational_ratio_of_common_sensor_rates() {
    assert_eq!(rational_ratio(64.0, 50.0, 1000).unwrap(), (25, 32));
    assert_eq!(rational_ratio(125.0, 50.0, 1000).unwrap(), (2, 5));
    assert_eq!(rational_ratio(500.0, 50.0, 1000).unwrap(), (1, 10));
}

// ===========================================================================
// 2. Filtering
// ===========================================================================

#[test]
fn zero_phase_filtering_preserves_length() {
    for n in [8usize, 9, 26, 27, 28, 100, 1023] {
        let input = buffer(white_noise(n, 11), 50.0);
        let output = bandpass_zero_phase(&input, &ppg_bands::BANDPASS, 4).unwrap();
        assert_eq!(output.len(), n);
    }
}

#[test]
fn bandpass_removes_baseline_and_keeps_pulse() {
    let input = buffer(synthetic_ppg(1.2, 50.0, 20.0), 50.0);
    let output = bandpass_zero_phase(&input, &ppg_bands::BANDPASS, 4).unwrap();
    let middle = &output.samples()[100..850];
    let mean = middle.iter().sum::<f64>() / middle.len() as f64;
    let peak = middle.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    assert!(mean.abs() < 1.0, "baseline survived: {mean}");
    assert!(peak > 50.0, "pulse attenuated: {peak}");
}

// ===========================================================================
// 3. Spectrum and band power
// ===========================================================================

#[test]
fn band_power_is_additive_over_adjoining_bands() {
    let input = buffer(white_noise(4096, 5), 50.0);
    let spectrum = welch_psd(&input, &WelchConfig::default()).unwrap();
    let split = spectrum.frequencies()[100];

    let whole = band_power(&spectrum, &Band::from_edges(0.0, 10.0));
    let left = band_power(&spectrum, &Band::from_edges(0.0, split));
    let right = band_power(&spectrum, &Band::from_edges(split, 10.0));
    assert!((whole - (left + right)).abs() < 1e-12 * whole.max(1.0));
}

#[test]
fn white_noise_density_is_flat() {
    let input = buffer(white_noise(50_000, 9), 50.0);
    let spectrum = welch_psd(&input, &WelchConfig::default()).unwrap();
    let low = band_power(&spectrum, &Band::from_edges(2.0, 7.0));
    let high = band_power(&spectrum, &Band::from_edges(12.0, 17.0));
    let ratio = low / high;
    assert!((0.8..1.25).contains(&ratio), "uneven noise floor, ratio {ratio}");
}

// ===========================================================================
// 4. SQI scoring
// ===========================================================================

#[test]
fn clean_tone_in_narrow_hr_band() {
    let config = SqiConfig {
        hr_band: Band::from_edges(0.8, 3.0),
        ..SqiConfig::default()
    };
    let result = compute_sqi(&sine(1.2, 50.0, 500, 1.0), 50.0, &config).unwrap();
    // 500 samples -> one 500-sample segment, 0.1 Hz bins
    assert!((result.hr_peak_hz - 1.2).abs() <= 0.1 + 1e-9, "{result:?}");
    assert!(result.sqi > 0.9, "{result:?}");
}

#[test]
fn white_noise_scores_near_window_to_passband_ratio() {
    let config = SqiConfig::default();
    let window_hz = 2.0 * config.main_half_width_hz;
    let passband_hz = config.bandpass.high_hz - config.bandpass.low_hz;
    let expected = window_hz / passband_hz;

    let seeds = [3u32, 42, 77, 101, 999, 2024, 31337, 65521];
    let mut total = 0.0;
    for seed in seeds {
        let result = compute_sqi(&white_noise(20_000, seed), 50.0, &config).unwrap();
        assert_eq!(result.status, SqiStatus::Scored);
        assert!(ppg_bands::HEART_RATE.contains(result.hr_peak_hz));
        total += result.sqi;
    }
    let mean = total / seeds.len() as f64;
    assert!(
        (mean - expected).abs() < 0.03,
        "mean noise sqi {mean}, expected about {expected}"
    );
}

#[test]
fn synthetic_pulse_at_sensor_rate() {
    let samples = synthetic_ppg(1.1, 128.0, 30.0);
    let result = compute_sqi(&samples, 128.0, &SqiConfig::default()).unwrap();
    assert!((result.hr_peak_hz - 1.1).abs() < 0.1, "{result:?}");
    assert!(result.sqi > 0.5, "{result:?}");

    let with_harmonics = compute_sqi(&samples, 128.0, &SqiConfig::with_harmonics()).unwrap();
    assert!(with_harmonics.sqi > result.sqi);
}

#[test]
fn noisy_pulse_scores_between_clean_and_noise() {
    let clean = synthetic_ppg(1.2, 50.0, 30.0);
    let noise = white_noise(clean.len(), 1234);
    let noisy: Vec<f64> = clean
        .iter()
        .zip(&noise)
        .map(|(c, n)| c + 80.0 * n)
        .collect();

    let config = SqiConfig::default();
    let clean_sqi = compute_sqi(&clean, 50.0, &config).unwrap().sqi;
    let noisy_sqi = compute_sqi(&noisy, 50.0, &config).unwrap().sqi;
    let noise_sqi = compute_sqi(&noise, 50.0, &config).unwrap().sqi;
    assert!(clean_sqi > noisy_sqi, "{clean_sqi} vs {noisy_sqi}");
    assert!(noisy_sqi > noise_sqi, "{noisy_sqi} vs {noise_sqi}");
}

#[test]
fn fewer_than_eight_samples_score_zero() {
    for n in 0..8 {
        let result = compute_sqi(&sine(1.0, 50.0, n, 1.0), 50.0, &SqiConfig::default()).unwrap();
        assert_eq!(result.sqi, 0.0);
        assert_eq!(result.hr_peak_hz, 0.0);
        assert_eq!(result.status, SqiStatus::InsufficientSamples);
    }
}

#[test]
fn all_zero_buffer_scores_zero() {
    let result = compute_sqi(&[0.0; 2000], 50.0, &SqiConfig::default()).unwrap();
    assert_eq!(result.sqi, 0.0);
}

#[test]
fn scoring_is_deterministic() {
    let scorer = SqiScorer::new(SqiConfig::default()).unwrap();
    let input = buffer(synthetic_ppg(1.4, 64.0, 15.0), 64.0);
    let first: SqiResult = scorer.score(&input).unwrap();
    let second = scorer.score(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn scorer_shared_across_threads() {
    let scorer = SqiScorer::new(SqiConfig::default()).unwrap();
    let input = buffer(synthetic_ppg(1.0, 50.0, 20.0), 50.0);
    let expected = scorer.score(&input).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| scorer.score(&input).unwrap())).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn invalid_rate_is_an_error() {
    assert!(compute_sqi(&[1.0; 100], 0.0, &SqiConfig::default()).is_err());
    assert!(compute_sqi(&[1.0; 100], -50.0, &SqiConfig::default()).is_err());
}
