//! Criterion benchmarks for plethysm-core filter primitives
//!
//! Run with: cargo bench -p plethysm-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use plethysm_core::{Biquad, SosCascade, lowpass_coefficients};

const SAMPLE_RATE: f64 = 50.0;
const BLOCK_SIZES: &[usize] = &[500, 1500, 3000, 15000];

fn generate_test_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            (2.0 * std::f64::consts::PI * 1.2 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");
    let coeffs = lowpass_coefficients(7.0, 0.707, SAMPLE_RATE);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad = Biquad::with_coefficients(coeffs);
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_filtfilt(c: &mut Criterion) {
    let mut group = c.benchmark_group("SosCascade_filtfilt");
    let cascade = SosCascade::butterworth_highpass(4, 0.5, SAMPLE_RATE)
        .then(SosCascade::butterworth_lowpass(4, 7.0, SAMPLE_RATE));

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("bandpass_0.5_7", block_size),
            &block_size,
            |b, _| b.iter(|| black_box(cascade.filtfilt(black_box(&input)))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_biquad, bench_filtfilt);
criterion_main!(benches);
