//! Synthetic PPG log generation.

use std::f64::consts::PI;
use std::path::PathBuf;

use clap::Args;
use plethysm_analysis::SampleBuffer;
use plethysm_io::write_ppg_csv;

/// ADC level the synthetic pulse rides on.
const BASELINE: f64 = 512.0;
/// Peak deviation of the fundamental.
const PULSE_AMPLITUDE: f64 = 100.0;
/// Respiratory baseline wander.
const WANDER_HZ: f64 = 0.25;
const WANDER_AMPLITUDE: f64 = 20.0;

#[derive(Args)]
pub struct GenerateArgs {
    /// Output CSV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Pulse frequency in Hz
    #[arg(long, default_value = "1.2")]
    heart_rate_hz: f64,

    /// Uniform noise amplitude relative to the pulse amplitude
    #[arg(long, default_value = "0.0")]
    noise: f64,

    /// Duration in seconds
    #[arg(long, default_value = "30.0")]
    duration: f64,

    /// Sample rate in Hz
    #[arg(long, default_value = "50.0")]
    rate: f64,

    /// Noise seed
    #[arg(long, default_value = "1")]
    seed: u32,
}

/// Xorshift32 noise in [-1, 1).
struct Noise(u32);

impl Noise {
    fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    fn next(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        f64::from(self.0 as i32) / 2_147_483_648.0
    }
}

/// Pulse with a dicrotic second harmonic, baseline wander, and noise.
fn synthesize(args: &GenerateArgs) -> Vec<f64> {
    let n = (args.duration * args.rate).round() as usize;
    let mut noise = Noise::new(args.seed);
    (0..n)
        .map(|i| {
            let t = i as f64 / args.rate;
            let phase = 2.0 * PI * args.heart_rate_hz * t;
            let pulse = phase.sin() + 0.35 * (2.0 * phase).sin() + 0.1 * (3.0 * phase).sin();
            let wander = WANDER_AMPLITUDE * (2.0 * PI * WANDER_HZ * t).sin();
            BASELINE + wander + PULSE_AMPLITUDE * (pulse + args.noise * noise.next())
        })
        .collect()
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if !args.duration.is_finite() || args.duration <= 0.0 {
        anyhow::bail!("duration must be positive, got {}", args.duration);
    }
    if !args.noise.is_finite() || args.noise < 0.0 {
        anyhow::bail!("noise must be non-negative, got {}", args.noise);
    }

    let buffer = SampleBuffer::new(synthesize(&args), args.rate)?;
    write_ppg_csv(&args.output, &buffer)?;

    println!(
        "Generated {:.1}s PPG at {} Hz ({:.1} bpm, noise {}) -> {}",
        args.duration,
        args.rate,
        args.heart_rate_hz * 60.0,
        args.noise,
        args.output.display()
    );
    Ok(())
}
