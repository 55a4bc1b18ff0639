//! Single-file scoring command.

use std::path::PathBuf;

use clap::Args;
use plethysm_analysis::{HarmonicConfig, SqiScorer};
use plethysm_config::Settings;
use plethysm_io::read_ppg_csv;
use serde::Serialize;

#[derive(Args)]
pub struct ScoreArgs {
    /// PPG log (CSV)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Sample rate of the log in Hz [default: from settings]
    #[arg(long)]
    rate: Option<f64>,

    /// Zero-based index of the signal column [default: from settings]
    #[arg(long)]
    column: Option<usize>,

    /// Add the second-harmonic term to the main power
    #[arg(long)]
    harmonics: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ScoreOutput {
    file: String,
    samples: usize,
    sample_rate_hz: f64,
    sqi: f64,
    hr_peak_hz: f64,
    heart_rate_bpm: f64,
    status: &'static str,
}

pub fn run(args: ScoreArgs, settings: Settings) -> anyhow::Result<()> {
    let rate = args.rate.unwrap_or(settings.input.sample_rate_hz);
    let column = args.column.unwrap_or(settings.input.signal_column);

    let mut config = settings.sqi;
    if args.harmonics && config.harmonic.is_none() {
        config.harmonic = Some(HarmonicConfig::default());
    }
    let scorer = SqiScorer::new(config)?;

    let recording = read_ppg_csv(&args.input, column)?;
    let buffer = recording.to_buffer(rate)?;
    let result = scorer.score(&buffer)?;

    if args.json {
        let output = ScoreOutput {
            file: recording.path.display().to_string(),
            samples: recording.samples.len(),
            sample_rate_hz: rate,
            sqi: result.sqi,
            hr_peak_hz: result.hr_peak_hz,
            heart_rate_bpm: result.heart_rate_bpm(),
            status: result.status.as_str(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", recording.path.display());
        println!(
            "  {} samples at {} Hz ({:.1}s)",
            buffer.len(),
            rate,
            buffer.duration_secs()
        );
        println!("  SQI:        {:.4}", result.sqi);
        println!(
            "  Heart rate: {:.3} Hz ({:.1} bpm)",
            result.hr_peak_hz,
            result.heart_rate_bpm()
        );
        println!("  Status:     {}", result.status);
    }

    Ok(())
}
