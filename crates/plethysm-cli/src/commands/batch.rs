//! Batch scoring over a data directory.

use std::path::{Path, PathBuf};

use clap::Args;
use plethysm_analysis::SqiScorer;
use plethysm_config::Settings;
use plethysm_io::{ReportRow, find_recordings, read_ppg_csv, write_report};

#[derive(Args)]
pub struct BatchArgs {
    /// Directory searched recursively for recordings [default: from settings]
    #[arg(value_name = "ROOT")]
    root: Option<PathBuf>,

    /// First directory level of the reports [default: from settings]
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

/// Scores one recording and writes its report. Returns the report path and SQI.
fn process(path: &Path, scorer: &SqiScorer, settings: &Settings) -> anyhow::Result<(PathBuf, f64)> {
    let recording = read_ppg_csv(path, settings.input.signal_column)?;
    let buffer = recording.to_buffer(settings.input.sample_rate_hz)?;
    let result = scorer.score(&buffer)?;
    tracing::debug!(
        path = %path.display(),
        sqi = result.sqi,
        hr_peak_hz = result.hr_peak_hz,
        status = %result.status,
        "scored recording"
    );

    let rows = [ReportRow::new(recording.file_name(), 0, &result)];
    let report = settings.report.path_for(path);
    write_report(&report, &rows)?;
    Ok((report, result.sqi))
}

pub fn run(args: BatchArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(root) = args.root {
        settings.input.root_dir = root;
    }
    if let Some(output_dir) = args.output_dir {
        settings.report.output_dir = output_dir;
    }

    let scorer = SqiScorer::new(settings.sqi.clone())?;
    let recordings = find_recordings(&settings.input.root_dir, &settings.input.file_name)?;
    if recordings.is_empty() {
        tracing::warn!(
            root = %settings.input.root_dir.display(),
            file_name = %settings.input.file_name,
            "no recordings found"
        );
        return Ok(());
    }

    let mut scores = Vec::with_capacity(recordings.len());
    let mut failed = 0usize;
    for path in &recordings {
        match process(path, &scorer, &settings) {
            Ok((report, sqi)) => {
                println!("{}  SQI {:.4}  -> {}", path.display(), sqi, report.display());
                scores.push(sqi);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping recording");
                failed += 1;
            }
        }
    }

    let mean = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    println!(
        "\nScored {} of {} recordings, mean SQI {:.4}",
        scores.len(),
        recordings.len(),
        mean
    );
    if failed > 0 {
        println!("{failed} recording(s) skipped, rerun with -v for details");
    }

    Ok(())
}
