//! Settings inspection.

use std::path::PathBuf;

use clap::Args;
use plethysm_config::Settings;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the settings to this file instead of printing them
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: ConfigArgs, settings: &Settings) -> anyhow::Result<()> {
    match args.output {
        Some(path) => {
            settings.save(&path)?;
            println!("Wrote settings to {}", path.display());
        }
        None => print!("{}", settings.to_toml()?),
    }
    Ok(())
}
