//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod generate;
pub mod score;

use std::path::Path;

use anyhow::Context;
use plethysm_config::Settings;

/// Settings from `path`, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}
