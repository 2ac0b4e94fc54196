//! Tuning configuration from a JSON file and the environment.

use anyhow::{Context, Result};
use pacenote_core::PaceNoteConfig;
use std::env;
use std::fs;
use std::path::Path;

pub const ENV_RESAMPLE_STEP: &str = "PACENOTES_RESAMPLE_STEP_M";
pub const ENV_CURVED_RADIUS: &str = "PACENOTES_CURVED_RADIUS_M";
pub const ENV_CHICANE_DISTANCE: &str = "PACENOTES_CHICANE_DISTANCE_M";

/// Defaults, overlaid by the optional tuning file, overlaid by the environment.
pub fn load_config(path: Option<&Path>) -> Result<PaceNoteConfig> {
    let config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading tuning file {}", path.display()))?;
            PaceNoteConfig::from_json(&json)
                .with_context(|| format!("loading tuning file {}", path.display()))?
        }
        None => PaceNoteConfig::default(),
    };
    let config = apply_overrides(config, |key| env::var(key).ok());
    config.validate().context("invalid tuning after environment overrides")?;
    Ok(config)
}

/// Apply the supported overrides. Unparseable values are ignored.
pub fn apply_overrides(
    mut config: PaceNoteConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> PaceNoteConfig {
    let read = |key: &str| lookup(key).and_then(|s| s.trim().parse::<f64>().ok());

    if let Some(step) = read(ENV_RESAMPLE_STEP) {
        config.resample_step_m = step;
    }
    if let Some(radius) = read(ENV_CURVED_RADIUS) {
        config.curved_radius_m = radius;
    }
    if let Some(distance) = read(ENV_CHICANE_DISTANCE) {
        config.chicane_distance_m = distance;
    }
    config
}
