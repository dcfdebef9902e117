//! # Configuration Management
//!
//! Loads runtime settings from `wh1080-config.toml`: sampling cadence,
//! output location and the rain spike threshold. Anything not supplied
//! falls back to defaults matching the station's historical deployment
//! (one-minute samples, CSV files in the current directory).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::rain::RainAccumulator;

/// Application configuration loaded from wh1080-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Station decode settings
    pub station: StationConfig,
    /// Sampling cadence
    pub sampling: SamplingConfig,
    /// Output sink settings
    pub output: OutputConfig,
}

/// Station decode settings
#[derive(Debug, Deserialize, Serialize)]
pub struct StationConfig {
    /// Largest single-cycle rain counter increase accepted as real rain
    /// (mm). Larger jumps are filtered as sensor glitches.
    pub max_rain_jump_mm: f64,
}

/// Sampling cadence settings
#[derive(Debug, Deserialize, Serialize)]
pub struct SamplingConfig {
    /// Minutes between samples; cycles fire on whole-minute wall-clock
    /// boundaries
    pub period_minutes: u32,
}

/// Output sink settings
#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory the daily CSV files are appended under
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            station: StationConfig {
                max_rain_jump_mm: RainAccumulator::DEFAULT_MAX_JUMP_MM,
            },
            sampling: SamplingConfig { period_minutes: 1 },
            output: OutputConfig {
                data_dir: ".".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from wh1080-config.toml in the working directory.
    /// Falls back to default configuration if the file doesn't exist or is
    /// invalid.
    pub fn load() -> Self {
        Self::load_from_path("wh1080-config.toml")
    }

    /// Load configuration from the specified path, defaulting on a missing
    /// or malformed file (a bad config should not keep the logger down).
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("invalid config file format: {e}; using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config file found, using defaults");
                Self::default()
            }
        }
    }
}
