//! Runtime settings
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;
use crate::consts::{DEFAULT_BASE_RATE_HZ, DEFAULT_TICK_DIVISOR};

/// Failure to load settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tick_divisor must be at least 1")]
    InvalidTickDivisor,

    #[error("base_rate_hz must be at least 1")]
    InvalidBaseRate,
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Base timer firings per game tick
    pub tick_divisor: u16,
    /// Base timer rate
    pub base_rate_hz: u32,

    // === Display ===
    /// Color of uncovered pixels
    pub background: Color,
    /// Color of shapes and score text
    pub foreground: Color,

    // === Audio ===
    /// Ring the terminal bell on impacts
    pub sound: bool,

    // === Logging ===
    /// `env_logger` filter; falls back to RUST_LOG, then "info"
    pub log_filter: Option<String>,

    // === Headless ===
    /// Run this many base firings without a terminal, then exit
    pub headless_firings: Option<u32>,
    /// Where the headless run writes the final framebuffer (raw RGB565)
    pub dump_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_divisor: DEFAULT_TICK_DIVISOR,
            base_rate_hz: DEFAULT_BASE_RATE_HZ,

            background: Color::BLACK,
            foreground: Color::WHITE,

            sound: true,

            log_filter: None,

            headless_firings: None,
            dump_path: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_divisor == 0 {
            return Err(SettingsError::InvalidTickDivisor);
        }
        if self.base_rate_hz == 0 {
            return Err(SettingsError::InvalidBaseRate);
        }
        Ok(())
    }

    /// Time between base timer firings
    pub fn base_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.base_rate_hz.max(1) as f64)
    }

    /// Game ticks per second
    pub fn game_rate_hz(&self) -> f64 {
        self.base_rate_hz as f64 / self.tick_divisor.max(1) as f64
    }
}
