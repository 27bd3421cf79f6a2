// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.
//!
//! Defaults, then `frontdesk.toml` in the state directory, then `FD_*`
//! environment variables.

use fd_core::window::{fixed_offset, CLINIC_UTC_OFFSET_HOURS};
use fd_core::{UndoKind, Window};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::env;

/// Name of the optional config file inside the state directory
pub const CONFIG_FILE: &str = "frontdesk.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory (set FD_STATE_DIR or HOME)")]
    NoStateDir,
    #[error("failed to read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Runtime configuration for the queue engine
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root state directory (snapshot, logs)
    pub state_dir: PathBuf,
    pub single_undo_window: Duration,
    pub bulk_undo_window: Duration,
    /// Countdown refresh interval
    pub tick: Duration,
    /// UTC offset of the civil day used by the default view window
    pub utc_offset_hours: i32,
}

/// On-disk form of [`Config`]. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    single_undo_secs: Option<u64>,
    bulk_undo_secs: Option<u64>,
    tick_ms: Option<u64>,
    utc_offset_hours: Option<i32>,
}

impl Config {
    /// Built-in defaults rooted at `state_dir`.
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            single_undo_window: UndoKind::Single.default_window(),
            bulk_undo_window: UndoKind::Bulk.default_window(),
            tick: Duration::from_secs(1),
            utc_offset_hours: CLINIC_UTC_OFFSET_HOURS,
        }
    }

    /// Load configuration for this process.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::new(env::state_dir()?);
        let path = config.state_dir.join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(text) => config.merge_toml(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(ConfigError::Io { path, source }),
        }
        config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply settings from TOML text over the current values.
    pub fn merge_toml(&mut self, text: &str) -> Result<(), ConfigError> {
        let file: FileConfig = toml::from_str(text)?;
        if let Some(secs) = file.single_undo_secs {
            self.single_undo_window = Duration::from_secs(secs);
        }
        if let Some(secs) = file.bulk_undo_secs {
            self.bulk_undo_window = Duration::from_secs(secs);
        }
        if let Some(ms) = file.tick_ms {
            self.tick = Duration::from_millis(ms);
        }
        if let Some(hours) = file.utc_offset_hours {
            self.utc_offset_hours = hours;
        }
        Ok(())
    }

    /// Apply `FD_*` environment overrides.
    pub fn merge_env(&mut self) {
        if let Some(window) = env::single_undo_window() {
            self.single_undo_window = window;
        }
        if let Some(window) = env::bulk_undo_window() {
            self.bulk_undo_window = window;
        }
        if let Some(tick) = env::tick_interval() {
            self.tick = tick;
        }
        if let Some(hours) = env::utc_offset_hours() {
            self.utc_offset_hours = hours;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.single_undo_window.is_zero() || self.bulk_undo_window.is_zero() {
            return Err(ConfigError::Invalid("undo windows must be positive".into()));
        }
        if self.tick.is_zero() {
            return Err(ConfigError::Invalid("tick interval must be positive".into()));
        }
        fixed_offset(self.utc_offset_hours).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    pub fn undo_window(&self, kind: UndoKind) -> Duration {
        match kind {
            UndoKind::Single => self.single_undo_window,
            UndoKind::Bulk => self.bulk_undo_window,
        }
    }

    /// Default view window: today at the clinic.
    pub fn view_window(&self) -> Window {
        Window::SinceLocalMidnight { utc_offset_hours: self.utc_offset_hours }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.state_dir.join("queue.snapshot")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
