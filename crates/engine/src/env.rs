// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigError;

/// Resolve state directory: FD_STATE_DIR > XDG_STATE_HOME/frontdesk > ~/.local/state/frontdesk
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("FD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("frontdesk"));
    }
    let home = std::env::var("HOME").map_err(|_| ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/frontdesk"))
}

/// Single-record undo window override
pub fn single_undo_window() -> Option<Duration> {
    secs_var("FD_SINGLE_UNDO_SECS")
}

/// Bulk undo window override
pub fn bulk_undo_window() -> Option<Duration> {
    secs_var("FD_BULK_UNDO_SECS")
}

/// Countdown tick interval override
pub fn tick_interval() -> Option<Duration> {
    std::env::var("FD_TICK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// UTC offset of the clinic's civil day
pub fn utc_offset_hours() -> Option<i32> {
    std::env::var("FD_UTC_OFFSET_HOURS").ok().and_then(|s| s.parse::<i32>().ok())
}

/// Tracing filter directive (default `info`)
pub fn log_filter() -> String {
    std::env::var("FD_LOG").ok().filter(|s| !s.is_empty()).unwrap_or_else(|| "info".to_string())
}

fn secs_var(name: &str) -> Option<Duration> {
    std::env::var(name).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_secs)
}
