// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for processes embedding the engine.

use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::env;

/// Log file name prefix inside the log directory
pub const LOG_FILE: &str = "frontdesk.log";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to create log directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Build the filter from `FD_LOG`, quieting dependencies below `warn`.
pub fn build_filter(level: &str) -> Result<EnvFilter, LogError> {
    let directives = format!("warn,fd_core={level},fd_storage={level},fd_engine={level}");
    let directives = if level.contains('=') || level.contains(',') {
        // Full directive string supplied; use it verbatim
        level.to_string()
    } else {
        directives
    };
    EnvFilter::try_new(&directives)
        .map_err(|e| LogError::Filter { filter: directives, reason: e.to_string() })
}

/// Install a non-blocking daily-rolling file subscriber under the state dir.
///
/// The returned guard flushes buffered lines when dropped; hold it for the
/// life of the process.
pub fn init(config: &Config) -> Result<WorkerGuard, LogError> {
    init_in(&config.log_dir(), &env::log_filter())
}

pub fn init_in(log_dir: &Path, level: &str) -> Result<WorkerGuard, LogError> {
    std::fs::create_dir_all(log_dir)?;
    let filter = build_filter(level)?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LogError::AlreadyInstalled)?;

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
