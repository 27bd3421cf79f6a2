// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk snapshot of the record table.
//!
//! The whole table is written as zstd-compressed JSON to a temp file and
//! renamed into place, so a crash leaves either the old or the new snapshot.

use chrono::{DateTime, Utc};
use fd_core::Record;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const ZSTD_LEVEL: i32 = 3;
const MAX_BAK_FILES: u32 = 3;

/// Errors that can occur in snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt snapshot: {0}")]
    Decode(String),
    #[error("unsupported snapshot version {0} (expected {CURRENT_SNAPSHOT_VERSION})")]
    UnsupportedVersion(u32),
}

/// The complete record table at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version
    #[serde(rename = "v")]
    pub version: u32,
    /// Next id the store will assign
    pub next_id: u64,
    /// Records in ticket order
    pub records: Vec<Record>,
    pub saved_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(next_id: u64, records: Vec<Record>) -> Self {
        Self { version: CURRENT_SNAPSHOT_VERSION, next_id, records, saved_at: Utc::now() }
    }

    /// Load a snapshot, or `None` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, SnapshotError> {
        let compressed = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let json = zstd::decode_all(compressed.as_slice())
            .map_err(|e| SnapshotError::Decode(e.to_string()))?;
        let snapshot: Snapshot = serde_json::from_slice(&json)?;
        if snapshot.version != CURRENT_SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(Some(snapshot))
    }

    /// Write atomically: temp file, fsync, rename.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(self)?;
        let compressed = zstd::encode_all(json.as_slice(), ZSTD_LEVEL)?;

        let tmp = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&compressed)?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
