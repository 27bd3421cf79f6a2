// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot-backed durable store.

use async_trait::async_trait;
use fd_core::{NewRecord, Record, RecordId, Status};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::snapshot::{rotate_bak_path, Snapshot, SnapshotError};
use crate::store::{RecordStore, StoreError};
use crate::table::Table;

/// Record store persisted as a single snapshot file.
///
/// Every mutation is applied to a copy of the table, written to disk, and
/// only then committed in memory, so a failed write leaves both sides
/// unchanged.
#[derive(Clone)]
pub struct FileStore {
    path: Arc<PathBuf>,
    table: Arc<Mutex<Table>>,
}

impl FileStore {
    /// Open the store at `path`, loading an existing snapshot if present.
    ///
    /// A snapshot that cannot be decoded is moved aside to a `.bak` file and
    /// the store starts empty. IO errors are returned as-is.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = match Snapshot::load(&path) {
            Ok(Some(snapshot)) => {
                info!(path = %path.display(), records = snapshot.records.len(), "loaded snapshot");
                Table::from_parts(snapshot.next_id, snapshot.records)
            }
            Ok(None) => Table::default(),
            Err(SnapshotError::Io(e)) => return Err(SnapshotError::Io(e).into()),
            Err(e) => {
                let bak = rotate_bak_path(&path);
                warn!(
                    path = %path.display(),
                    bak = %bak.display(),
                    error = %e,
                    "unreadable snapshot moved aside"
                );
                std::fs::rename(&path, &bak).map_err(SnapshotError::from)?;
                Table::default()
            }
        };
        Ok(Self { path: Arc::new(path), table: Arc::new(Mutex::new(table)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Table) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.table.lock();
        let mut next = guard.clone();
        let out = mutate(&mut next)?;
        Snapshot::new(next.next_id(), next.ordered()).save(&self.path)?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn insert(&self, record: &NewRecord) -> Result<RecordId, StoreError> {
        self.commit(|table| Ok(table.insert(record)))
    }

    async fn update_status(&self, id: RecordId, status: Status) -> Result<(), StoreError> {
        self.commit(|table| table.update_status(id, status))
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<(), StoreError> {
        self.commit(|table| table.delete(id))
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        self.commit(|table| Ok(table.delete_all()))
    }

    async fn select_all_ordered_by_ticket(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.table.lock().ordered())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
