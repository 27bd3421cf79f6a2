// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process record store.

use async_trait::async_trait;
use fd_core::{NewRecord, Record, RecordId, Status};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::store::{RecordStore, StoreError};
use crate::table::Table;

/// Store operation, used to target injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Insert,
    UpdateStatus,
    DeleteById,
    DeleteAll,
    Select,
}

#[derive(Debug)]
struct Fault {
    op: StoreOp,
    /// Calls of `op` to let through before failing
    skip: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    table: Table,
    faults: Vec<Fault>,
}

impl MemoryState {
    fn check(&mut self, op: StoreOp) -> Result<(), StoreError> {
        let Some(pos) = self.faults.iter().position(|f| f.op == op) else {
            return Ok(());
        };
        if self.faults[pos].skip > 0 {
            self.faults[pos].skip -= 1;
            return Ok(());
        }
        self.faults.remove(pos);
        Err(StoreError::Unavailable(format!("injected {op:?} failure")))
    }
}

/// Record store held entirely in memory. Clones share the same table.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.inner.lock().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored records in ticket order, bypassing fault injection.
    pub fn records(&self) -> Vec<Record> {
        self.inner.lock().table.ordered()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryStore {
    /// Fail the next call of `op`.
    pub fn fail_next(&self, op: StoreOp) {
        self.fail_after(op, 0);
    }

    /// Let `skip` calls of `op` succeed, then fail the one after.
    pub fn fail_after(&self, op: StoreOp, skip: usize) {
        self.inner.lock().faults.push(Fault { op, skip });
    }

    /// Insert directly, as another front-desk terminal would.
    pub fn insert_external(&self, record: &NewRecord) -> RecordId {
        self.inner.lock().table.insert(record)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: &NewRecord) -> Result<RecordId, StoreError> {
        let mut state = self.inner.lock();
        state.check(StoreOp::Insert)?;
        Ok(state.table.insert(record))
    }

    async fn update_status(&self, id: RecordId, status: Status) -> Result<(), StoreError> {
        let mut state = self.inner.lock();
        state.check(StoreOp::UpdateStatus)?;
        state.table.update_status(id, status)
    }

    async fn delete_by_id(&self, id: RecordId) -> Result<(), StoreError> {
        let mut state = self.inner.lock();
        state.check(StoreOp::DeleteById)?;
        state.table.delete(id)
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        let mut state = self.inner.lock();
        state.check(StoreOp::DeleteAll)?;
        Ok(state.table.delete_all())
    }

    async fn select_all_ordered_by_ticket(&self) -> Result<Vec<Record>, StoreError> {
        let mut state = self.inner.lock();
        state.check(StoreOp::Select)?;
        Ok(state.table.ordered())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
