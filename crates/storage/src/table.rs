// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory table shared by the store implementations.

use fd_core::{NewRecord, Record, RecordId, Status};
use std::collections::BTreeMap;

use crate::store::StoreError;

#[derive(Debug, Clone)]
pub(crate) struct Table {
    rows: BTreeMap<RecordId, Record>,
    /// Next id to hand out. Only grows, so ids survive delete-all unreused.
    next_id: u64,
}

impl Default for Table {
    fn default() -> Self {
        Self { rows: BTreeMap::new(), next_id: 1 }
    }
}

impl Table {
    /// Rebuild from persisted parts. `next_id` is raised past every stored id.
    pub(crate) fn from_parts(next_id: u64, records: Vec<Record>) -> Self {
        let max_id = records.iter().map(|r| r.id.get()).max().unwrap_or(0);
        let rows = records.into_iter().map(|r| (r.id, r)).collect();
        Self { rows, next_id: next_id.max(max_id + 1) }
    }

    pub(crate) fn insert(&mut self, record: &NewRecord) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.rows.insert(id, Record::new(id, record.clone()));
        id
    }

    pub(crate) fn update_status(&mut self, id: RecordId, status: Status) -> Result<(), StoreError> {
        let row = self.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.status = status;
        Ok(())
    }

    pub(crate) fn delete(&mut self, id: RecordId) -> Result<(), StoreError> {
        self.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }

    pub(crate) fn delete_all(&mut self) -> usize {
        let count = self.rows.len();
        self.rows.clear();
        count
    }

    /// Rows by ticket, ties broken by id
    pub(crate) fn ordered(&self) -> Vec<Record> {
        let mut records: Vec<Record> = self.rows.values().cloned().collect();
        records.sort_by_key(|r| (r.ticket, r.id));
        records
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
