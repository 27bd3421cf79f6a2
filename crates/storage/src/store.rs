// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable record store contract.

use async_trait::async_trait;
use fd_core::{NewRecord, Record, RecordId, Status};
use thiserror::Error;

use crate::snapshot::SnapshotError;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(RecordId),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage keyed by record id.
///
/// The store assigns ids on insert and never hands the same id out twice.
/// Implementations must not partially apply a failed call.
#[async_trait]
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Persist a new record and return its id
    async fn insert(&self, record: &NewRecord) -> Result<RecordId, StoreError>;

    async fn update_status(&self, id: RecordId, status: Status) -> Result<(), StoreError>;

    async fn delete_by_id(&self, id: RecordId) -> Result<(), StoreError>;

    /// Remove every record, returning how many were removed
    async fn delete_all(&self) -> Result<usize, StoreError>;

    /// Full scan ordered by ticket ascending
    async fn select_all_ordered_by_ticket(&self) -> Result<Vec<Record>, StoreError>;
}
