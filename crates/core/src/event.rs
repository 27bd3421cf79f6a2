// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifications emitted by the queue manager.

use crate::record::{Record, RecordId, Status};
use crate::time_fmt::format_elapsed;
use crate::undo::{UndoKind, UndoResolution};
use serde::{Deserialize, Serialize};

/// Something observable happened to the queue.
///
/// Serializes with `{"type": "noun:verb", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QueueEvent {
    #[serde(rename = "record:admitted")]
    RecordAdmitted { record: Record },

    #[serde(rename = "record:status")]
    StatusChanged { id: RecordId, ticket: u32, status: Status },

    #[serde(rename = "record:deleted")]
    RecordDeleted { record: Record },

    #[serde(rename = "record:restored")]
    RecordRestored { record: Record },

    #[serde(rename = "queue:cleared")]
    QueueCleared { count: usize },

    /// Active view replaced by a full re-read of the store
    #[serde(rename = "queue:reloaded")]
    QueueReloaded { count: usize },

    #[serde(rename = "undo:armed")]
    UndoArmed { kind: UndoKind, records: usize, window_secs: u64 },

    /// Once-per-second countdown for display
    #[serde(rename = "undo:tick")]
    UndoTick { kind: UndoKind, remaining_secs: u64 },

    #[serde(rename = "undo:resolved")]
    UndoResolved { kind: UndoKind, resolution: UndoResolution, records: usize },
}

impl QueueEvent {
    pub fn name(&self) -> &'static str {
        match self {
            QueueEvent::RecordAdmitted { .. } => "record:admitted",
            QueueEvent::StatusChanged { .. } => "record:status",
            QueueEvent::RecordDeleted { .. } => "record:deleted",
            QueueEvent::RecordRestored { .. } => "record:restored",
            QueueEvent::QueueCleared { .. } => "queue:cleared",
            QueueEvent::QueueReloaded { .. } => "queue:reloaded",
            QueueEvent::UndoArmed { .. } => "undo:armed",
            QueueEvent::UndoTick { .. } => "undo:tick",
            QueueEvent::UndoResolved { .. } => "undo:resolved",
        }
    }

    /// One-line `name key=value` summary for logs.
    pub fn log_summary(&self) -> String {
        let name = self.name();
        match self {
            QueueEvent::RecordAdmitted { record }
            | QueueEvent::RecordDeleted { record }
            | QueueEvent::RecordRestored { record } => {
                format!("{name} id={} ticket={}", record.id, record.ticket)
            }
            QueueEvent::StatusChanged { id, ticket, status } => {
                format!("{name} id={id} ticket={ticket} status={status}")
            }
            QueueEvent::QueueCleared { count } | QueueEvent::QueueReloaded { count } => {
                format!("{name} count={count}")
            }
            QueueEvent::UndoArmed { kind, records, window_secs } => {
                let window = format_elapsed(*window_secs);
                format!("{name} kind={kind} records={records} window={window}")
            }
            QueueEvent::UndoTick { kind, remaining_secs } => {
                format!("{name} kind={kind} remaining={remaining_secs}s")
            }
            QueueEvent::UndoResolved { kind, resolution, records } => {
                format!("{name} kind={kind} resolution={resolution} records={records}")
            }
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
