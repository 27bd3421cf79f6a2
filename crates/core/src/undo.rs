// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending-undo slots.
//!
//! A deletion arms one slot per [`UndoKind`]. The slot ends in exactly one
//! [`UndoResolution`]; the deadline is authoritative and the remaining
//! seconds are derived from it for display.

use crate::record::NewRecord;
use crate::time_fmt::format_countdown;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Which deletion an undo reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoKind {
    /// One record removed from the queue
    Single,
    /// The whole queue cleared
    Bulk,
}

impl UndoKind {
    pub const ALL: [UndoKind; 2] = [UndoKind::Single, UndoKind::Bulk];

    /// Default grace window: 30 seconds for a single record, 10 minutes for
    /// a cleared queue.
    pub fn default_window(self) -> Duration {
        match self {
            UndoKind::Single => Duration::from_secs(30),
            UndoKind::Bulk => Duration::from_secs(600),
        }
    }
}

crate::simple_display! {
    UndoKind {
        Single => "single",
        Bulk => "bulk",
    }
}

/// Terminal state of a pending undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoResolution {
    Restored,
    Expired,
    /// Replaced by a newer deletion of the same kind; the snapshot is lost
    Superseded,
    Dismissed,
}

crate::simple_display! {
    UndoResolution {
        Restored => "restored",
        Expired => "expired",
        Superseded => "superseded",
        Dismissed => "dismissed",
    }
}

/// Snapshot of deleted records awaiting undo.
#[derive(Debug, Clone)]
pub struct PendingUndo {
    pub kind: UndoKind,
    /// Deleted records without their ids, in ticket order
    pub snapshot: Vec<NewRecord>,
    pub deadline: Instant,
}

impl PendingUndo {
    pub fn new(kind: UndoKind, snapshot: Vec<NewRecord>, now: Instant, window: Duration) -> Self {
        Self { kind, snapshot, deadline: now + window }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Whole seconds left, rounded up so a live slot never shows `00:00`.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let remaining = self.remaining(now);
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    pub fn status(&self, now: Instant) -> UndoStatus {
        UndoStatus {
            kind: self.kind,
            records: self.snapshot.len(),
            remaining_secs: self.remaining_secs(now),
        }
    }
}

/// Display view of a pending undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoStatus {
    pub kind: UndoKind,
    pub records: usize,
    pub remaining_secs: u64,
}

impl UndoStatus {
    /// `mm:ss` label for the undo toast.
    pub fn countdown(&self) -> String {
        format_countdown(self.remaining_secs)
    }
}

#[cfg(test)]
#[path = "undo_tests.rs"]
mod tests;
