// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue manager: the authoritative active view and its undo slots.
//!
//! Every mutation goes to the store first and touches the in-memory view
//! only once the store call has succeeded, so a store failure never leaves
//! the two diverged. Due timers are processed at the start of each
//! operation, which makes a racing undo and expiry resolve the same way
//! every time: whichever the clock says came first.

use fd_core::{
    next_ticket, validate_name, Clock, NewRecord, PendingUndo, QueueEvent, Record, RecordId,
    Services, Stage, Status, UndoKind, UndoResolution, UndoStatus, ValidationError,
};
use fd_storage::{RecordStore, StoreError};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::scheduler::{Fired, UndoScheduler};

/// Errors returned by queue operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("record not found: {0}")]
    NotFound(RecordId),
    #[error("the queue is already empty")]
    EmptyQueue,
    #[error("nothing to undo ({0})")]
    NoPendingUndo(UndoKind),
    #[error("ticket {ticket} is already in the queue")]
    TicketConflict { ticket: u32 },
    #[error("store error: {0}")]
    Store(StoreError),
    #[error("queue manager has shut down")]
    Closed,
}

impl From<StoreError> for QueueError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => QueueError::NotFound(id),
            other => QueueError::Store(other),
        }
    }
}

/// Optional subscriber for queue events.
#[derive(Clone, Default)]
struct EventSink(Option<mpsc::UnboundedSender<QueueEvent>>);

impl EventSink {
    fn emit(&self, event: QueueEvent) {
        tracing::debug!("{}", event.log_summary());
        if let Some(tx) = &self.0 {
            // A dropped receiver just means nobody is watching
            let _ = tx.send(event);
        }
    }
}

/// Owns the active records, ticket allocation and pending undos.
pub struct QueueManager<S: RecordStore, C: Clock> {
    store: S,
    clock: C,
    config: Config,
    /// Active records, ordered by ticket
    active: Vec<Record>,
    pending: HashMap<UndoKind, PendingUndo>,
    scheduler: UndoScheduler,
    events: EventSink,
}

impl<S: RecordStore, C: Clock> QueueManager<S, C> {
    /// Create a manager over a store known to be empty.
    pub fn new(store: S, clock: C, config: Config) -> Self {
        let scheduler = UndoScheduler::new(config.tick);
        Self {
            store,
            clock,
            config,
            active: Vec::new(),
            pending: HashMap::new(),
            scheduler,
            events: EventSink::default(),
        }
    }

    /// Create a manager and load the active view from the store.
    pub async fn open(store: S, clock: C, config: Config) -> Result<Self, QueueError> {
        let mut manager = Self::new(store, clock, config);
        manager.reload().await?;
        Ok(manager)
    }

    /// Route events to a new receiver, replacing any previous subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<QueueEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = EventSink(Some(tx));
        rx
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Active records ordered by ticket.
    pub fn list(&self) -> Vec<Record> {
        self.active.clone()
    }

    pub fn records(&self) -> &[Record] {
        &self.active
    }

    pub fn next_ticket(&self) -> u32 {
        next_ticket(self.active.iter().map(|r| r.ticket))
    }

    /// Admit a patient with the next ticket.
    pub async fn add(
        &mut self,
        name: &str,
        stage: Stage,
        services: Services,
    ) -> Result<Record, QueueError> {
        self.poll();
        let name = validate_name(name)?;
        if services.is_empty() {
            return Err(ValidationError::NoServices.into());
        }

        let new = NewRecord {
            name,
            stage,
            services,
            status: Status::Waiting,
            ticket: self.next_ticket(),
            inserted_at_ms: self.clock.epoch_ms(),
        };
        let id = self.store.insert(&new).await?;
        let record = Record::new(id, new);
        self.insert_active(record.clone());

        info!(id = %record.id, ticket = record.ticket, stage = %record.stage, "admitted");
        self.events.emit(QueueEvent::RecordAdmitted { record: record.clone() });
        Ok(record)
    }

    pub async fn set_status(&mut self, id: RecordId, status: Status) -> Result<Record, QueueError> {
        self.poll();
        self.position(id)?;
        if let Err(e) = self.store.update_status(id, status).await {
            return Err(self.store_failure(id, e));
        }

        let pos = self.position(id)?;
        let record = &mut self.active[pos];
        record.status = status;
        let record = record.clone();

        info!(id = %id, ticket = record.ticket, %status, "status changed");
        self.events.emit(QueueEvent::StatusChanged { id, ticket: record.ticket, status });
        Ok(record)
    }

    /// Flip between waiting and done.
    pub async fn toggle_status(&mut self, id: RecordId) -> Result<Record, QueueError> {
        let current = self.active[self.position(id)?].status;
        self.set_status(id, current.toggled()).await
    }

    /// Remove one record and arm the single undo.
    ///
    /// A single undo that is still pending is superseded: its snapshot is
    /// dropped and can no longer be restored.
    pub async fn delete_one(&mut self, id: RecordId) -> Result<Record, QueueError> {
        self.poll();
        self.position(id)?;
        if let Err(e) = self.store.delete_by_id(id).await {
            return Err(self.store_failure(id, e));
        }

        let pos = self.position(id)?;
        let record = self.active.remove(pos);
        info!(id = %id, ticket = record.ticket, "deleted");
        self.events.emit(QueueEvent::RecordDeleted { record: record.clone() });
        self.arm(UndoKind::Single, vec![record.to_new()]);
        Ok(record)
    }

    /// Clear the queue and arm the bulk undo. Returns what was removed.
    ///
    /// The undo snapshot is read from the store, so records admitted by
    /// another desk since the last reload are restorable too.
    pub async fn delete_all(&mut self) -> Result<Vec<Record>, QueueError> {
        self.poll();
        let mut snapshot = self.store.select_all_ordered_by_ticket().await?;
        if snapshot.is_empty() {
            return Err(QueueError::EmptyQueue);
        }
        snapshot.sort_by_key(|r| (r.ticket, r.id));

        let removed = self.store.delete_all().await?;
        if removed != snapshot.len() {
            warn!(removed, read = snapshot.len(), "store changed between read and clear");
        }
        if snapshot.len() != self.active.len() {
            let (view, store) = (self.active.len(), snapshot.len());
            info!(view, store, "clearing records not in view");
        }
        self.active.clear();

        info!(count = snapshot.len(), "queue cleared");
        self.events.emit(QueueEvent::QueueCleared { count: snapshot.len() });
        self.arm(UndoKind::Bulk, snapshot.iter().map(Record::to_new).collect());
        Ok(snapshot)
    }

    /// Restore the snapshot held by the `kind` slot.
    ///
    /// Restored records get fresh ids but keep their ticket and admission
    /// time. If any snapshot ticket is held by an active record the undo is
    /// refused with [`QueueError::TicketConflict`] and stays armed.
    pub async fn undo(&mut self, kind: UndoKind) -> Result<Vec<Record>, QueueError> {
        self.poll();
        let Some(pending) = self.pending.get(&kind) else {
            return Err(QueueError::NoPendingUndo(kind));
        };

        let held: HashSet<u32> = self.active.iter().map(|r| r.ticket).collect();
        if let Some(ticket) = pending.snapshot.iter().map(|r| r.ticket).find(|t| held.contains(t)) {
            warn!(%kind, ticket, "undo refused: ticket reissued since deletion");
            return Err(QueueError::TicketConflict { ticket });
        }

        let Some(pending) = self.pending.remove(&kind) else {
            return Err(QueueError::NoPendingUndo(kind));
        };
        let deadline = pending.deadline;
        let mut restored = Vec::with_capacity(pending.snapshot.len());
        let mut remaining = pending.snapshot.into_iter();

        while let Some(new) = remaining.next() {
            match self.store.insert(&new).await {
                Ok(id) => {
                    let record = Record::new(id, new);
                    self.insert_active(record.clone());
                    self.events.emit(QueueEvent::RecordRestored { record: record.clone() });
                    restored.push(record);
                }
                Err(e) => {
                    // Keep what is left so a retry can finish the job
                    let snapshot: Vec<NewRecord> = std::iter::once(new).chain(remaining).collect();
                    warn!(
                        %kind,
                        restored = restored.len(),
                        left = snapshot.len(),
                        error = %e,
                        "undo interrupted by store failure"
                    );
                    self.pending.insert(kind, PendingUndo { kind, snapshot, deadline });
                    return Err(e.into());
                }
            }
        }

        self.scheduler.cancel(kind);
        info!(%kind, count = restored.len(), "undo restored records");
        self.events.emit(QueueEvent::UndoResolved {
            kind,
            resolution: UndoResolution::Restored,
            records: restored.len(),
        });
        Ok(restored)
    }

    /// Drop a pending undo without restoring it. No-op when none is pending.
    pub fn dismiss_undo(&mut self, kind: UndoKind) {
        self.poll();
        let Some(pending) = self.pending.remove(&kind) else {
            return;
        };
        self.scheduler.cancel(kind);
        info!(%kind, records = pending.snapshot.len(), "undo dismissed");
        self.events.emit(QueueEvent::UndoResolved {
            kind,
            resolution: UndoResolution::Dismissed,
            records: pending.snapshot.len(),
        });
    }

    /// Display view of the `kind` slot, if armed and not yet expired.
    pub fn pending_undo(&mut self, kind: UndoKind) -> Option<UndoStatus> {
        self.poll();
        let now = self.clock.now();
        self.pending.get(&kind).map(|pending| pending.status(now))
    }

    /// Process due timers: drop expired snapshots and emit countdown ticks.
    pub fn poll(&mut self) -> Vec<Fired> {
        let fired = self.scheduler.fire_due(self.clock.now());
        for f in &fired {
            match *f {
                Fired::Expired(kind) => {
                    let Some(pending) = self.pending.remove(&kind) else {
                        continue;
                    };
                    let records = pending.snapshot.len();
                    info!(%kind, records, "undo window expired");
                    self.events.emit(QueueEvent::UndoResolved {
                        kind,
                        resolution: UndoResolution::Expired,
                        records,
                    });
                }
                Fired::Tick { kind, remaining_secs } => {
                    self.events.emit(QueueEvent::UndoTick { kind, remaining_secs });
                }
            }
        }
        fired
    }

    /// When [`poll`](Self::poll) next has work.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Replace the active view with a full re-read of the store.
    pub async fn reload(&mut self) -> Result<usize, QueueError> {
        let records = self.store.select_all_ordered_by_ticket().await?;
        self.active = records;
        self.active.sort_by_key(|r| (r.ticket, r.id));
        let count = self.active.len();
        info!(count, "active view loaded from store");
        self.events.emit(QueueEvent::QueueReloaded { count });
        Ok(count)
    }

    /// Cancel every timer and drop pending snapshots.
    pub fn close(&mut self) {
        self.scheduler.cancel_all();
        let dropped: usize = self.pending.drain().map(|(_, p)| p.snapshot.len()).sum();
        info!(dropped, "queue manager closed");
    }

    fn arm(&mut self, kind: UndoKind, snapshot: Vec<NewRecord>) {
        let now = self.clock.now();
        let window = self.config.undo_window(kind);

        if let Some(old) = self.pending.remove(&kind) {
            warn!(
                %kind,
                records = old.snapshot.len(),
                "pending undo superseded; earlier snapshot discarded"
            );
            self.events.emit(QueueEvent::UndoResolved {
                kind,
                resolution: UndoResolution::Superseded,
                records: old.snapshot.len(),
            });
        }

        let records = snapshot.len();
        self.pending.insert(kind, PendingUndo::new(kind, snapshot, now, window));

        // Expiry is reported by poll(), which sees what is still pending
        self.scheduler.arm(kind, window, now, |kind| {
            tracing::debug!(%kind, "undo deadline reached");
        });
        self.events.emit(QueueEvent::UndoArmed { kind, records, window_secs: window.as_secs() });
    }

    fn position(&self, id: RecordId) -> Result<usize, QueueError> {
        self.active.iter().position(|r| r.id == id).ok_or(QueueError::NotFound(id))
    }

    fn insert_active(&mut self, record: Record) {
        let key = (record.ticket, record.id);
        let pos = self.active.partition_point(|r| (r.ticket, r.id) < key);
        self.active.insert(pos, record);
    }

    /// Map a failed single-record store call. A record the store no longer
    /// has is dropped from the view so the two agree again.
    fn store_failure(&mut self, id: RecordId, e: StoreError) -> QueueError {
        if matches!(e, StoreError::NotFound(_)) {
            if let Ok(pos) = self.position(id) {
                let record = self.active.remove(pos);
                warn!(
                    id = %id,
                    ticket = record.ticket,
                    "record missing from store; dropped from view"
                );
            }
        } else {
            warn!(id = %id, error = %e, "store call failed");
        }
        e.into()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
