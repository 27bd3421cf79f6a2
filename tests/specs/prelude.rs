// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the specs.

pub use fd_core::test_support::services;
pub use fd_core::{
    Clock, FakeClock, QueueEvent, Record, Service, Services, Stage, Status, UndoKind,
    UndoResolution, Window,
};
pub use fd_engine::{Config, QueueError, QueueManager};
pub use fd_storage::{FileStore, MemoryStore, RecordStore};
pub use tempfile::TempDir;

/// A front desk wired to a fake clock and a store.
pub struct Desk<S: RecordStore> {
    pub queue: QueueManager<S, FakeClock>,
    pub clock: FakeClock,
    pub store: S,
}

impl Desk<MemoryStore> {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let clock = FakeClock::new();
        let queue = QueueManager::new(store.clone(), clock.clone(), Config::new("/tmp/fd-specs"));
        Self { queue, clock, store }
    }
}

impl Desk<FileStore> {
    /// Open (or reopen) a desk whose store lives in `dir`.
    pub async fn on_disk(dir: &TempDir, clock: FakeClock) -> Self {
        let config = Config::new(dir.path());
        let store = FileStore::open(config.snapshot_path()).unwrap();
        let queue = QueueManager::open(store.clone(), clock.clone(), config).await.unwrap();
        Self { queue, clock, store }
    }
}

impl<S: RecordStore> Desk<S> {
    pub async fn admit(&mut self, name: &str) -> Record {
        self.queue.add(name, Stage::Cusub, services(&[Service::Gelin])).await.unwrap()
    }

    pub async fn admit_all(&mut self, names: &[&str]) -> Vec<Record> {
        let mut out = Vec::new();
        for name in names {
            out.push(self.admit(name).await);
        }
        out
    }

    /// `(ticket, name)` pairs of the active view
    pub fn board(&self) -> Vec<(u32, String)> {
        self.queue.list().into_iter().map(|r| (r.ticket, r.name)).collect()
    }
}
