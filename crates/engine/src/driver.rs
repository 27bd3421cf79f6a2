// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Async driver: runs a [`QueueManager`] on its own task.
//!
//! The task owns the manager outright. Commands and timer wake-ups are
//! handled one at a time, so no operation ever observes another half-done.

use fd_core::{Clock, Record, RecordId, Services, Stage, Status, UndoKind, UndoStatus};
use fd_storage::RecordStore;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::manager::{QueueError, QueueManager};

type Reply<T> = oneshot::Sender<Result<T, QueueError>>;

enum Command {
    List(oneshot::Sender<Vec<Record>>),
    NextTicket(oneshot::Sender<u32>),
    Add { name: String, stage: Stage, services: Services, reply: Reply<Record> },
    SetStatus { id: RecordId, status: Status, reply: Reply<Record> },
    ToggleStatus { id: RecordId, reply: Reply<Record> },
    DeleteOne { id: RecordId, reply: Reply<Record> },
    DeleteAll(Reply<Vec<Record>>),
    Undo { kind: UndoKind, reply: Reply<Vec<Record>> },
    DismissUndo { kind: UndoKind, reply: oneshot::Sender<()> },
    PendingUndo { kind: UndoKind, reply: oneshot::Sender<Option<UndoStatus>> },
    Reload(Reply<usize>),
}

/// Cloneable handle to a running queue task.
///
/// The task shuts down, cancelling every undo timer, once the last handle
/// is dropped.
#[derive(Clone)]
pub struct QueueHandle {
    tx: mpsc::Sender<Command>,
}

/// Move `manager` onto a new task.
pub fn spawn<S, C>(manager: QueueManager<S, C>) -> (QueueHandle, JoinHandle<()>)
where
    S: RecordStore,
    C: Clock,
{
    let (tx, rx) = mpsc::channel(64);
    let task = tokio::spawn(run(manager, rx));
    (QueueHandle { tx }, task)
}

async fn run<S: RecordStore, C: Clock>(
    mut manager: QueueManager<S, C>,
    mut rx: mpsc::Receiver<Command>,
) {
    loop {
        let wake = manager
            .next_wakeup()
            .map(|at| at.saturating_duration_since(manager.clock().now()));

        tokio::select! {
            cmd = rx.recv() => match cmd {
                Some(cmd) => handle(&mut manager, cmd).await,
                None => break,
            },
            _ = sleep_for(wake) => {
                manager.poll();
            }
        }
    }
    debug!("all queue handles dropped");
    manager.close();
}

async fn sleep_for(wake: Option<Duration>) {
    match wake {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}

async fn handle<S: RecordStore, C: Clock>(manager: &mut QueueManager<S, C>, cmd: Command) {
    // A caller that gave up waiting is not an error
    match cmd {
        Command::List(reply) => {
            manager.poll();
            let _ = reply.send(manager.list());
        }
        Command::NextTicket(reply) => {
            let _ = reply.send(manager.next_ticket());
        }
        Command::Add { name, stage, services, reply } => {
            let _ = reply.send(manager.add(&name, stage, services).await);
        }
        Command::SetStatus { id, status, reply } => {
            let _ = reply.send(manager.set_status(id, status).await);
        }
        Command::ToggleStatus { id, reply } => {
            let _ = reply.send(manager.toggle_status(id).await);
        }
        Command::DeleteOne { id, reply } => {
            let _ = reply.send(manager.delete_one(id).await);
        }
        Command::DeleteAll(reply) => {
            let _ = reply.send(manager.delete_all().await);
        }
        Command::Undo { kind, reply } => {
            let _ = reply.send(manager.undo(kind).await);
        }
        Command::DismissUndo { kind, reply } => {
            manager.dismiss_undo(kind);
            let _ = reply.send(());
        }
        Command::PendingUndo { kind, reply } => {
            let _ = reply.send(manager.pending_undo(kind));
        }
        Command::Reload(reply) => {
            let _ = reply.send(manager.reload().await);
        }
    }
}

impl QueueHandle {
    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, QueueError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).await.map_err(|_| QueueError::Closed)?;
        rx.await.map_err(|_| QueueError::Closed)
    }

    pub async fn list(&self) -> Result<Vec<Record>, QueueError> {
        self.call(Command::List).await
    }

    pub async fn next_ticket(&self) -> Result<u32, QueueError> {
        self.call(Command::NextTicket).await
    }

    pub async fn add(
        &self,
        name: impl Into<String>,
        stage: Stage,
        services: Services,
    ) -> Result<Record, QueueError> {
        let name = name.into();
        self.call(|reply| Command::Add { name, stage, services, reply }).await?
    }

    pub async fn set_status(&self, id: RecordId, status: Status) -> Result<Record, QueueError> {
        self.call(|reply| Command::SetStatus { id, status, reply }).await?
    }

    pub async fn toggle_status(&self, id: RecordId) -> Result<Record, QueueError> {
        self.call(|reply| Command::ToggleStatus { id, reply }).await?
    }

    pub async fn delete_one(&self, id: RecordId) -> Result<Record, QueueError> {
        self.call(|reply| Command::DeleteOne { id, reply }).await?
    }

    pub async fn delete_all(&self) -> Result<Vec<Record>, QueueError> {
        self.call(Command::DeleteAll).await?
    }

    pub async fn undo(&self, kind: UndoKind) -> Result<Vec<Record>, QueueError> {
        self.call(|reply| Command::Undo { kind, reply }).await?
    }

    pub async fn dismiss_undo(&self, kind: UndoKind) -> Result<(), QueueError> {
        self.call(|reply| Command::DismissUndo { kind, reply }).await
    }

    pub async fn pending_undo(&self, kind: UndoKind) -> Result<Option<UndoStatus>, QueueError> {
        self.call(|reply| Command::PendingUndo { kind, reply }).await
    }

    pub async fn reload(&self) -> Result<usize, QueueError> {
        self.call(Command::Reload).await?
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
