// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline timers for the two undo slots.
//!
//! Each [`UndoKind`] has at most one expiry timer and one countdown tick.
//! Nothing here sleeps: the owner calls [`UndoScheduler::fire_due`] with the
//! current instant and waits until [`UndoScheduler::next_deadline`].

use fd_core::UndoKind;
use std::collections::HashMap;
use std::time::{Duration, Instant};

type ExpireFn = Box<dyn FnOnce(UndoKind) + Send>;

/// Shortest countdown cadence; smaller values are raised to this.
pub const MIN_TICK: Duration = Duration::from_millis(1);

struct Slot {
    deadline: Instant,
    /// `None` once the displayed countdown has reached zero
    next_tick: Option<Instant>,
    displayed: u64,
    on_expire: Option<ExpireFn>,
}

/// Timer work that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    /// Countdown refresh for display
    Tick { kind: UndoKind, remaining_secs: u64 },
    /// Deadline reached; the expiry callback has run
    Expired(UndoKind),
}

/// Expiry timers and countdown ticks, keyed by undo kind
pub struct UndoScheduler {
    tick: Duration,
    slots: HashMap<UndoKind, Slot>,
}

impl UndoScheduler {
    pub fn new(tick: Duration) -> Self {
        Self { tick: tick.max(MIN_TICK), slots: HashMap::new() }
    }

    /// Start the timers for `kind`, cancelling any already running.
    ///
    /// Returns true if a previous timer was replaced.
    pub fn arm<F>(&mut self, kind: UndoKind, window: Duration, now: Instant, on_expire: F) -> bool
    where
        F: FnOnce(UndoKind) + Send + 'static,
    {
        let replaced = self.cancel(kind);
        let displayed = ceil_secs(window);
        self.slots.insert(
            kind,
            Slot {
                deadline: now + window,
                next_tick: (displayed > 0).then(|| now + self.tick),
                displayed,
                on_expire: Some(Box::new(on_expire)),
            },
        );
        tracing::debug!(%kind, window_ms = window.as_millis() as u64, replaced, "armed undo timer");
        replaced
    }

    /// Stop both timers for `kind` without running the callback. Idempotent.
    pub fn cancel(&mut self, kind: UndoKind) -> bool {
        let cancelled = self.slots.remove(&kind).is_some();
        if cancelled {
            tracing::debug!(%kind, "cancelled undo timer");
        }
        cancelled
    }

    pub fn cancel_all(&mut self) {
        for kind in UndoKind::ALL {
            self.cancel(kind);
        }
    }

    pub fn is_armed(&self, kind: UndoKind) -> bool {
        self.slots.contains_key(&kind)
    }

    pub fn has_timers(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Last countdown value shown for `kind`
    pub fn displayed(&self, kind: UndoKind) -> Option<u64> {
        self.slots.get(&kind).map(|slot| slot.displayed)
    }

    /// Earliest instant at which [`fire_due`](Self::fire_due) has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots
            .values()
            .flat_map(|slot| [Some(slot.deadline), slot.next_tick].into_iter().flatten())
            .min()
    }

    /// Run everything due at `now`.
    ///
    /// Missed ticks collapse into a single [`Fired::Tick`] carrying the
    /// current remaining time. An expired slot reports only
    /// [`Fired::Expired`], after its callback has run exactly once.
    pub fn fire_due(&mut self, now: Instant) -> Vec<Fired> {
        let mut fired = Vec::new();
        for kind in UndoKind::ALL {
            let Some(slot) = self.slots.get_mut(&kind) else {
                continue;
            };

            if now >= slot.deadline {
                if let Some(slot) = self.slots.remove(&kind) {
                    if let Some(on_expire) = slot.on_expire {
                        on_expire(kind);
                    }
                }
                fired.push(Fired::Expired(kind));
                continue;
            }

            let Some(mut next_tick) = slot.next_tick else {
                continue;
            };
            if next_tick > now {
                continue;
            }
            // Skip every missed tick in one step, keeping the cadence
            let behind = now.saturating_duration_since(next_tick).as_nanos();
            let missed = behind / self.tick.as_nanos() + 1;
            next_tick += self.tick.saturating_mul(u32::try_from(missed).unwrap_or(u32::MAX));
            slot.displayed = ceil_secs(slot.deadline.saturating_duration_since(now));
            slot.next_tick = (slot.displayed > 0).then_some(next_tick);
            fired.push(Fired::Tick { kind, remaining_secs: slot.displayed });
        }
        fired
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
