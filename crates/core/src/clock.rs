// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Injected time source.
//!
//! Undo deadlines are measured on the monotonic [`Instant`] axis while
//! admission timestamps use wall-clock epoch milliseconds. Both come from the
//! same [`Clock`] so a [`FakeClock`] can move them together in tests.

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_ms(&self) -> u64;

    /// Wall-clock time as a UTC timestamp.
    fn utc_now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.epoch_ms() as i64).single().unwrap_or_default()
    }
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Fake clock for tests. Clones share the same time.
#[derive(Clone, Debug)]
pub struct FakeClock {
    inner: Arc<Mutex<FakeTime>>,
}

#[derive(Debug)]
struct FakeTime {
    instant: Instant,
    epoch_ms: u64,
}

/// 2026-03-02T09:00:00Z, a Monday morning at the clinic.
const DEFAULT_EPOCH_MS: u64 = 1_772_442_000_000;

impl FakeClock {
    pub fn new() -> Self {
        Self::at_epoch_ms(DEFAULT_EPOCH_MS)
    }

    /// Start the fake wall clock at the given epoch milliseconds.
    pub fn at_epoch_ms(epoch_ms: u64) -> Self {
        Self { inner: Arc::new(Mutex::new(FakeTime { instant: Instant::now(), epoch_ms })) }
    }

    /// Advance both the monotonic and the wall clock.
    pub fn advance(&self, duration: Duration) {
        let mut t = self.inner.lock();
        t.instant += duration;
        t.epoch_ms += duration.as_millis() as u64;
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Move only the wall clock, leaving the monotonic clock untouched.
    pub fn set_epoch_ms(&self, ms: u64) {
        self.inner.lock().epoch_ms = ms;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.lock().instant
    }

    fn epoch_ms(&self) -> u64 {
        self.inner.lock().epoch_ms
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
