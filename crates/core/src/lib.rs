// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fd-core: Core types for the frontdesk patient queue

pub mod macros;

pub mod clock;
pub mod event;
pub mod record;
pub mod time_fmt;
pub mod undo;
pub mod window;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use event::QueueEvent;
#[cfg(any(test, feature = "test-support"))]
pub use record::NewRecordBuilder;
pub use record::{
    next_ticket, validate_name, NewRecord, Record, RecordId, Service, Services, Stage, Status,
    ValidationError,
};
pub use time_fmt::{format_countdown, format_elapsed};
pub use undo::{PendingUndo, UndoKind, UndoResolution, UndoStatus};
pub use window::{group_by_day, search, Window, WindowError};
