// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Record stores for the frontdesk queue

mod file;
mod memory;
mod snapshot;
mod store;
mod table;

pub use file::FileStore;
pub use memory::{MemoryStore, StoreOp};
pub use snapshot::{Snapshot, SnapshotError, CURRENT_SNAPSHOT_VERSION};
pub use store::{RecordStore, StoreError};
