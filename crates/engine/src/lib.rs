// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fd-engine: Queue manager, undo timers and the async driver

pub mod config;
pub mod driver;
pub mod env;
pub mod logging;
mod manager;
mod scheduler;

pub use config::{Config, ConfigError};
pub use driver::{spawn, QueueHandle};
pub use logging::LogError;
pub use manager::{QueueError, QueueManager};
pub use scheduler::{Fired, UndoScheduler};
