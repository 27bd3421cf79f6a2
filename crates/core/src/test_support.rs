// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::record::{NewRecord, Record, RecordId, Service, Services, Stage};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for queue types.
pub mod strategies {
    use crate::record::{Service, Services, Stage};
    use proptest::prelude::*;

    pub fn arb_stage() -> impl Strategy<Value = Stage> {
        proptest::sample::select(Stage::ALL.to_vec())
    }

    pub fn arb_service() -> impl Strategy<Value = Service> {
        proptest::sample::select(Service::ALL.to_vec())
    }

    /// Non-empty service sets, duplicates allowed in the input.
    pub fn arb_services() -> impl Strategy<Value = Services> {
        proptest::collection::vec(arb_service(), 1..6).prop_map(|v| v.into_iter().collect())
    }

    /// Names with at least one visible character.
    pub fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z ]{0,15}"
    }
}

// ── Record factories ────────────────────────────────────────────────────

pub fn services(list: &[Service]) -> Services {
    list.iter().copied().collect()
}

pub fn new_record(name: &str, ticket: u32) -> NewRecord {
    NewRecord::builder().name(name).ticket(ticket).build()
}

pub fn record(id: u64, name: &str, ticket: u32) -> Record {
    Record::new(RecordId(id), new_record(name, ticket))
}

pub fn staged_record(id: u64, name: &str, ticket: u32, stage: Stage, list: &[Service]) -> Record {
    Record::new(
        RecordId(id),
        NewRecord::builder()
            .name(name)
            .ticket(ticket)
            .stage(stage)
            .services(services(list))
            .build(),
    )
}
