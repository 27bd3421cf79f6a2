// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Presentation filters over the active queue.
//!
//! These never change queue state. Views pick a [`Window`] and apply it to
//! the output of `list()`.

use crate::record::Record;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use thiserror::Error;

/// UTC offset of the clinic's civil day (East Africa Time).
pub const CLINIC_UTC_OFFSET_HOURS: i32 = 3;

/// Whole-hour offsets that name a real civil time zone.
pub const UTC_OFFSET_RANGE: RangeInclusive<i32> = -12..=14;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("utc offset {0} outside -12..=14")]
    OffsetOutOfRange(i32),
}

/// Which admissions a view shows.
///
/// Filtering with a [`Window::SinceLocalMidnight`] whose offset lies outside
/// [`UTC_OFFSET_RANGE`] fails with [`WindowError::OffsetOutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "window", rename_all = "snake_case")]
pub enum Window {
    #[default]
    All,
    /// Admitted within the 24 hours before now
    Last24Hours,
    /// Admitted since midnight of the current civil day at a fixed offset
    SinceLocalMidnight { utc_offset_hours: i32 },
}

impl Window {
    /// Today at the clinic.
    pub fn clinic_day() -> Self {
        Window::SinceLocalMidnight { utc_offset_hours: CLINIC_UTC_OFFSET_HOURS }
    }

    /// Earliest admission time (epoch ms) included by this window.
    ///
    /// `None` means unbounded.
    pub fn start_ms(&self, now: DateTime<Utc>) -> Result<Option<u64>, WindowError> {
        match self {
            Window::All => Ok(None),
            Window::Last24Hours => {
                // Strictly after the cutoff
                let cutoff = (now - Duration::hours(24)).timestamp_millis();
                Ok(Some(cutoff.saturating_add(1).max(0) as u64))
            }
            Window::SinceLocalMidnight { utc_offset_hours } => {
                let offset = fixed_offset(*utc_offset_hours)?;
                let today = now.with_timezone(&offset).date_naive();
                let local_midnight = today.and_time(NaiveTime::MIN);
                let start = offset.from_local_datetime(&local_midnight).single();
                Ok(start.map(|start| start.timestamp_millis().max(0) as u64))
            }
        }
    }

    pub fn contains(&self, record: &Record, now: DateTime<Utc>) -> Result<bool, WindowError> {
        Ok(self.start_ms(now)?.is_none_or(|start| record.inserted_at_ms >= start))
    }

    /// Keep the records inside the window, preserving order.
    pub fn apply<'a>(
        &self,
        records: &'a [Record],
        now: DateTime<Utc>,
    ) -> Result<Vec<&'a Record>, WindowError> {
        let start = self.start_ms(now)?;
        Ok(records
            .iter()
            .filter(|r| start.is_none_or(|start| r.inserted_at_ms >= start))
            .collect())
    }
}

/// Fixed offset for a whole-hour UTC offset inside [`UTC_OFFSET_RANGE`].
pub fn fixed_offset(hours: i32) -> Result<FixedOffset, WindowError> {
    if !UTC_OFFSET_RANGE.contains(&hours) {
        return Err(WindowError::OffsetOutOfRange(hours));
    }
    FixedOffset::east_opt(hours * 3_600).ok_or(WindowError::OffsetOutOfRange(hours))
}

/// Case-insensitive search over name, ticket, stage, services and status.
///
/// An empty needle matches everything.
pub fn search<'a>(records: &'a [Record], needle: &str) -> Vec<&'a Record> {
    let needle = needle.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.name.to_lowercase().contains(&needle)
                || r.ticket.to_string().contains(&needle)
                || r.stage.to_string().to_lowercase().contains(&needle)
                || r.services.to_string().to_lowercase().contains(&needle)
                || r.status.to_string().contains(&needle)
        })
        .collect()
}

/// Group records by civil admission date, oldest day first.
///
/// Within a day records are ordered by admission time.
pub fn group_by_day(
    records: &[Record],
    utc_offset_hours: i32,
) -> Result<Vec<(NaiveDate, Vec<Record>)>, WindowError> {
    let offset = fixed_offset(utc_offset_hours)?;
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by_key(|r| (r.inserted_at_ms, r.ticket));

    let mut days: BTreeMap<NaiveDate, Vec<Record>> = BTreeMap::new();
    for record in sorted {
        let Some(at) = Utc.timestamp_millis_opt(record.inserted_at_ms as i64).single() else {
            continue;
        };
        days.entry(at.with_timezone(&offset).date_naive()).or_default().push(record.clone());
    }
    Ok(days.into_iter().collect())
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
