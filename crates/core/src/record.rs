// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue records and their vocabularies.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Store-assigned record identifier. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Rejected admission input. Messages are shown to front-desk staff as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("patient name is required")]
    EmptyName,
    #[error("select at least one service")]
    NoServices,
    #[error("unknown stage: {0}")]
    UnknownStage(String),
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

/// Workflow stage of a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    /// First visit
    #[default]
    Cusub,
    /// 14-day follow-up
    #[serde(rename = "14 malin")]
    FourteenDay,
    /// 7-day follow-up
    #[serde(rename = "7 malin")]
    SevenDay,
    Raajo,
    Bedel,
    Soolabtay,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Cusub,
        Stage::FourteenDay,
        Stage::SevenDay,
        Stage::Raajo,
        Stage::Bedel,
        Stage::Soolabtay,
    ];
}

crate::simple_display! {
    Stage {
        Cusub => "Cusub",
        FourteenDay => "14 malin",
        SevenDay => "7 malin",
        Raajo => "Raajo",
        Bedel => "Bedel",
        Soolabtay => "Soolabtay",
    }
}

impl FromStr for Stage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownStage(s.to_string()))
    }
}

/// Treatment tag attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    Gelin,
    Buuxin,
    Xirid,
    Dhaqid,
    Bedel,
}

impl Service {
    pub const ALL: [Service; 5] =
        [Service::Gelin, Service::Buuxin, Service::Xirid, Service::Dhaqid, Service::Bedel];
}

crate::simple_display! {
    Service {
        Gelin => "Gelin",
        Buuxin => "Buuxin",
        Xirid => "Xirid",
        Dhaqid => "Dhaqid",
        Bedel => "Bedel",
    }
}

impl FromStr for Service {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Service::ALL
            .into_iter()
            .find(|service| service.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownService(s.to_string()))
    }
}

/// Ordered set of services.
///
/// Duplicates collapse on insert and display keeps first-insertion order,
/// while equality ignores order. At the store boundary the set travels as a
/// comma-separated string (`"Gelin, Buuxin"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Services(IndexSet<Service>);

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service; returns false if it was already present.
    pub fn insert(&mut self, service: Service) -> bool {
        self.0.insert(service)
    }

    /// Toggle a service on or off, the way the admission form checkbox does.
    pub fn toggle(&mut self, service: Service) {
        if !self.0.shift_remove(&service) {
            self.0.insert(service);
        }
    }

    pub fn contains(&self, service: Service) -> bool {
        self.0.contains(&service)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Service> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Service> for Services {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, service) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{service}")?;
        }
        Ok(())
    }
}

impl FromStr for Services {
    type Err = ValidationError;

    /// Parse a comma-separated list. Blank segments are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',').filter(|part| !part.trim().is_empty()).map(Service::from_str).collect()
    }
}

impl Serialize for Services {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Services {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Progress of a record through the queue.
///
/// A freshly submitted record may carry the transient `pending` label; it is
/// read as [`Status::Waiting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    #[serde(alias = "pending")]
    Waiting,
    Done,
}

impl Status {
    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            Status::Waiting => Status::Done,
            Status::Done => Status::Waiting,
        }
    }
}

crate::simple_display! {
    Status {
        Waiting => "waiting",
        Done => "done",
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waiting" | "pending" => Ok(Status::Waiting),
            "done" => Ok(Status::Done),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A record that has not been given an id yet.
///
/// This is what the store receives on insert, and what an undo snapshot
/// holds: restoring re-inserts it and the store hands out a fresh id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: String,
    pub stage: Stage,
    pub services: Services,
    pub status: Status,
    pub ticket: u32,
    /// Epoch milliseconds (UTC) of the original admission
    pub inserted_at_ms: u64,
}

crate::builder! {
    pub struct NewRecordBuilder => NewRecord {
        into { name: String = "Amina" }
        set {
            stage: Stage = Stage::Cusub,
            services: Services = Services::from_iter([Service::Gelin]),
            status: Status = Status::Waiting,
            ticket: u32 = 1,
            inserted_at_ms: u64 = 1_772_442_000_000,
        }
    }
}

/// One active queue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub stage: Stage,
    pub services: Services,
    pub status: Status,
    pub ticket: u32,
    pub inserted_at_ms: u64,
}

impl Record {
    pub fn new(id: RecordId, new: NewRecord) -> Self {
        Self {
            id,
            name: new.name,
            stage: new.stage,
            services: new.services,
            status: new.status,
            ticket: new.ticket,
            inserted_at_ms: new.inserted_at_ms,
        }
    }

    /// Copy of this record without its id.
    pub fn to_new(&self) -> NewRecord {
        NewRecord {
            name: self.name.clone(),
            stage: self.stage,
            services: self.services.clone(),
            status: self.status,
            ticket: self.ticket,
            inserted_at_ms: self.inserted_at_ms,
        }
    }
}

/// Trim and check a patient name.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Ticket for the next admission: one past the highest active ticket, or 1
/// when nothing is active. Gaps left by deletions are never refilled.
pub fn next_ticket(active: impl IntoIterator<Item = u32>) -> u32 {
    active.into_iter().max().map_or(1, |max| max.saturating_add(1))
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
