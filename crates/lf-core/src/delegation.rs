// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delegation identifiers and records (C8).

use crate::wu::WuId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque delegation identifier: `DEL-<integer>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DelegationId(pub u64);

impl DelegationId {
    pub const fn new(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for DelegationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DEL-{}", self.0)
    }
}

impl std::str::FromStr for DelegationId {
    type Err = crate::error::LfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix("DEL-")
            .ok_or_else(|| crate::error::LfError::DelegationNotFound { id: s.to_string() })?;
        let n: u64 = suffix
            .parse()
            .map_err(|_| crate::error::LfError::DelegationNotFound { id: s.to_string() })?;
        Ok(DelegationId(n))
    }
}

impl TryFrom<String> for DelegationId {
    type Error = crate::error::LfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DelegationId> for String {
    fn from(id: DelegationId) -> Self {
        id.to_string()
    }
}

/// Outcome of a delegated WU, appended to the delegation log as it progresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationStatus {
    Pending,
    Completed,
    Timeout,
    Crashed,
}

crate::simple_display! {
    DelegationStatus {
        Pending => "pending",
        Completed => "completed",
        Timeout => "timeout",
        Crashed => "crashed",
    }
}

/// A single delegation record, as appended to `delegations.jsonl`.
///
/// Named after spec §3's shape (`targetWuId`/`parentWuId`/`pickedUpBy`),
/// with `wu_id` standing in for `targetWuId` to match this crate's naming
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegationRecord {
    pub id: DelegationId,
    pub wu_id: WuId,
    pub lane: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_wu_id: Option<WuId>,
    pub status: DelegationStatus,
    pub delegated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checkpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_up_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub attempt: u32,
}

impl DelegationRecord {
    pub fn new(id: DelegationId, wu_id: WuId, lane: impl Into<String>, delegated_at: impl Into<String>) -> Self {
        Self {
            id,
            wu_id,
            lane: lane.into(),
            parent_wu_id: None,
            status: DelegationStatus::Pending,
            delegated_at: delegated_at.into(),
            last_checkpoint: None,
            picked_up_at: None,
            picked_up_by: None,
            completed_at: None,
            failure_reason: None,
            attempt: 1,
        }
    }

    pub fn with_parent(mut self, parent_wu_id: WuId) -> Self {
        self.parent_wu_id = Some(parent_wu_id);
        self
    }
}

#[cfg(test)]
#[path = "delegation_tests.rs"]
mod tests;
