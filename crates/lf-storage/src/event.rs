// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tagged event vocabulary appended to the event log (C1).
//!
//! Every variant carries only the fields needed to reconstruct materialised
//! views; unrecognised `type` values fall into [`Event::Unknown`] rather than
//! failing to parse, so a log written by a newer build stays readable here.

use lf_core::{DelegationId, SignalId, WuId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "create")]
    WuCreated { wu_id: WuId, lane: String, title: String, at: String },

    #[serde(rename = "claim")]
    WuClaimed { wu_id: WuId, assigned_to: String, mode: String, at: String },

    #[serde(rename = "release")]
    WuReleased { wu_id: WuId, at: String, #[serde(default, skip_serializing_if = "Option::is_none")] reason: Option<String> },

    #[serde(rename = "block")]
    WuBlocked { wu_id: WuId, reason: String, at: String },

    #[serde(rename = "unblock")]
    WuUnblocked { wu_id: WuId, at: String },

    #[serde(rename = "complete")]
    WuCompleted { wu_id: WuId, at: String, #[serde(default, skip_serializing_if = "Option::is_none")] merge_commit: Option<String> },

    #[serde(rename = "delete")]
    WuDeleted { wu_id: WuId, at: String },

    #[serde(rename = "lane:locked")]
    LaneLocked { lane: String, wu_id: WuId, pid: i32, at: String },

    #[serde(rename = "lane:unlocked")]
    LaneUnlocked { lane: String, wu_id: WuId, at: String },

    #[serde(rename = "lane:lock_reclaimed")]
    LaneLockReclaimed { lane: String, previous_wu_id: WuId, previous_pid: i32, at: String },

    #[serde(rename = "delegation:recorded")]
    DelegationRecorded { id: DelegationId, wu_id: WuId, at: String },

    #[serde(rename = "delegation:completed")]
    DelegationCompleted { id: DelegationId, wu_id: WuId, at: String },

    #[serde(rename = "delegation:failed")]
    DelegationFailed { id: DelegationId, wu_id: WuId, reason: String, at: String },

    #[serde(rename = "signal:sent")]
    SignalSent { id: SignalId, from: String, to: Vec<String>, at: String },

    #[serde(rename = "signal:read")]
    SignalRead { id: SignalId, reader: String, at: String },

    #[serde(rename = "merge:attempt")]
    MergeAttempt { wu_id: WuId, attempt: u32, at: String },

    #[serde(rename = "merge:succeeded")]
    MergeSucceeded { wu_id: WuId, attempt: u32, commit: String, at: String },

    #[serde(rename = "merge:retry")]
    MergeRetry { wu_id: WuId, attempt: u32, delay_ms: u64, reason: String, at: String },

    #[serde(rename = "escalation:triggered")]
    EscalationTriggered { wu_id: WuId, failures: u32, action: String, at: String },

    #[serde(other)]
    Unknown,
}

impl Event {
    /// The WU this event pertains to, if any — used by materialised views
    /// to fold per-WU state without a giant match in the view builder.
    pub fn wu_id(&self) -> Option<WuId> {
        match self {
            Event::WuCreated { wu_id, .. }
            | Event::WuClaimed { wu_id, .. }
            | Event::WuReleased { wu_id, .. }
            | Event::WuBlocked { wu_id, .. }
            | Event::WuUnblocked { wu_id, .. }
            | Event::WuCompleted { wu_id, .. }
            | Event::WuDeleted { wu_id, .. }
            | Event::LaneLocked { wu_id, .. }
            | Event::LaneUnlocked { wu_id, .. }
            | Event::DelegationRecorded { wu_id, .. }
            | Event::DelegationCompleted { wu_id, .. }
            | Event::DelegationFailed { wu_id, .. }
            | Event::MergeAttempt { wu_id, .. }
            | Event::MergeSucceeded { wu_id, .. }
            | Event::MergeRetry { wu_id, .. }
            | Event::EscalationTriggered { wu_id, .. } => Some(*wu_id),
            Event::LaneLockReclaimed { .. } | Event::SignalSent { .. } | Event::SignalRead { .. } | Event::Unknown => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
