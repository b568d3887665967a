// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Work Unit identifier, status, and record.

use crate::error::LfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Unique identifier for a Work Unit: `WU-<integer>`.
///
/// Unlike the teacher's random nanoid ids, WU ids are small sequential
/// integers assigned at creation time, so the wrapper stores the integer
/// directly rather than an opaque byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WuId(pub u64);

impl WuId {
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn number(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WU-{}", self.0)
    }
}

impl FromStr for WuId {
    type Err = LfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s.strip_prefix("WU-").ok_or_else(|| LfError::InvalidWuId(s.to_string()))?;
        let n: u64 = suffix.parse().map_err(|_| LfError::InvalidWuId(s.to_string()))?;
        Ok(WuId(n))
    }
}

impl TryFrom<String> for WuId {
    type Error = LfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WuId> for String {
    fn from(id: WuId) -> Self {
        id.to_string()
    }
}

/// Lifecycle status of a WU, per spec §3/§4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WuStatus {
    Ready,
    InProgress,
    Blocked,
    Done,
}

crate::simple_display! {
    WuStatus {
        Ready => "ready",
        InProgress => "in_progress",
        Blocked => "blocked",
        Done => "done",
    }
}

impl FromStr for WuStatus {
    type Err = LfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(WuStatus::Ready),
            "in_progress" => Ok(WuStatus::InProgress),
            "blocked" => Ok(WuStatus::Blocked),
            "done" => Ok(WuStatus::Done),
            other => Err(LfError::StateError {
                wu_id: String::new(),
                from: other.to_string(),
                to: String::new(),
            }),
        }
    }
}

/// How a WU's code changes are isolated while `in_progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimedMode {
    Worktree,
    BranchPr,
    BranchOnly,
}

crate::simple_display! {
    ClaimedMode {
        Worktree => "worktree",
        BranchPr => "branch_pr",
        BranchOnly => "branch_only",
    }
}

/// Approval metadata attached to a WU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub escalation_triggers: Vec<String>,
    #[serde(default)]
    pub requires_human_escalation: bool,
}

/// A Work Unit record, persisted as `<wuDir>/WU-<n>.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WuRecord {
    pub id: WuId,
    pub status: WuStatus,
    pub lane: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_mode: Option<ClaimedMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worktree_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_main_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub approval: Approval,
    #[serde(default)]
    pub code_paths: Vec<String>,
    #[serde(default)]
    pub acceptance: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<String>,
    #[serde(default)]
    pub spec_refs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

impl WuRecord {
    pub fn new(id: WuId, lane: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            status: WuStatus::Ready,
            lane: lane.into(),
            title: title.into(),
            assigned_to: None,
            claimed_at: None,
            claimed_mode: None,
            claimed_branch: None,
            worktree_path: None,
            baseline_main_sha: None,
            session_id: None,
            approval: Approval::default(),
            code_paths: Vec::new(),
            acceptance: Vec::new(),
            initiative: None,
            spec_refs: Vec::new(),
            block_reason: None,
        }
    }

    /// Invariant check from spec §3: `in_progress` implies claim fields set
    /// and either a worktree path (worktree mode) or a claimed branch
    /// (branch-PR mode).
    pub fn validate_in_progress_invariant(&self) -> Result<(), LfError> {
        if self.status != WuStatus::InProgress {
            return Ok(());
        }
        let missing = self.assigned_to.is_none()
            || self.claimed_at.is_none()
            || self.claimed_mode.is_none()
            || self.baseline_main_sha.is_none();
        if missing {
            return Err(LfError::TransactionError {
                reason: format!("{} is in_progress but missing claim fields", self.id),
            });
        }
        let has_worktree = self.worktree_path.is_some();
        let has_branch = self.claimed_branch.is_some();
        if !has_worktree && !has_branch {
            return Err(LfError::TransactionError {
                reason: format!(
                    "{} is in_progress but has neither worktree_path nor claimed_branch",
                    self.id
                ),
            });
        }
        Ok(())
    }
}

crate::builder! {
    pub struct WuRecordBuilder => WuRecord {
        into {
            lane: String = "lane-a",
            title: String = "test wu",
        }
        set {
            status: WuStatus = WuStatus::Ready,
            approval: Approval = Approval::default(),
            code_paths: Vec<String> = Vec::new(),
            acceptance: Vec<String> = Vec::new(),
            spec_refs: Vec<String> = Vec::new(),
        }
        option {
            assigned_to: String = None,
            claimed_at: String = None,
            claimed_mode: ClaimedMode = None,
            claimed_branch: String = None,
            worktree_path: PathBuf = None,
            baseline_main_sha: String = None,
            session_id: String = None,
            initiative: String = None,
            block_reason: String = None,
        }
        computed {
            id: WuId = WuId::new(1),
        }
    }
}

#[cfg(test)]
#[path = "wu_tests.rs"]
mod tests;
