// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The error taxonomy every core operation raises.
//!
//! Core modules never terminate the process; they always return a typed
//! error here. Only an external CLI boundary (out of scope for this
//! workspace) maps [`LfError::ProcessExit`] to an actual `std::process::exit`.

use std::path::PathBuf;
use thiserror::Error;

/// The non-exhaustive error taxonomy, mirroring spec §7.
#[derive(Debug, Error)]
pub enum LfError {
    #[error("WU {wu_id} not found")]
    WuNotFound { wu_id: String },

    #[error("WU {wu_id} is already claimed by {assigned_to}")]
    WuAlreadyClaimed { wu_id: String, assigned_to: String },

    #[error("illegal transition for {wu_id}: {from} -> {to}")]
    StateError { wu_id: String, from: String, to: String },

    #[error("invalid WU id: {0}")]
    InvalidWuId(String),

    #[error("invalid lane {lane}: {reason}")]
    InvalidLane { lane: String, reason: String },

    #[error("worktree error at {path}: {reason}")]
    WorktreeError { path: PathBuf, reason: String },

    #[error("branch error on {branch}: {reason}")]
    BranchError { branch: String, reason: String },

    #[error("lock error for lane {lane}: {reason}")]
    LockError { lane: String, reason: String },

    #[error("transaction error: {reason}")]
    TransactionError { reason: String },

    #[error("retry exhausted for operation {operation} after {retries} attempts")]
    RetryExhaustion { operation: String, retries: u32 },

    #[error("merge exhausted for operation {operation}: {reason}")]
    MergeExhaustion { operation: String, reason: String },

    #[error("rebase conflict on {branch}: {reason}")]
    RebaseConflict { branch: String, reason: String },

    #[error("delegation {id} not found")]
    DelegationNotFound { id: String },

    #[error("signal bus unavailable at {path}: {reason}")]
    SignalUnavailable { path: PathBuf, reason: String },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to parse YAML at {path}: {reason}")]
    YamlParseError { path: PathBuf, reason: String },

    #[error("recovery error: {reason}")]
    RecoveryError { reason: String },

    #[error("lane health gate failed in strict mode: {reason}")]
    LaneHealthGateFailed { reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A typed exit signal. Only the CLI boundary (out of scope here)
    /// converts this into `std::process::exit`; library code never does.
    #[error("process exit {code}: {message}")]
    ProcessExit { code: i32, message: String },
}

impl LfError {
    /// Suggested next command(s) an agent-friendly caller could show the user.
    ///
    /// Populated for the error kinds where a concrete remediation exists;
    /// `None` otherwise (the caller should fall back to the bare message).
    pub fn suggested_command(&self) -> Option<String> {
        match self {
            LfError::WuAlreadyClaimed { wu_id, .. } => {
                Some(format!("lf wu-status {wu_id}"))
            }
            LfError::LockError { lane, .. } => Some(format!("lf lane-unlock {lane}")),
            LfError::RetryExhaustion { .. } => {
                Some("fetch and inspect origin/main before retrying".to_string())
            }
            _ => None,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LfError::Io { path: path.into(), source }
    }
}

pub type LfResult<T> = Result<T, LfError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
