// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal bus primitives (C10): signals and their read receipts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque signal identifier: `SIG-<integer>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignalId(pub u64);

impl SignalId {
    pub const fn new(n: u64) -> Self {
        Self(n)
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIG-{}", self.0)
    }
}

impl std::str::FromStr for SignalId {
    type Err = crate::error::LfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix("SIG-")
            .ok_or_else(|| crate::error::LfError::SignalUnavailable {
                path: std::path::PathBuf::new(),
                reason: format!("malformed signal id: {s}"),
            })?;
        let n: u64 = suffix.parse().map_err(|_| crate::error::LfError::SignalUnavailable {
            path: std::path::PathBuf::new(),
            reason: format!("malformed signal id: {s}"),
        })?;
        Ok(SignalId(n))
    }
}

impl TryFrom<String> for SignalId {
    type Error = crate::error::LfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SignalId> for String {
    fn from(id: SignalId) -> Self {
        id.to_string()
    }
}

/// Severity attached to an escalation-bearing signal (C11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSeverity {
    Info,
    Warning,
    Critical,
}

/// What the escalation engine should do about a signal, per spec §4.4's
/// ladder. Present only on signals a delegation-failure path emits;
/// ordinary peer-to-peer signals leave this `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Retry,
    Block,
    HumanEscalate,
}

crate::simple_display! {
    SuggestedAction {
        Retry => "retry",
        Block => "block",
        HumanEscalate => "human_escalate",
    }
}

/// A signal appended to `signals.jsonl`, addressed to one or more recipients.
///
/// `read` is the inline half of spec §3's union read-state rule: a signal
/// counts as read if this is `true` *or* a [`ReadReceipt`] references its
/// id. Writers only ever set this at creation time (always `false`);
/// marking as read happens exclusively through the receipts log, so two
/// processes marking the same signal never race on this file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: SignalId,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub sent_at: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wu_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<SignalSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<SuggestedAction>,
}

impl Signal {
    pub fn new(
        id: SignalId,
        from: impl Into<String>,
        to: Vec<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        sent_at: impl Into<String>,
    ) -> Self {
        Self {
            id,
            from: from.into(),
            to,
            subject: subject.into(),
            body: body.into(),
            sent_at: sent_at.into(),
            read: false,
            wu_id: None,
            severity: None,
            suggested_action: None,
        }
    }

    pub fn with_wu_id(mut self, wu_id: impl Into<String>) -> Self {
        self.wu_id = Some(wu_id.into());
        self
    }

    pub fn with_escalation(mut self, severity: SignalSeverity, action: SuggestedAction) -> Self {
        self.severity = Some(severity);
        self.suggested_action = Some(action);
        self
    }

    /// Effective read-state per spec §3/§8: inline flag alone, before any
    /// receipt is consulted. [`crate::delegation`]'s callers union this
    /// with the receipts log one layer up.
    pub fn is_read_inline(&self) -> bool {
        self.read
    }
}

/// A read acknowledgement appended to `signal-receipts.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub signal_id: SignalId,
    pub reader: String,
    pub read_at: String,
}

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
