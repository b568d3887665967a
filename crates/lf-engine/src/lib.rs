// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! The WU lifecycle engine, delegation recorder, escalation ladder, recovery
//! analyser, claim-validation checker, and signal-bus folding logic (C3/C4,
//! C9, C10, C11, C12, C13) — the pieces that turn `lf-core`'s types and
//! `lf-storage`'s durable state into LumenFlow's actual operations, each
//! committed through `lf-git`'s micro-worktree protocol and gated by
//! `lf-lanes`'s admission control.

pub mod claimcheck;
pub mod delegation;
pub mod escalation;
pub mod lifecycle;
pub mod recovery;
pub mod signals;

pub use claimcheck::{validate_claims, ClaimChecker, ClaimValidator, ClaimViolation, Evidence};
pub use delegation::DelegationTracker;
pub use escalation::{DryRun, EscalationEngine, EscalationOutcome};
pub use lifecycle::LifecycleEngine;
pub use recovery::{RecoveryAction, RecoveryAnalyser, RecoveryIssue};
pub use signals::SignalInbox;

use lf_core::{Clock, ExecContext, PidProbe, SystemClock, SystemPidProbe, WorkspaceConfig};

/// Bundles the execution context with the workspace config every engine
/// operation needs, the way the teacher's daemon bundles its runtime handle
/// with the parsed job-spec before constructing a worker.
#[derive(Clone)]
pub struct ClaimContext<C: Clock = SystemClock, P: PidProbe + Clone = SystemPidProbe> {
    pub exec: ExecContext<C, P>,
    pub config: WorkspaceConfig,
}

impl<C: Clock, P: PidProbe + Clone> ClaimContext<C, P> {
    pub fn new(exec: ExecContext<C, P>, config: WorkspaceConfig) -> Self {
        Self { exec, config }
    }
}
