// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Escalation ladder (C11, spec §4.4): turns an escalation-bearing signal
//! into one of three outcomes — retry (log only), block the named WU, or
//! synthesize a bug work unit for a human — and marks the signal read once
//! handled, unless running under [`DryRun::Yes`].

use crate::{ClaimContext, LifecycleEngine, SignalInbox};
use lf_core::{Clock, EscalationAction, LfError, PidProbe, Signal, SignalSeverity, SuggestedAction, WuId};

/// Whether a dry run should skip the mutating half of escalation handling.
/// Spec §4.4: never inferred from severity or action, always an explicit
/// caller choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryRun {
    Yes,
    No,
}

/// A bug WU synthesized from a `human_escalate` signal, ready to hand to
/// [`LifecycleEngine::create`]. Carried as data so a dry run can report what
/// *would* be created without creating it.
#[derive(Debug, Clone, PartialEq)]
pub struct BugWuSpec {
    pub title: String,
    pub lane: String,
    pub description: String,
    pub wu_type: String,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EscalationOutcome {
    Retried,
    Blocked { wu_id: WuId },
    BugWuSynthesized(BugWuSpec),
}

pub struct EscalationEngine<C: Clock, P: PidProbe + Clone> {
    lifecycle: LifecycleEngine<C, P>,
    inbox: SignalInbox<C>,
}

impl<C: Clock, P: PidProbe + Clone> EscalationEngine<C, P> {
    pub fn new(ctx: ClaimContext<C, P>) -> Self {
        let clock = ctx.exec.clock().clone();
        let signals_path = ctx.exec.resolve(&ctx.config.signals.path);
        let receipts_path = ctx.exec.resolve(&ctx.config.signals.receipts_path);
        let inbox = SignalInbox::new(signals_path, receipts_path, clock);
        let lifecycle = LifecycleEngine::new(ctx);
        Self { lifecycle, inbox }
    }

    fn ladder_action(signal: &Signal) -> EscalationAction {
        match signal.suggested_action {
            Some(SuggestedAction::Retry) => EscalationAction::Retry,
            Some(SuggestedAction::Block) => EscalationAction::Block,
            Some(SuggestedAction::HumanEscalate) => EscalationAction::HumanEscalate,
            None if matches!(signal.severity, Some(SignalSeverity::Critical)) => EscalationAction::HumanEscalate,
            None => EscalationAction::Retry,
        }
    }

    /// Handle one signal per the ladder. `bug_wu_id` is only consumed on the
    /// `human_escalate` path; callers reserve it (e.g. from the next free WU
    /// number) before calling since the lifecycle engine requires an
    /// explicit id at creation time.
    pub fn process(&self, signal: &Signal, bug_wu_id: WuId, dry_run: DryRun) -> Result<EscalationOutcome, LfError> {
        let outcome = match Self::ladder_action(signal) {
            EscalationAction::Retry => EscalationOutcome::Retried,
            EscalationAction::Block => {
                let wu_id = Self::target_wu(signal)?;
                if dry_run == DryRun::No {
                    self.lifecycle.block(wu_id, &format!("escalated via {}: {}", signal.id, signal.subject))?;
                }
                EscalationOutcome::Blocked { wu_id }
            }
            EscalationAction::HumanEscalate => {
                let wu_id = signal.wu_id.as_deref().and_then(|s| s.parse::<WuId>().ok());
                let lane = "triage".to_string();
                let spec = BugWuSpec {
                    title: format!("Escalation: {}", signal.subject),
                    lane: lane.clone(),
                    description: signal.body.clone(),
                    wu_type: "bug".to_string(),
                    priority: "P1".to_string(),
                };
                if dry_run == DryRun::No {
                    let title = format!("{}: {}", spec.title, spec.description);
                    self.lifecycle.create(bug_wu_id, &spec.lane, &title)?;
                    let _ = wu_id; // the originating WU, if any, is referenced in the title/body only
                }
                EscalationOutcome::BugWuSynthesized(spec)
            }
        };

        if dry_run == DryRun::No {
            self.inbox.mark_read(&[signal.id], "escalation-engine")?;
        }
        Ok(outcome)
    }

    fn target_wu(signal: &Signal) -> Result<WuId, LfError> {
        signal
            .wu_id
            .as_deref()
            .ok_or_else(|| LfError::SignalUnavailable {
                path: std::path::PathBuf::new(),
                reason: format!("{} has suggested_action=block but no wu_id to block", signal.id),
            })
            .and_then(|s| s.parse())
    }
}

#[cfg(test)]
#[path = "escalation_tests.rs"]
mod tests;
