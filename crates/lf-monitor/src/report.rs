// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot delegation/lock health report (C9, spec §4.4): a single pass
//! over the delegation registry and the lane locks directory, turned into a
//! list of copy-paste recovery suggestions. `run_watch` (in [`crate::watch`])
//! is just this repeated on a timer.

use lf_core::{Clock, DelegationRecord, LfError, PidProbe};
use lf_engine::{ClaimContext, DelegationTracker};
use lf_lanes::{LockManager, ZombieReason};
use tracing::warn;

/// Per-status tally over every delegation ever recorded. A plain struct
/// rather than a map since [`lf_core::DelegationStatus`] has exactly these
/// four variants and neither `Hash` nor `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub pending: usize,
    pub completed: usize,
    pub timeout: usize,
    pub crashed: usize,
}

/// A recommended follow-up command, never executed by the monitor itself —
/// mirrors [`lf_engine::RecoveryAction`]'s copy-paste-don't-run-it stance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverySuggestion {
    pub command: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReport {
    pub status_counts: StatusCounts,
    pub stuck: Vec<DelegationRecord>,
    pub zombie_locks: Vec<(String, ZombieReason)>,
    pub suggestions: Vec<RecoverySuggestion>,
}

pub struct DelegationMonitor<C: Clock, P: PidProbe + Clone> {
    ctx: ClaimContext<C, P>,
}

impl<C: Clock, P: PidProbe + Clone> DelegationMonitor<C, P> {
    pub fn new(ctx: ClaimContext<C, P>) -> Self {
        Self { ctx }
    }

    fn lock_manager(&self) -> LockManager<C, P> {
        LockManager::new(
            self.ctx.exec.resolve(&self.ctx.config.locks_dir),
            self.ctx.exec.clock().clone(),
            self.ctx.exec.pid_probe().clone(),
        )
    }

    /// One pass: tally delegation statuses, flag pending delegations past
    /// the stuck threshold, flag zombie lane locks, and turn both into
    /// suggestions.
    pub fn run_once(&self) -> Result<MonitorReport, LfError> {
        let tracker = DelegationTracker::new(self.ctx.clone());
        let all = tracker.all()?;

        let mut status_counts = StatusCounts::default();
        for record in &all {
            match record.status {
                lf_core::DelegationStatus::Pending => status_counts.pending += 1,
                lf_core::DelegationStatus::Completed => status_counts.completed += 1,
                lf_core::DelegationStatus::Timeout => status_counts.timeout += 1,
                lf_core::DelegationStatus::Crashed => status_counts.crashed += 1,
            }
        }

        let threshold_ms = self.ctx.config.delegation.stuck_threshold_minutes * 60 * 1000;
        let now_ms = self.ctx.exec.clock().epoch_ms();
        let stuck: Vec<DelegationRecord> = all
            .into_iter()
            .filter(|r| r.status == lf_core::DelegationStatus::Pending && age_ms(&r.delegated_at, now_ms) >= threshold_ms)
            .collect();

        let lock_manager = self.lock_manager();
        let mut zombie_locks = Vec::new();
        for lane in lock_manager.list_locked_lanes()? {
            if let Some(Some(reason)) = lock_manager.zombie_status(&lane)? {
                zombie_locks.push((lane, reason));
            }
        }

        let mut suggestions = Vec::new();
        for record in &stuck {
            warn!(delegation = %record.id, minutes = self.ctx.config.delegation.stuck_threshold_minutes, "stuck delegation detected");
            suggestions.push(RecoverySuggestion {
                command: format!("lf delegation-timeout {}", record.id),
                reason: format!(
                    "{} for {} has been pending past the {}-minute stuck threshold",
                    record.id, record.wu_id, self.ctx.config.delegation.stuck_threshold_minutes
                ),
            });
        }
        for (lane, reason) in &zombie_locks {
            suggestions.push(RecoverySuggestion {
                command: format!("lf lane-unlock {lane}"),
                reason: format!("lane {lane} lock is a zombie ({reason:?})"),
            });
        }

        Ok(MonitorReport { status_counts, stuck, zombie_locks, suggestions })
    }
}

fn age_ms(sent_at: &str, now_ms: u64) -> u64 {
    chrono::DateTime::parse_from_rfc3339(sent_at)
        .ok()
        .map(|dt| now_ms.saturating_sub(dt.timestamp_millis().max(0) as u64))
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
