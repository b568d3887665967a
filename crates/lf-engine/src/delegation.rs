// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delegation tracking (C8, spec §4.4): records a delegation's lifecycle —
//! `record`, `record_pickup`, `record_completion`, `record_failure` — each
//! committed through the micro-worktree merger so the registry is mainline
//! state like everything else C7 guards.

use crate::ClaimContext;
use lf_core::{
    Clock, DelegationId, DelegationRecord, DelegationStatus, LfError, MergeMode, PidProbe, WuId,
};
use lf_git::{GitAdapter, MergeRequest, SyncMode};
use lf_storage::DelegationLog;
use std::cell::RefCell;

pub struct DelegationTracker<C: Clock, P: PidProbe + Clone> {
    ctx: ClaimContext<C, P>,
    git: GitAdapter,
}

impl<C: Clock, P: PidProbe + Clone> DelegationTracker<C, P> {
    pub fn new(ctx: ClaimContext<C, P>) -> Self {
        let git = GitAdapter::new(ctx.exec.repo_root());
        Self { ctx, git }
    }

    fn sync_mode(&self) -> SyncMode {
        if !self.ctx.config.merge.require_remote {
            SyncMode::LocalOnly
        } else if self.ctx.config.merge.mode == MergeMode::BranchPr {
            SyncMode::PushOnly
        } else {
            SyncMode::Standard
        }
    }

    fn log(&self) -> Result<DelegationLog, LfError> {
        DelegationLog::open(self.ctx.exec.resolve(&self.ctx.config.delegation.log_path))
    }

    /// Run one mutate-and-commit cycle against `delegations.jsonl`, mirroring
    /// [`crate::lifecycle::LifecycleEngine::commit`]'s shape for WU records.
    fn commit(
        &self,
        operation: &'static str,
        id: DelegationId,
        mutate: impl FnOnce(&DelegationLog, DelegationId) -> Result<DelegationRecord, LfError>,
    ) -> Result<DelegationRecord, LfError> {
        let log_path = self.ctx.config.delegation.log_path.clone();
        let main_branch = self.ctx.config.merge.main_branch.clone();
        let retry = self.ctx.config.merge.retry.clone();
        let key = id.to_string();
        let result: RefCell<Option<DelegationRecord>> = RefCell::new(None);

        lf_git::run(
            &self.git,
            MergeRequest {
                operation,
                wu_id: &key,
                sync_mode: self.sync_mode(),
                remote: "origin",
                main_branch: &main_branch,
                target_branch: &main_branch,
                retry,
            },
            |worktree| {
                let mut log = DelegationLog::open(worktree.join(&log_path))?;
                let record = mutate(&log, id)?;
                log.append(&record)?;
                *result.borrow_mut() = Some(record);
                Ok((format!("{operation} {id}"), vec![log_path.clone()]))
            },
        )?;

        result.into_inner().ok_or_else(|| LfError::TransactionError {
            reason: format!("{operation} committed without producing a delegation record"),
        })
    }

    pub fn record(&self, id: DelegationId, wu_id: WuId, lane: &str, parent_wu_id: Option<WuId>) -> Result<DelegationRecord, LfError> {
        let lane = lane.to_string();
        let clock = self.ctx.exec.clock().clone();
        self.commit("delegation-record", id, move |_log, id| {
            let at = clock.now_iso8601();
            let mut record = DelegationRecord::new(id, wu_id, lane.clone(), at);
            if let Some(parent) = parent_wu_id {
                record = record.with_parent(parent);
            }
            Ok(record)
        })
    }

    pub fn record_pickup(&self, id: DelegationId, agent: &str) -> Result<DelegationRecord, LfError> {
        let agent = agent.to_string();
        let clock = self.ctx.exec.clock().clone();
        self.commit("delegation-pickup", id, move |log, id| {
            let mut record =
                log.fold()?.remove(&id).ok_or_else(|| LfError::DelegationNotFound { id: id.to_string() })?;
            record.picked_up_at = Some(clock.now_iso8601());
            record.picked_up_by = Some(agent.clone());
            Ok(record)
        })
    }

    pub fn record_completion(&self, id: DelegationId) -> Result<DelegationRecord, LfError> {
        let clock = self.ctx.exec.clock().clone();
        self.commit("delegation-complete", id, move |log, id| {
            let mut record =
                log.fold()?.remove(&id).ok_or_else(|| LfError::DelegationNotFound { id: id.to_string() })?;
            record.status = DelegationStatus::Completed;
            record.completed_at = Some(clock.now_iso8601());
            Ok(record)
        })
    }

    pub fn record_failure(&self, id: DelegationId, reason: &str) -> Result<DelegationRecord, LfError> {
        let reason = reason.to_string();
        self.commit("delegation-fail", id, move |log, id| {
            let mut record =
                log.fold()?.remove(&id).ok_or_else(|| LfError::DelegationNotFound { id: id.to_string() })?;
            record.status = DelegationStatus::Crashed;
            record.failure_reason = Some(reason.clone());
            record.attempt += 1;
            Ok(record)
        })
    }

    /// Mark a delegation as timed out — distinct from [`Self::record_failure`]
    /// since a timeout is detected by the monitor's clock, not reported by
    /// the delegate itself.
    pub fn record_timeout(&self, id: DelegationId) -> Result<DelegationRecord, LfError> {
        self.commit("delegation-timeout", id, move |log, id| {
            let mut record =
                log.fold()?.remove(&id).ok_or_else(|| LfError::DelegationNotFound { id: id.to_string() })?;
            record.status = DelegationStatus::Timeout;
            Ok(record)
        })
    }

    pub fn for_wu(&self, wu_id: WuId) -> Result<Vec<DelegationRecord>, LfError> {
        self.log()?.for_wu(wu_id)
    }

    pub fn pending(&self) -> Result<Vec<DelegationRecord>, LfError> {
        self.log()?.pending()
    }

    /// Every delegation's latest folded state, for the monitor's
    /// per-status tally.
    pub fn all(&self) -> Result<Vec<DelegationRecord>, LfError> {
        Ok(self.log()?.fold()?.into_values().collect())
    }
}

#[cfg(test)]
#[path = "delegation_tests.rs"]
mod tests;
