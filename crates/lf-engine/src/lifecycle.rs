// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WU lifecycle operations (C3/C4, spec §4.1): `create`, `claim`, `release`,
//! `block`, `unblock`, `complete`, `delete`, each committed atomically
//! through the micro-worktree merger (§4.3).
//!
//! Every mutation reads the WU record fresh from *inside* the worktree
//! (after the merger's sync preamble has based it off the latest mainline),
//! so the transition is validated against current state, not a possibly
//! stale local read taken before the network round-trip.

use crate::ClaimContext;
use lf_core::{
    assert_transition, Clock, ClaimedMode, LfError, MergeMode, PidProbe, WuId, WuRecord, WuStatus,
};
use lf_git::{GitAdapter, MergeRequest, SyncMode};
use lf_lanes::{LaneRegistry, LockManager};
use lf_storage::{render_backlog, render_status, Event, EventLog, RecordStore, StampStore};
use std::cell::RefCell;
use std::path::Path;

pub struct LifecycleEngine<C: Clock, P: PidProbe + Clone> {
    ctx: ClaimContext<C, P>,
    git: GitAdapter,
}

impl<C: Clock, P: PidProbe + Clone> LifecycleEngine<C, P> {
    pub fn new(ctx: ClaimContext<C, P>) -> Self {
        let git = GitAdapter::new(ctx.exec.repo_root());
        Self { ctx, git }
    }

    /// Load a WU record by id, for callers outside this module (the
    /// escalation engine, the monitor, claim validation) that only need a
    /// read.
    pub fn get(&self, id: WuId) -> Result<WuRecord, LfError> {
        self.record_store().load(id)
    }

    pub fn exists(&self, id: WuId) -> bool {
        self.record_store().exists(id)
    }

    fn record_store(&self) -> RecordStore {
        RecordStore::new(self.ctx.exec.resolve(&self.ctx.config.wu_dir))
    }

    fn stamp_store(&self) -> StampStore {
        StampStore::new(self.ctx.exec.resolve(&self.ctx.config.stamps_dir))
    }

    fn lock_manager(&self) -> LockManager<C, P> {
        LockManager::new(
            self.ctx.exec.resolve(&self.ctx.config.locks_dir),
            self.ctx.exec.clock().clone(),
            self.ctx.exec.pid_probe().clone(),
        )
    }

    fn registry(&self) -> LaneRegistry {
        LaneRegistry::new(self.ctx.config.lanes.definitions.clone())
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

    fn main_target_branch(&self) -> String {
        self.ctx.config.merge.main_branch.clone()
    }

    /// Deterministic per-WU feature branch name for branch-PR mode, derived
    /// purely from the WU id so it never needs a round-trip to compute.
    fn feature_branch(&self, id: WuId) -> String {
        format!("{}/{}", self.ctx.config.merge.branch_prefix, id)
    }

    fn count_in_progress(&self, lane: &str) -> Result<u32, LfError> {
        let count = self
            .record_store()
            .load_all()?
            .iter()
            .filter(|r| r.lane == lane && r.status == WuStatus::InProgress)
            .count();
        Ok(count as u32)
    }

    /// Run one mutate-and-commit cycle: `mutate` is handed the worktree path
    /// and a `RecordStore` rooted there, and returns the record to save plus
    /// the event to append. Views are regenerated from the post-mutation
    /// record set before the commit.
    fn commit(
        &self,
        operation: &'static str,
        wu_id: WuId,
        sync_mode: SyncMode,
        target_branch: String,
        mutate: impl FnOnce(&Path, &RecordStore, WuId) -> Result<(WuRecord, Event), LfError>,
    ) -> Result<WuRecord, LfError> {
        let wu_dir = self.ctx.config.wu_dir.clone();
        let event_log_path = self.ctx.config.event_log_path.clone();
        let backlog_path = self.ctx.config.backlog_path.clone();
        let status_path = self.ctx.config.status_path.clone();
        let retry = self.ctx.config.merge.retry.clone();
        let main_branch = self.ctx.config.merge.main_branch.clone();
        let wu_id_str = wu_id.to_string();
        let result: RefCell<Option<WuRecord>> = RefCell::new(None);

        lf_git::run(
            &self.git,
            MergeRequest {
                operation,
                wu_id: &wu_id_str,
                sync_mode,
                remote: "origin",
                main_branch: &main_branch,
                target_branch: &target_branch,
                retry,
            },
            |worktree| {
                let store = RecordStore::new(worktree.join(&wu_dir));
                let (record, event) = mutate(worktree, &store, wu_id)?;
                store.save(&record)?;
                let mut log = EventLog::open(worktree.join(&event_log_path), 0)?;
                log.append(&event)?;
                log.flush()?;
                let all = store.load_all()?;
                let backlog_file = worktree.join(&backlog_path);
                let status_file = worktree.join(&status_path);
                std::fs::write(&backlog_file, render_backlog(&all)).map_err(|e| LfError::io(&backlog_file, e))?;
                std::fs::write(&status_file, render_status(&all)).map_err(|e| LfError::io(&status_file, e))?;
                *result.borrow_mut() = Some(record);
                Ok((format!("{operation} {wu_id}"), vec![]))
            },
        )?;

        result
            .into_inner()
            .ok_or_else(|| LfError::TransactionError { reason: format!("{operation} committed without producing a record") })
    }

    pub fn create(&self, id: WuId, lane: &str, title: &str) -> Result<WuRecord, LfError> {
        self.registry().require(lane)?;
        if self.record_store().exists(id) {
            return Err(LfError::TransactionError { reason: format!("{id} already exists") });
        }
        let lane = lane.to_string();
        let title = title.to_string();
        let clock = self.ctx.exec.clock().clone();
        self.commit("wu-create", id, self.sync_mode(), self.main_target_branch(), move |_wt, store, id| {
            if store.exists(id) {
                return Err(LfError::TransactionError { reason: format!("{id} already exists") });
            }
            let record = WuRecord::new(id, lane.clone(), title.clone());
            let at = clock.now_iso8601();
            let event = Event::WuCreated { wu_id: id, lane: lane.clone(), title: title.clone(), at };
            Ok((record, event))
        })
    }

    /// Claim under race (spec §8 scenario 1): exactly one concurrent caller
    /// observes `in_progress`; the other fails with `WuAlreadyClaimed`
    /// whether detected by a fresh in-worktree read or by the merger's
    /// rebase conflicting on the same YAML line both callers touched.
    pub fn claim(&self, id: WuId, assigned_to: &str, mode: ClaimedMode) -> Result<WuRecord, LfError> {
        let existing = self.record_store().load(id)?;
        if existing.status != WuStatus::Ready {
            return Err(LfError::WuAlreadyClaimed {
                wu_id: id.to_string(),
                assigned_to: existing.assigned_to.clone().unwrap_or_default(),
            });
        }
        let lane_name = existing.lane.clone();
        let registry = self.registry();
        registry.require(&lane_name)?;
        let lock_mgr = self.lock_manager();
        let zombie = lock_mgr.zombie_status(&lane_name)?;
        let wip = self.count_in_progress(&lane_name)?;
        registry.check_admission(&lane_name, zombie, wip)?;

        let pid = std::process::id() as i32;
        lock_mgr.acquire(&lane_name, &id.to_string(), pid)?;

        let target_branch = if self.ctx.config.merge.mode == MergeMode::BranchPr {
            self.feature_branch(id)
        } else {
            self.main_target_branch()
        };
        let branch_for_record = target_branch.clone();
        let assigned_to = assigned_to.to_string();
        let clock = self.ctx.exec.clock().clone();

        let outcome = self.commit("wu-claim", id, self.sync_mode(), target_branch, move |worktree, store, id| {
            let mut record = store.load(id)?;
            if record.status != WuStatus::Ready {
                return Err(LfError::WuAlreadyClaimed {
                    wu_id: id.to_string(),
                    assigned_to: record.assigned_to.clone().unwrap_or_default(),
                });
            }
            assert_transition(record.status, WuStatus::InProgress, &id)?;
            let worktree_git = GitAdapter::new(worktree);
            let baseline_sha = worktree_git.rev_parse("HEAD")?;
            record.status = WuStatus::InProgress;
            record.assigned_to = Some(assigned_to.clone());
            record.claimed_at = Some(clock.now_iso8601());
            record.claimed_mode = Some(mode);
            record.baseline_main_sha = Some(baseline_sha);
            if matches!(mode, ClaimedMode::BranchPr | ClaimedMode::BranchOnly) {
                record.claimed_branch = Some(branch_for_record.clone());
            }
            let at = clock.now_iso8601();
            let event = Event::WuClaimed { wu_id: id, assigned_to: assigned_to.clone(), mode: mode.to_string(), at };
            Ok((record, event))
        });

        match outcome {
            Ok(record) => Ok(record),
            Err(e) => {
                let _ = lock_mgr.release(&lane_name);
                Err(match e {
                    LfError::RebaseConflict { .. } => LfError::WuAlreadyClaimed {
                        wu_id: id.to_string(),
                        assigned_to: "unknown (lost a concurrent claim race)".to_string(),
                    },
                    other => other,
                })
            }
        }
    }

    /// Opposite of `claim` (spec §4.1): used directly by the release CLI
    /// and by the recovery analyser's compensating-push path.
    pub fn release(&self, id: WuId, reason: Option<&str>) -> Result<WuRecord, LfError> {
        let existing = self.record_store().load(id)?;
        let lane_name = existing.lane.clone();
        let target_branch = self.target_branch_for(&existing);
        let reason = reason.map(str::to_string);
        let clock = self.ctx.exec.clock().clone();

        let result = self.commit("wu-release", id, self.sync_mode(), target_branch, move |_wt, store, id| {
            let mut record = store.load(id)?;
            assert_transition(record.status, WuStatus::Ready, &id)?;
            record.status = WuStatus::Ready;
            record.assigned_to = None;
            record.claimed_at = None;
            record.claimed_mode = None;
            record.claimed_branch = None;
            record.worktree_path = None;
            record.baseline_main_sha = None;
            let at = clock.now_iso8601();
            let event = Event::WuReleased { wu_id: id, at, reason: reason.clone() };
            Ok((record, event))
        });
        let _ = self.lock_manager().release(&lane_name);
        result
    }

    pub fn block(&self, id: WuId, reason: &str) -> Result<WuRecord, LfError> {
        let existing = self.record_store().load(id)?;
        let lane_name = existing.lane.clone();
        let target_branch = self.target_branch_for(&existing);
        let reason = reason.to_string();
        let clock = self.ctx.exec.clock().clone();

        let result = self.commit("wu-block", id, self.sync_mode(), target_branch, move |_wt, store, id| {
            let mut record = store.load(id)?;
            assert_transition(record.status, WuStatus::Blocked, &id)?;
            record.status = WuStatus::Blocked;
            record.block_reason = Some(reason.clone());
            let at = clock.now_iso8601();
            let event = Event::WuBlocked { wu_id: id, reason: reason.clone(), at };
            Ok((record, event))
        });
        let _ = self.lock_manager().release(&lane_name);
        result
    }

    pub fn unblock(&self, id: WuId) -> Result<WuRecord, LfError> {
        let existing = self.record_store().load(id)?;
        let lane_name = existing.lane.clone();
        let registry = self.registry();
        registry.require(&lane_name)?;
        let lock_mgr = self.lock_manager();
        let zombie = lock_mgr.zombie_status(&lane_name)?;
        let wip = self.count_in_progress(&lane_name)?;
        registry.check_admission(&lane_name, zombie, wip)?;
        let pid = std::process::id() as i32;
        lock_mgr.acquire(&lane_name, &id.to_string(), pid)?;

        let target_branch = self.target_branch_for(&existing);
        let clock = self.ctx.exec.clock().clone();
        let outcome = self.commit("wu-unblock", id, self.sync_mode(), target_branch, move |_wt, store, id| {
            let mut record = store.load(id)?;
            assert_transition(record.status, WuStatus::InProgress, &id)?;
            record.status = WuStatus::InProgress;
            record.block_reason = None;
            let at = clock.now_iso8601();
            let event = Event::WuUnblocked { wu_id: id, at };
            Ok((record, event))
        });
        if outcome.is_err() {
            let _ = lock_mgr.release(&lane_name);
        }
        outcome
    }

    /// Requires a completion stamp to already exist (spec §4.1's edge-case
    /// policy) — `complete` only promotes status, it never authors the
    /// stamp itself; callers use [`LifecycleEngine::mark_done`] for that.
    pub fn complete(&self, id: WuId) -> Result<WuRecord, LfError> {
        if !self.stamp_store().exists(id) {
            return Err(LfError::TransactionError {
                reason: format!("{id} has no completion stamp; run mark-done before complete"),
            });
        }
        let existing = self.record_store().load(id)?;
        let lane_name = existing.lane.clone();
        let target_branch = self.target_branch_for(&existing);
        let clock = self.ctx.exec.clock().clone();

        let result = self.commit("wu-complete", id, self.sync_mode(), target_branch, move |worktree, store, id| {
            let mut record = store.load(id)?;
            assert_transition(record.status, WuStatus::Done, &id)?;
            record.status = WuStatus::Done;
            let git = GitAdapter::new(worktree);
            let commit = git.rev_parse("HEAD").ok();
            let at = clock.now_iso8601();
            let event = Event::WuCompleted { wu_id: id, at, merge_commit: commit };
            Ok((record, event))
        });
        let _ = self.lock_manager().release(&lane_name);
        result
    }

    /// Write the completion stamp ahead of `complete`, through the same
    /// merger protocol (the stamps directory is mainline-tracked state too).
    pub fn mark_done(&self, id: WuId, title: &str) -> Result<(), LfError> {
        let existing = self.record_store().load(id)?;
        let target_branch = self.target_branch_for(&existing);
        let stamps_dir = self.ctx.config.stamps_dir.clone();
        let date = self.ctx.exec.clock().today();
        let title = title.to_string();
        let wu_id_str = id.to_string();
        let retry = self.ctx.config.merge.retry.clone();
        let main_branch = self.ctx.config.merge.main_branch.clone();

        lf_git::run(
            &self.git,
            MergeRequest {
                operation: "wu-mark-done",
                wu_id: &wu_id_str,
                sync_mode: self.sync_mode(),
                remote: "origin",
                main_branch: &main_branch,
                target_branch: &target_branch,
                retry,
            },
            move |worktree| {
                let store = StampStore::new(worktree.join(&stamps_dir));
                store.create(id, &title, &date)?;
                Ok((format!("mark WU-done stamp for {id}"), vec![]))
            },
        )?;
        Ok(())
    }

    /// Remove the YAML record, prune this WU's events from the log
    /// (preserving malformed lines the engine doesn't own), remove the
    /// stamp, and regenerate views.
    pub fn delete(&self, id: WuId) -> Result<(), LfError> {
        let existing = self.record_store().load(id)?;
        let target_branch = self.target_branch_for(&existing);
        let wu_dir = self.ctx.config.wu_dir.clone();
        let event_log_path = self.ctx.config.event_log_path.clone();
        let backlog_path = self.ctx.config.backlog_path.clone();
        let status_path = self.ctx.config.status_path.clone();
        let stamps_dir = self.ctx.config.stamps_dir.clone();
        let retry = self.ctx.config.merge.retry.clone();
        let main_branch = self.ctx.config.merge.main_branch.clone();
        let wu_id_str = id.to_string();
        let clock = self.ctx.exec.clock().clone();
        let lane_name = existing.lane.clone();

        lf_git::run(
            &self.git,
            MergeRequest {
                operation: "wu-delete",
                wu_id: &wu_id_str,
                sync_mode: self.sync_mode(),
                remote: "origin",
                main_branch: &main_branch,
                target_branch: &target_branch,
                retry,
            },
            move |worktree| {
                let store = RecordStore::new(worktree.join(&wu_dir));
                store.delete(id)?;
                StampStore::new(worktree.join(&stamps_dir)).remove(id)?;

                let log_path = worktree.join(&event_log_path);
                let existing_log = EventLog::open(&log_path, 0)?;
                let kept: Vec<_> = existing_log
                    .all()
                    .iter()
                    .filter(|entry| entry.raw.is_some() || entry.event.wu_id() != Some(id))
                    .cloned()
                    .collect();
                drop(existing_log);
                let mut rewritten = String::new();
                for entry in &kept {
                    if let Some(raw) = &entry.raw {
                        rewritten.push_str(raw);
                    } else {
                        rewritten.push_str(&serde_json::to_string(&entry.event).map_err(|e| LfError::YamlParseError {
                            path: log_path.clone(),
                            reason: e.to_string(),
                        })?);
                    }
                    rewritten.push('\n');
                }
                std::fs::write(&log_path, rewritten).map_err(|e| LfError::io(&log_path, e))?;
                let mut log = EventLog::open(&log_path, 0)?;
                log.append(&Event::WuDeleted { wu_id: id, at: clock.now_iso8601() })?;
                log.flush()?;

                let all = store.load_all()?;
                let backlog_file = worktree.join(&backlog_path);
                let status_file = worktree.join(&status_path);
                std::fs::write(&backlog_file, render_backlog(&all)).map_err(|e| LfError::io(&backlog_file, e))?;
                std::fs::write(&status_file, render_status(&all)).map_err(|e| LfError::io(&status_file, e))?;
                Ok((format!("delete {id}"), vec![]))
            },
        )?;
        let _ = self.lock_manager().release(&lane_name);
        Ok(())
    }

    fn target_branch_for(&self, record: &WuRecord) -> String {
        if self.ctx.config.merge.mode == MergeMode::BranchPr {
            record.claimed_branch.clone().unwrap_or_else(|| self.main_target_branch())
        } else {
            self.main_target_branch()
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
