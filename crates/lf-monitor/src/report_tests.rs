// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::test_support::fake_context;
use lf_core::{DelegationId, FakeClock, FakePidProbe, WorkspaceConfig, WuId};
use lf_engine::{ClaimContext, DelegationTracker};
use lf_git::GitAdapter;
use lf_lanes::LockManager;
use tempfile::tempdir;

fn monitor(repo_root: &std::path::Path, stuck_threshold_minutes: u64) -> (DelegationMonitor<FakeClock, FakePidProbe>, ClaimContext<FakeClock, FakePidProbe>) {
    let git = GitAdapter::new(repo_root);
    git.run(&["init", "-b", "main"]).unwrap();
    git.run(&["config", "user.email", "test@example.com"]).unwrap();
    git.run(&["config", "user.name", "Test User"]).unwrap();
    git.commit("initial").unwrap();

    let mut config = WorkspaceConfig::default();
    config.merge.require_remote = false;
    config.delegation.stuck_threshold_minutes = stuck_threshold_minutes;
    let ctx = ClaimContext::new(fake_context(repo_root), config);
    (DelegationMonitor::new(ctx.clone()), ctx)
}

#[test]
fn tallies_status_counts_across_every_recorded_delegation() {
    let dir = tempdir().unwrap();
    let (monitor, ctx) = monitor(dir.path(), 30);
    let tracker = DelegationTracker::new(ctx);
    tracker.record(DelegationId::new(1), WuId::new(1), "lane-a", None).unwrap();
    tracker.record(DelegationId::new(2), WuId::new(2), "lane-a", None).unwrap();
    tracker.record_completion(DelegationId::new(2)).unwrap();

    let report = monitor.run_once().unwrap();
    assert_eq!(report.status_counts.pending, 1);
    assert_eq!(report.status_counts.completed, 1);
}

#[test]
fn pending_delegation_past_threshold_is_flagged_stuck_with_a_suggestion() {
    let dir = tempdir().unwrap();
    let (monitor, ctx) = monitor(dir.path(), 30);
    let clock = ctx.exec.clock().clone();
    let tracker = DelegationTracker::new(ctx);
    tracker.record(DelegationId::new(1), WuId::new(1), "lane-a", None).unwrap();

    clock.advance(std::time::Duration::from_secs(31 * 60));

    let report = monitor.run_once().unwrap();
    assert_eq!(report.stuck.len(), 1);
    assert_eq!(report.stuck[0].id, DelegationId::new(1));
    assert!(report.suggestions.iter().any(|s| s.command.contains("delegation-timeout")));
}

#[test]
fn pending_delegation_under_threshold_is_not_flagged_stuck() {
    let dir = tempdir().unwrap();
    let (monitor, ctx) = monitor(dir.path(), 30);
    let clock = ctx.exec.clock().clone();
    let tracker = DelegationTracker::new(ctx);
    tracker.record(DelegationId::new(1), WuId::new(1), "lane-a", None).unwrap();

    clock.advance(std::time::Duration::from_secs(5 * 60));

    let report = monitor.run_once().unwrap();
    assert!(report.stuck.is_empty());
}

#[test]
fn zombie_lane_lock_is_reported_with_a_suggestion() {
    let dir = tempdir().unwrap();
    let (monitor, ctx) = monitor(dir.path(), 30);
    let pid_probe = ctx.exec.pid_probe().clone();
    pid_probe.kill(4242);
    let lock_manager = LockManager::new(ctx.exec.resolve(&ctx.config.locks_dir), ctx.exec.clock().clone(), pid_probe);
    lock_manager.acquire("lane-a", "WU-9", 4242).unwrap();

    let report = monitor.run_once().unwrap();
    assert_eq!(report.zombie_locks.len(), 1);
    assert_eq!(report.zombie_locks[0].0, "lane-a");
    assert!(report.suggestions.iter().any(|s| s.command.contains("lane-unlock lane-a")));
}

#[test]
fn healthy_workspace_reports_no_stuck_or_zombie_entries() {
    let dir = tempdir().unwrap();
    let (monitor, _ctx) = monitor(dir.path(), 30);
    let report = monitor.run_once().unwrap();
    assert!(report.stuck.is_empty());
    assert!(report.zombie_locks.is_empty());
    assert!(report.suggestions.is_empty());
}
