// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::{FakeClock, FakePidProbe};
use tempfile::tempdir;

fn manager(dir: &Path, clock: FakeClock, probe: FakePidProbe) -> LockManager<FakeClock, FakePidProbe> {
    LockManager::new(dir.to_path_buf(), clock, probe)
}

#[test]
fn acquire_then_read_round_trips() {
    let dir = tempdir().unwrap();
    let mgr = manager(dir.path(), FakeClock::new(), FakePidProbe::new());
    mgr.acquire("payments", "WU-1", 123).unwrap();
    let record = mgr.read("payments").unwrap().unwrap();
    assert_eq!(record.wu_id, "WU-1");
    assert_eq!(record.pid, 123);
}

#[test]
fn acquire_twice_fails_exclusive_create() {
    let dir = tempdir().unwrap();
    let mgr = manager(dir.path(), FakeClock::new(), FakePidProbe::new());
    mgr.acquire("payments", "WU-1", 123).unwrap();
    let err = mgr.acquire("payments", "WU-2", 456).unwrap_err();
    assert!(matches!(err, LfError::LockError { .. }));
}

#[test]
fn release_missing_lock_is_a_no_op_success() {
    let dir = tempdir().unwrap();
    let mgr = manager(dir.path(), FakeClock::new(), FakePidProbe::new());
    mgr.release("payments").unwrap();
}

#[test]
fn release_then_reacquire_succeeds() {
    let dir = tempdir().unwrap();
    let mgr = manager(dir.path(), FakeClock::new(), FakePidProbe::new());
    mgr.acquire("payments", "WU-1", 123).unwrap();
    mgr.release("payments").unwrap();
    mgr.acquire("payments", "WU-2", 456).unwrap();
}

#[test]
fn zombie_status_none_for_unlocked_lane() {
    let dir = tempdir().unwrap();
    let mgr = manager(dir.path(), FakeClock::new(), FakePidProbe::new());
    assert_eq!(mgr.zombie_status("payments").unwrap(), None);
}

#[test]
fn zombie_status_live_for_fresh_lock_with_alive_pid() {
    let dir = tempdir().unwrap();
    let mgr = manager(dir.path(), FakeClock::new(), FakePidProbe::new());
    mgr.acquire("payments", "WU-1", 123).unwrap();
    assert_eq!(mgr.zombie_status("payments").unwrap(), Some(None));
}

#[test]
fn zombie_status_dead_pid_wins_over_fresh_timestamp() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    let probe = FakePidProbe::new();
    let mgr = manager(dir.path(), clock, probe.clone());
    mgr.acquire("payments", "WU-1", 99999).unwrap();
    probe.kill(99999);
    assert_eq!(mgr.zombie_status("payments").unwrap(), Some(Some(ZombieReason::DeadPid)));
}

#[test]
fn zombie_status_stale_timestamp_with_live_pid() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    let probe = FakePidProbe::new();
    let mgr = manager(dir.path(), clock.clone(), probe)
        .with_staleness_threshold_ms(1000);
    mgr.acquire("payments", "WU-1", 123).unwrap();
    clock.advance(std::time::Duration::from_secs(2));
    assert_eq!(mgr.zombie_status("payments").unwrap(), Some(Some(ZombieReason::Stale)));
}

#[test]
fn list_locked_lanes_returns_sorted_lane_names() {
    let dir = tempdir().unwrap();
    let mgr = manager(dir.path(), FakeClock::new(), FakePidProbe::new());
    mgr.acquire("payments", "WU-1", 1).unwrap();
    mgr.acquire("api", "WU-2", 2).unwrap();
    assert_eq!(mgr.list_locked_lanes().unwrap(), vec!["api".to_string(), "payments".to_string()]);
}
