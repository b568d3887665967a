// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::test_support::fake_context;
use lf_core::{FakeClock, FakePidProbe, WorkspaceConfig};
use lf_engine::ClaimContext;
use lf_git::GitAdapter;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn monitor(repo_root: &std::path::Path) -> DelegationMonitor<FakeClock, FakePidProbe> {
    let git = GitAdapter::new(repo_root);
    git.run(&["init", "-b", "main"]).unwrap();
    git.run(&["config", "user.email", "test@example.com"]).unwrap();
    git.run(&["config", "user.name", "Test User"]).unwrap();
    git.commit("initial").unwrap();

    let mut config = WorkspaceConfig::default();
    config.merge.require_remote = false;
    let ctx = ClaimContext::new(fake_context(repo_root), config);
    DelegationMonitor::new(ctx)
}

#[tokio::test(start_paused = true)]
async fn cancelling_before_the_next_cycle_stops_the_loop_after_one_run() {
    let dir = tempdir().unwrap();
    let monitor = monitor(dir.path());
    let cancel = CancellationToken::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_clone = Arc::clone(&calls);
    let cancel_clone = cancel.clone();
    let handle = tokio::spawn(async move {
        run_watch(&monitor, Duration::from_secs(60), cancel_clone, move |_report| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        })
        .await;
    });

    tokio::task::yield_now().await;
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn runs_again_after_the_interval_elapses() {
    let dir = tempdir().unwrap();
    let monitor = monitor(dir.path());
    let cancel = CancellationToken::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let calls_clone = Arc::clone(&calls);
    let cancel_clone = cancel.clone();
    let handle = tokio::spawn(async move {
        run_watch(&monitor, Duration::from_secs(60), cancel_clone, move |_report| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        })
        .await;
    });

    tokio::time::advance(Duration::from_secs(61)).await;
    tokio::task::yield_now().await;

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

    assert!(calls.load(Ordering::SeqCst) >= 2, "expected the initial cycle plus at least one interval-driven rerun");
}
