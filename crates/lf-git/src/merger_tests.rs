// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::adapter::GitAdapter;
use std::fs;
use tempfile::tempdir;

fn bare_remote(dir: &Path) {
    GitAdapter::new(dir).run(&["init", "--bare", "-b", "main"]).unwrap();
}

fn checkout(dir: &Path, remote: &Path) -> GitAdapter {
    let adapter = GitAdapter::new(dir);
    adapter.run(&["init", "-b", "main"]).unwrap();
    adapter.run(&["config", "user.email", "test@example.com"]).unwrap();
    adapter.run(&["config", "user.name", "Test User"]).unwrap();
    adapter.run(&["remote", "add", "origin", &remote.to_string_lossy()]).unwrap();
    adapter.commit("initial").unwrap();
    adapter.push_force("origin", "main", "main").unwrap();
    adapter
}

fn fast_retry() -> RetryConfig {
    RetryConfig { max_attempts: 6, base_delay_ms: 1, max_delay_ms: 2, jitter_fraction: 0.0 }
}

#[test]
fn local_only_merge_commits_without_touching_remote() {
    let repo_dir = tempdir().unwrap();
    let repo = GitAdapter::new(repo_dir.path());
    repo.run(&["init", "-b", "main"]).unwrap();
    repo.run(&["config", "user.email", "test@example.com"]).unwrap();
    repo.run(&["config", "user.name", "Test User"]).unwrap();
    repo.commit("initial").unwrap();

    let request = MergeRequest {
        operation: "wu-create",
        wu_id: "WU-1",
        sync_mode: SyncMode::LocalOnly,
        remote: "origin",
        main_branch: "main",
        target_branch: "main",
        retry: fast_retry(),
    };

    let outcome = run(&repo, request, |wt| {
        fs::write(wt.join("wu.txt"), "hello").unwrap();
        Ok(("create WU-1".to_string(), vec![]))
    })
    .unwrap();

    assert_eq!(outcome.attempts, 1);
    assert_eq!(repo.rev_parse("main").unwrap(), outcome.commit_sha);
    assert!(!repo_dir.path().join("wu.txt").exists(), "local-only merger must not touch the main checkout's tree");
}

#[test]
fn standard_mode_pushes_on_first_attempt_when_no_race() {
    let remote_dir = tempdir().unwrap();
    bare_remote(remote_dir.path());
    let repo_dir = tempdir().unwrap();
    let repo = checkout(repo_dir.path(), remote_dir.path());

    let request = MergeRequest {
        operation: "wu-claim",
        wu_id: "WU-1",
        sync_mode: SyncMode::Standard,
        remote: "origin",
        main_branch: "main",
        target_branch: "main",
        retry: fast_retry(),
    };

    let outcome = run(&repo, request, |wt| {
        fs::write(wt.join("wu.txt"), "hello").unwrap();
        Ok(("claim WU-1".to_string(), vec![]))
    })
    .unwrap();

    assert_eq!(outcome.attempts, 1);
}

#[test]
fn push_only_mode_rebases_and_retries_past_a_concurrent_advance() {
    let remote_dir = tempdir().unwrap();
    bare_remote(remote_dir.path());
    let repo_dir = tempdir().unwrap();
    let repo = checkout(repo_dir.path(), remote_dir.path());

    // Simulate a competing process advancing origin/main between our
    // worktree's base and our push, by pushing directly from a second
    // clone before our `execute` closure runs.
    let racer_dir = tempdir().unwrap();
    let racer = GitAdapter::new(racer_dir.path());
    racer.run(&["clone", &remote_dir.path().to_string_lossy(), "."]).unwrap();
    racer.run(&["config", "user.email", "racer@example.com"]).unwrap();
    racer.run(&["config", "user.name", "Racer"]).unwrap();

    let request = MergeRequest {
        operation: "wu-claim",
        wu_id: "WU-2",
        sync_mode: SyncMode::PushOnly,
        remote: "origin",
        main_branch: "main",
        target_branch: "main",
        retry: fast_retry(),
    };

    let outcome = run(&repo, request, |wt| {
        // Race: advance origin/main after our worktree is based, before we push.
        fs::write(racer_dir.path().join("racer.txt"), "x").unwrap();
        racer.stage(&[]).unwrap();
        racer.commit("racer commit").unwrap();
        racer.push("origin", "main", "main").unwrap();

        fs::write(wt.join("wu.txt"), "hello").unwrap();
        Ok(("claim WU-2".to_string(), vec![]))
    })
    .unwrap();

    assert!(outcome.attempts >= 2, "expected at least one rebase-retry, got {} attempt(s)", outcome.attempts);
}

#[test]
fn retry_exhaustion_surfaces_operation_and_retry_count() {
    let remote_dir = tempdir().unwrap();
    bare_remote(remote_dir.path());
    let repo_dir = tempdir().unwrap();
    let repo = checkout(repo_dir.path(), remote_dir.path());

    let racer_dir = tempdir().unwrap();
    let racer = GitAdapter::new(racer_dir.path());
    racer.run(&["clone", &remote_dir.path().to_string_lossy(), "."]).unwrap();
    racer.run(&["config", "user.email", "racer@example.com"]).unwrap();
    racer.run(&["config", "user.name", "Racer"]).unwrap();

    let request = MergeRequest {
        operation: "wu-claim",
        wu_id: "WU-3",
        sync_mode: SyncMode::PushOnly,
        remote: "origin",
        main_branch: "main",
        target_branch: "main",
        retry: RetryConfig { max_attempts: 1, base_delay_ms: 1, max_delay_ms: 2, jitter_fraction: 0.0 },
    };

    let err = run(&repo, request, |wt| {
        // A single racer advance is enough to lose the only push attempt
        // this config allows.
        fs::write(racer_dir.path().join("racer.txt"), "x").unwrap();
        racer.stage(&[]).unwrap();
        racer.commit("racer commit").unwrap();
        racer.push("origin", "main", "main").unwrap();

        fs::write(wt.join("wu.txt"), "hello").unwrap();
        Ok(("claim WU-3".to_string(), vec![]))
    })
    .unwrap_err();

    match err {
        LfError::RetryExhaustion { operation, retries } => {
            assert_eq!(operation, "wu-claim");
            assert_eq!(retries, 1);
        }
        other => panic!("expected RetryExhaustion, got {other:?}"),
    }
}

#[test]
fn execute_failure_still_cleans_up_worktree_and_branch() {
    let repo_dir = tempdir().unwrap();
    let repo = GitAdapter::new(repo_dir.path());
    repo.run(&["init", "-b", "main"]).unwrap();
    repo.run(&["config", "user.email", "test@example.com"]).unwrap();
    repo.run(&["config", "user.name", "Test User"]).unwrap();
    repo.commit("initial").unwrap();

    let request = MergeRequest {
        operation: "wu-claim",
        wu_id: "WU-4",
        sync_mode: SyncMode::LocalOnly,
        remote: "origin",
        main_branch: "main",
        target_branch: "main",
        retry: fast_retry(),
    };

    let err = run(&repo, request, |_wt| {
        Err(LfError::TransactionError { reason: "boom".into() })
    })
    .unwrap_err();
    assert!(matches!(err, LfError::TransactionError { .. }));

    let branches = repo.branch_list().unwrap();
    assert!(!branches.iter().any(|b| b == "tmp/wu-claim/WU-4"));
}
