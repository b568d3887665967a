// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The micro-worktree merge protocol (C7, spec §4.3): the atomic commit
//! primitive every mutating WU operation funnels through.

use crate::adapter::GitAdapter;
use crate::env;
use crate::retry::delay_for_attempt;
use lf_core::{LfError, RetryConfig};
use std::path::{Path, PathBuf};

/// How the sync preamble treats local main, per spec §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Fast-forward local main to `origin/main` before basing the worktree.
    Standard,
    /// Never touch local main; base the worktree directly from `origin/main`.
    PushOnly,
    /// No remote configured: base the worktree from local main, no fetch.
    LocalOnly,
}

/// Everything the merger needs to know about one mutation attempt.
pub struct MergeRequest<'a> {
    /// Short operation name (e.g. `"wu-claim"`), used in the temp branch
    /// name and surfaced in `RetryExhaustion`/audit-log context.
    pub operation: &'a str,
    pub wu_id: &'a str,
    pub sync_mode: SyncMode,
    pub remote: &'a str,
    pub main_branch: &'a str,
    /// Branch the commit ultimately lands on. Equal to `main_branch` for
    /// every mode except branch-PR, which targets the caller's working
    /// branch directly (spec §4.3's "branch-PR variant").
    pub target_branch: &'a str,
    pub retry: RetryConfig,
}

/// Successful result of [`run`].
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub commit_sha: String,
    /// 1-indexed: `1` means the first push attempt succeeded.
    pub attempts: u32,
    pub forced: Option<String>,
}

/// What a caller's `execute` closure returns: the commit message, and the
/// paths to stage (empty means "stage everything, deletion-aware").
pub type ExecuteResult = (String, Vec<PathBuf>);

/// Run one micro-worktree mutation end to end.
///
/// `main_repo` must be an adapter bound to the real repo checkout (never a
/// worktree). `execute` receives the ephemeral worktree path and returns
/// what to commit; it must not touch anything outside that path.
pub fn run(
    main_repo: &GitAdapter,
    request: MergeRequest<'_>,
    execute: impl FnOnce(&Path) -> Result<ExecuteResult, LfError>,
) -> Result<MergeOutcome, LfError> {
    let base_ref = sync_preamble(main_repo, &request)?;

    let temp_root = std::env::temp_dir();
    let unique = nanoid::nanoid!(8);
    // Keyed by operation *and* wu_id (not wu_id alone) so two different
    // operations racing on the same WU never collide on one temp path —
    // see spec §9's open question about worktree-directory races.
    let worktree_path = temp_root.join(format!("lumenflow-{}-{}-{unique}", request.operation, request.wu_id));
    let branch = format!("tmp/{}/{}", request.operation, request.wu_id);

    main_repo.worktree_add(&worktree_path, &branch, &base_ref)?;

    let result = run_inner(main_repo, &request, &worktree_path, &branch, &base_ref, execute);

    cleanup(main_repo, &worktree_path, &branch);

    result
}

fn run_inner(
    main_repo: &GitAdapter,
    request: &MergeRequest<'_>,
    worktree_path: &Path,
    branch: &str,
    base_ref: &str,
    execute: impl FnOnce(&Path) -> Result<ExecuteResult, LfError>,
) -> Result<MergeOutcome, LfError> {
    let (message, files) = execute(worktree_path)?;

    let worktree_repo = GitAdapter::new(worktree_path);
    worktree_repo.stage(&files)?;
    let commit_sha = worktree_repo.commit(&message)?;

    if request.sync_mode == SyncMode::LocalOnly {
        // No remote: "pushing" is a local ref fast-forward, the serialisation
        // point degenerates to this single process.
        main_repo.fast_forward(request.target_branch, branch)?;
        return Ok(MergeOutcome { commit_sha, attempts: 1, forced: None });
    }

    let forced = env::force_push_permitted(request.operation);
    let attempts = push_with_retry(main_repo, &worktree_repo, request, branch, base_ref, forced.is_some())?;

    Ok(MergeOutcome { commit_sha, attempts, forced })
}

fn sync_preamble(main_repo: &GitAdapter, request: &MergeRequest<'_>) -> Result<String, LfError> {
    match request.sync_mode {
        SyncMode::LocalOnly => Ok(request.main_branch.to_string()),
        SyncMode::PushOnly => {
            main_repo.fetch(request.remote, request.main_branch)?;
            Ok(format!("{}/{}", request.remote, request.main_branch))
        }
        SyncMode::Standard => {
            main_repo.fetch(request.remote, request.main_branch)?;
            let remote_ref = format!("{}/{}", request.remote, request.main_branch);
            main_repo.fast_forward(request.main_branch, &remote_ref)?;
            Ok(request.main_branch.to_string())
        }
    }
}

/// Push `branch` onto `request.target_branch`, fetching and rebasing onto
/// the advanced remote on every non-fast-forward rejection, per spec §4.3
/// step 5. Returns the 1-indexed attempt count that finally succeeded.
fn push_with_retry(
    main_repo: &GitAdapter,
    worktree_repo: &GitAdapter,
    request: &MergeRequest<'_>,
    branch: &str,
    base_ref: &str,
    forced: bool,
) -> Result<u32, LfError> {
    let mut current_base = base_ref.to_string();
    for attempt in 1..=request.retry.max_attempts {
        if forced {
            worktree_repo.push_force(request.remote, branch, request.target_branch)?;
            return Ok(attempt);
        }
        let pushed = worktree_repo.push(request.remote, branch, request.target_branch)?;
        if pushed {
            return Ok(attempt);
        }
        if attempt == request.retry.max_attempts {
            break;
        }
        main_repo.fetch(request.remote, request.main_branch)?;
        let new_base = format!("{}/{}", request.remote, request.main_branch);
        worktree_repo.rebase_onto(&new_base)?;
        current_base = new_base;
        let delay = delay_for_attempt(&request.retry, attempt);
        std::thread::sleep(delay);
    }
    let _ = current_base;
    Err(LfError::RetryExhaustion { operation: request.operation.to_string(), retries: request.retry.max_attempts })
}

/// Best-effort cleanup: remove the worktree and its temp branch. If the
/// worktree directory survives `git worktree remove` (e.g. it was already
/// partially torn down), force-remove it directly per spec §4.3 step 6.
fn cleanup(main_repo: &GitAdapter, worktree_path: &Path, branch: &str) {
    if main_repo.worktree_remove(worktree_path).is_err() && worktree_path.exists() {
        let _ = std::fs::remove_dir_all(worktree_path);
        let _ = main_repo.run(&["worktree", "prune"]);
    }
    let _ = main_repo.branch_delete(branch, true);
}

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;
