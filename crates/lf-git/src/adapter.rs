// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin `git` subprocess wrapper (spec §6: "All reads/writes go through a
//! single adapter with strict argument validation").
//!
//! Every adapter is scoped to an explicit working directory at construction
//! time — never a process-global cwd — so parallel operations on distinct
//! worktrees never fight over `std::env::set_current_dir`.

use lf_core::LfError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The `git` binary to invoke; overridable for tests the way the rest of
/// the pack parameterises its subprocess adapters (e.g. `SHIPPER_GIT_BIN`).
fn git_program() -> String {
    std::env::var("LUMENFLOW_GIT_BIN").unwrap_or_else(|_| "git".to_string())
}

/// Output of a successful (or failed) git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub status_success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// A `git` adapter bound to one working directory.
#[derive(Debug, Clone)]
pub struct GitAdapter {
    cwd: PathBuf,
}

impl GitAdapter {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Run `git <args>` in this adapter's directory, validating that no
    /// argument is empty (an empty arg is almost always a caller bug that
    /// would otherwise silently no-op or misbehave inside git).
    pub fn run(&self, args: &[&str]) -> Result<GitOutput, LfError> {
        if args.is_empty() {
            return Err(LfError::BranchError {
                branch: String::new(),
                reason: "git invocation requires at least one argument".into(),
            });
        }
        if args.iter().any(|a| a.is_empty()) {
            return Err(LfError::BranchError {
                branch: String::new(),
                reason: format!("git invocation has an empty argument: {args:?}"),
            });
        }
        let output = Command::new(git_program())
            .args(args)
            .current_dir(&self.cwd)
            .output()
            .map_err(|e| LfError::io(&self.cwd, e))?;
        Ok(GitOutput {
            status_success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn run_ok(&self, args: &[&str], context: &str) -> Result<GitOutput, LfError> {
        let out = self.run(args)?;
        if !out.status_success {
            return Err(LfError::BranchError { branch: context.to_string(), reason: out.stderr });
        }
        Ok(out)
    }

    pub fn fetch(&self, remote: &str, refspec: &str) -> Result<(), LfError> {
        self.run_ok(&["fetch", remote, refspec], "fetch").map(|_| ())
    }

    pub fn rev_parse(&self, rev: &str) -> Result<String, LfError> {
        Ok(self.run_ok(&["rev-parse", rev], "rev-parse")?.stdout)
    }

    pub fn checkout(&self, branch: &str) -> Result<(), LfError> {
        self.run_ok(&["checkout", branch], branch).map(|_| ())
    }

    /// Fast-forward `branch` to `target` without checking it out or
    /// touching the working tree, even when `branch` is the one currently
    /// checked out (`--update-head-ok` is exactly the escape hatch git
    /// provides for that case).
    pub fn fast_forward(&self, branch: &str, target: &str) -> Result<(), LfError> {
        self.run_ok(&["fetch", "--update-head-ok", ".", &format!("{target}:{branch}")], branch).map(|_| ())
    }

    pub fn worktree_add(&self, worktree_path: &Path, new_branch: &str, base_ref: &str) -> Result<(), LfError> {
        let path_str = worktree_path.to_string_lossy().to_string();
        self.run_ok(&["worktree", "add", "-b", new_branch, &path_str, base_ref], new_branch).map(|_| ())
    }

    pub fn worktree_remove(&self, worktree_path: &Path) -> Result<(), LfError> {
        let path_str = worktree_path.to_string_lossy().to_string();
        let out = self.run(&["worktree", "remove", "--force", &path_str])?;
        if !out.status_success {
            return Err(LfError::WorktreeError { path: worktree_path.to_path_buf(), reason: out.stderr });
        }
        Ok(())
    }

    pub fn branch_delete(&self, branch: &str, force: bool) -> Result<(), LfError> {
        let flag = if force { "-D" } else { "-d" };
        self.run_ok(&["branch", flag, branch], branch).map(|_| ())
    }

    /// Stage exactly `paths` (deletion-aware via `git add -A -- <paths>`),
    /// or every pending change (including deletions) when `paths` is empty.
    pub fn stage(&self, paths: &[PathBuf]) -> Result<(), LfError> {
        if paths.is_empty() {
            self.run_ok(&["add", "-A"], "stage").map(|_| ())
        } else {
            let mut args = vec!["add".to_string(), "-A".to_string(), "--".to_string()];
            args.extend(paths.iter().map(|p| p.to_string_lossy().to_string()));
            let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
            self.run_ok(&arg_refs, "stage").map(|_| ())
        }
    }

    pub fn commit(&self, message: &str) -> Result<String, LfError> {
        self.run_ok(&["commit", "-m", message, "--allow-empty"], "commit")?;
        self.rev_parse("HEAD")
    }

    /// Push `local_branch:remote_branch` to `remote`. Returns `Ok(false)`
    /// (not an error) on a non-fast-forward rejection so callers can decide
    /// whether to rebase-and-retry; any other failure is a hard error.
    pub fn push(&self, remote: &str, local_branch: &str, remote_branch: &str) -> Result<bool, LfError> {
        let refspec = format!("{local_branch}:{remote_branch}");
        let out = self.run(&["push", remote, &refspec])?;
        if out.status_success {
            return Ok(true);
        }
        if is_non_fast_forward(&out.stderr) {
            return Ok(false);
        }
        Err(LfError::BranchError { branch: remote_branch.to_string(), reason: out.stderr })
    }

    /// Force-push (used under the `LUMENFLOW_FORCE` bypass, §6).
    pub fn push_force(&self, remote: &str, local_branch: &str, remote_branch: &str) -> Result<(), LfError> {
        let refspec = format!("{local_branch}:{remote_branch}");
        self.run_ok(&["push", "--force", remote, &refspec], remote_branch).map(|_| ())
    }

    pub fn rebase_onto(&self, target: &str) -> Result<(), LfError> {
        let out = self.run(&["rebase", target])?;
        if out.status_success {
            return Ok(());
        }
        let _ = self.run(&["rebase", "--abort"]);
        Err(LfError::RebaseConflict { branch: target.to_string(), reason: out.stderr })
    }

    pub fn status_porcelain(&self) -> Result<String, LfError> {
        Ok(self.run_ok(&["status", "--porcelain"], "status")?.stdout)
    }

    pub fn is_clean(&self) -> Result<bool, LfError> {
        Ok(self.status_porcelain()?.is_empty())
    }

    pub fn branch_list(&self) -> Result<Vec<String>, LfError> {
        let out = self.run_ok(&["branch", "--list", "--format=%(refname:short)"], "branch")?;
        Ok(out.stdout.lines().map(str::to_string).filter(|l| !l.is_empty()).collect())
    }

    pub fn worktree_list(&self) -> Result<Vec<String>, LfError> {
        let out = self.run_ok(&["worktree", "list", "--porcelain"], "worktree")?;
        Ok(out
            .stdout
            .lines()
            .filter_map(|l| l.strip_prefix("worktree "))
            .map(str::to_string)
            .collect())
    }
}

fn is_non_fast_forward(stderr: &str) -> bool {
    stderr.contains("non-fast-forward")
        || stderr.contains("fetch first")
        || stderr.contains("[rejected]")
        || stderr.contains("stale info")
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
