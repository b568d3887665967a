// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim validation (C13, spec §4.5): a WU's `acceptance` entries are either
//! free text (skipped) or a structured absolute claim recognized by one of a
//! small registry of checkers, each of which scans the repo for evidence
//! that contradicts the claim. Mirrors the teacher's adapter-trait-per-
//! backend style (`SessionAdapter`, `Clock`): add a new claim kind by
//! implementing [`ClaimChecker`], not by branching inside a god function.

use lf_core::{LfError, WuRecord};
use std::path::{Path, PathBuf};

/// Directories never scanned: build artefacts, VCS metadata, and the
/// read-only example pack this workspace must never treat as its own code.
const IGNORED_DIRS: &[&str] = &["target", "node_modules", ".git", "dist", "build", "examples"];

/// One line of a file that contradicts a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    pub file: PathBuf,
    pub line: usize,
    pub text: String,
}

/// A claim a checker recognized and found violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimViolation {
    pub claim: String,
    pub checker_id: &'static str,
    pub evidence: Vec<Evidence>,
    pub remediation: String,
}

/// One checkable absolute claim a WU's `acceptance` list may assert.
///
/// `recognizes` decides whether a given acceptance line is this checker's
/// business at all; free text and claims no registered checker recognizes
/// are left alone rather than treated as violations.
pub trait ClaimChecker {
    fn id(&self) -> &'static str;
    fn recognizes(&self, claim: &str) -> bool;
    fn remediation(&self) -> &'static str;
    fn scan(&self, repo_root: &Path) -> Result<Vec<Evidence>, LfError>;
}

/// "core has no `process.exit`"-style claim: library code must propagate
/// `LfError`, never exit the process directly. Only the CLI boundary is
/// exempt, so any crate whose directory name contains `cli` is skipped.
pub struct NoProcessExitChecker;

impl ClaimChecker for NoProcessExitChecker {
    fn id(&self) -> &'static str {
        "no-bare-process-exit"
    }

    fn recognizes(&self, claim: &str) -> bool {
        let c = claim.to_lowercase();
        c.contains("process::exit") || c.contains("process.exit") || c.contains("no process exit")
    }

    fn remediation(&self) -> &'static str {
        "return LfError (or LfError::ProcessExit at the CLI boundary) instead of calling std::process::exit directly"
    }

    fn scan(&self, repo_root: &Path) -> Result<Vec<Evidence>, LfError> {
        scan_rust_files(repo_root, |path| !path_contains_component(path, "cli"), |line| line.contains("process::exit") || line.contains("process.exit"))
    }
}

/// "no `.unwrap()`/`.expect()` outside tests"-style claim: mirrors this
/// workspace's own `clippy::unwrap_used`/`expect_used` deny lints, so a WU
/// can assert it didn't quietly re-introduce either inside non-test code.
pub struct NoUnwrapOrExpectChecker;

impl ClaimChecker for NoUnwrapOrExpectChecker {
    fn id(&self) -> &'static str {
        "no-unwrap-or-expect-outside-tests"
    }

    fn recognizes(&self, claim: &str) -> bool {
        let c = claim.to_lowercase();
        c.contains(".unwrap()") || c.contains(".expect(") || c.contains("no unwrap") || c.contains("no panics")
    }

    fn remediation(&self) -> &'static str {
        "propagate the error with `?` instead of .unwrap()/.expect(); if this really can't fail, return a typed LfError anyway"
    }

    fn scan(&self, repo_root: &Path) -> Result<Vec<Evidence>, LfError> {
        scan_rust_files(
            repo_root,
            |path| !path_contains_component(path, "tests") && !path.to_string_lossy().ends_with("_tests.rs"),
            |line| {
                let trimmed = line.trim_start();
                !trimmed.starts_with("//") && (line.contains(".unwrap()") || line.contains(".expect("))
            },
        )
    }
}

fn path_contains_component(path: &Path, needle: &str) -> bool {
    path.components().any(|c| c.as_os_str().to_string_lossy().contains(needle))
}

fn scan_rust_files(
    repo_root: &Path,
    include_path: impl Fn(&Path) -> bool,
    flag_line: impl Fn(&str) -> bool,
) -> Result<Vec<Evidence>, LfError> {
    let mut evidence = Vec::new();
    let mut stack = vec![repo_root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else { continue };
            if file_type.is_dir() {
                let name = entry.file_name();
                if !IGNORED_DIRS.contains(&name.to_string_lossy().as_ref()) {
                    stack.push(path);
                }
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("rs") {
                continue;
            }
            let Ok(rel) = path.strip_prefix(repo_root) else { continue };
            if !include_path(rel) {
                continue;
            }
            let Ok(contents) = std::fs::read_to_string(&path) else { continue };
            for (idx, line) in contents.lines().enumerate() {
                if flag_line(line) {
                    evidence.push(Evidence { file: rel.to_path_buf(), line: idx + 1, text: line.trim().to_string() });
                }
            }
        }
    }
    evidence.sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));
    Ok(evidence)
}

/// Parses `claim-validation:allow <claim-id> <glob>` directives out of a WU's
/// `acceptance` entries: paths matching the glob are exempt from that
/// checker's findings for this WU.
fn parse_allowlist(acceptance: &[String]) -> Vec<(String, glob::Pattern)> {
    acceptance
        .iter()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("claim-validation:allow")?;
            let mut parts = rest.split_whitespace();
            let claim_id = parts.next()?.to_string();
            let pattern = glob::Pattern::new(parts.next()?).ok()?;
            Some((claim_id, pattern))
        })
        .collect()
}

/// Runs every registered checker against a WU's `acceptance` list, returning
/// one [`ClaimViolation`] per recognized-and-violated claim. A claim that
/// no checker recognizes, or whose evidence is entirely allowlisted, never
/// produces a violation.
pub struct ClaimValidator {
    checkers: Vec<Box<dyn ClaimChecker>>,
}

impl ClaimValidator {
    pub fn new() -> Self {
        Self { checkers: vec![Box::new(NoProcessExitChecker), Box::new(NoUnwrapOrExpectChecker)] }
    }

    pub fn validate(&self, wu: &WuRecord, repo_root: &Path) -> Result<Vec<ClaimViolation>, LfError> {
        let allowlist = parse_allowlist(&wu.acceptance);
        let mut violations = Vec::new();
        for claim in &wu.acceptance {
            for checker in &self.checkers {
                if !checker.recognizes(claim) {
                    continue;
                }
                let waived: Vec<&glob::Pattern> = allowlist
                    .iter()
                    .filter(|(id, _)| id == checker.id())
                    .map(|(_, pattern)| pattern)
                    .collect();
                let evidence: Vec<Evidence> = checker
                    .scan(repo_root)?
                    .into_iter()
                    .filter(|e| !waived.iter().any(|p| p.matches(&e.file.to_string_lossy())))
                    .collect();
                if !evidence.is_empty() {
                    violations.push(ClaimViolation {
                        claim: claim.clone(),
                        checker_id: checker.id(),
                        evidence,
                        remediation: checker.remediation().to_string(),
                    });
                }
            }
        }
        Ok(violations)
    }
}

impl Default for ClaimValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience entry point for callers that don't need to hold onto a
/// [`ClaimValidator`] across calls.
pub fn validate_claims(wu: &WuRecord, repo_root: &Path) -> Result<Vec<ClaimViolation>, LfError> {
    ClaimValidator::new().validate(wu, repo_root)
}

#[cfg(test)]
#[path = "claimcheck_tests.rs"]
mod tests;
