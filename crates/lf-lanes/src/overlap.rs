// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `OverlapAnalyser` (C6, spec §4.2): for every unordered lane pair, expand
//! glob placeholders into concrete probe paths, cross-match each lane's
//! pattern against the other's probes, and on any hit enumerate real repo
//! files as evidence.

use lf_core::LaneDef;
use std::path::Path;

/// One confirmed overlap between two lanes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapReport {
    pub lanes: (String, String),
    pub pattern: String,
    pub files: Vec<String>,
}

pub struct OverlapAnalyser<'a> {
    repo_root: &'a Path,
}

impl<'a> OverlapAnalyser<'a> {
    pub fn new(repo_root: &'a Path) -> Self {
        Self { repo_root }
    }

    /// Probe paths standing in for `**`/`*` wildcards when checking whether
    /// one lane's glob could plausibly match inside another lane's tree.
    fn probe_paths(patterns: &[String]) -> Vec<String> {
        patterns
            .iter()
            .flat_map(|p| {
                let concrete = p.replace("**", "probe").replace('*', "x");
                vec![concrete.clone(), format!("{}/nested/probe.rs", concrete.trim_end_matches("/probe"))]
            })
            .collect()
    }

    fn lane_matches_any(lane: &LaneDef, probes: &[String]) -> bool {
        lane.patterns.iter().any(|pattern| {
            let Ok(glob_pattern) = glob::Pattern::new(pattern) else {
                return false;
            };
            probes.iter().any(|probe| glob_pattern.matches(probe))
        })
    }

    /// Check every unordered pair of `lanes` for overlap, returning one
    /// report per pair that cross-matches (spec §4.2's `healthy()` gate
    /// returns false when this is non-empty).
    pub fn analyse(&self, lanes: &[LaneDef]) -> Vec<OverlapReport> {
        let mut reports = Vec::new();
        for i in 0..lanes.len() {
            for j in (i + 1)..lanes.len() {
                let a = &lanes[i];
                let b = &lanes[j];
                let a_probes = Self::probe_paths(&a.patterns);
                let b_probes = Self::probe_paths(&b.patterns);
                if Self::lane_matches_any(a, &b_probes) || Self::lane_matches_any(b, &a_probes) {
                    let pattern = format!(
                        "{} <-> {}",
                        a.patterns.join("|"),
                        b.patterns.join("|")
                    );
                    let files = self.concrete_evidence(a, b);
                    reports.push(OverlapReport { lanes: (a.name.clone(), b.name.clone()), pattern, files });
                }
            }
        }
        reports
    }

    /// Enumerate actual repo files matching both lanes' globs, for the
    /// overlap report's concrete evidence (spec §4.2).
    fn concrete_evidence(&self, a: &LaneDef, b: &LaneDef) -> Vec<String> {
        let mut files = Vec::new();
        for pattern in a.patterns.iter().chain(b.patterns.iter()) {
            let full = self.repo_root.join(pattern);
            let Some(full_str) = full.to_str() else { continue };
            let Ok(entries) = glob::glob(full_str) else { continue };
            for entry in entries.flatten() {
                if let Ok(rel) = entry.strip_prefix(self.repo_root) {
                    let rel_str = rel.to_string_lossy().to_string();
                    let matches_a = a.patterns.iter().any(|p| glob::Pattern::new(p).map(|g| g.matches(&rel_str)).unwrap_or(false));
                    let matches_b = b.patterns.iter().any(|p| glob::Pattern::new(p).map(|g| g.matches(&rel_str)).unwrap_or(false));
                    if matches_a && matches_b && !files.contains(&rel_str) {
                        files.push(rel_str);
                    }
                }
            }
        }
        files.sort();
        files
    }
}

#[cfg(test)]
#[path = "overlap_tests.rs"]
mod tests;
