// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The lane health gate (spec §6's `gates.lane_health_mode`): a single
//! checkpoint that runs the overlap and coverage analysers together and
//! decides, based on configured mode, whether a finding from either one
//! should actually block the caller.

use crate::{CoverageAnalyser, CoverageReport, OverlapAnalyser, OverlapReport};
use lf_core::{LaneDef, LaneHealthMode, LfError};
use std::path::Path;

/// The combined result of one lane health gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneHealthGateReport {
    pub overlaps: Vec<OverlapReport>,
    pub coverage: CoverageReport,
    pub mode: LaneHealthMode,
}

impl LaneHealthGateReport {
    /// Whether either analyser found anything, independent of `mode`.
    pub fn has_findings(&self) -> bool {
        !self.overlaps.is_empty() || !self.coverage.healthy()
    }

    /// Runs both analysers against `lanes`/`repo_root`, then enforces
    /// `mode`: `strict` turns any finding into a hard [`LfError`]; `advisory`
    /// never fails the caller, leaving the findings on the report for the
    /// caller to log or surface.
    pub fn evaluate(lanes: &[LaneDef], repo_root: &Path, mode: LaneHealthMode) -> Result<Self, LfError> {
        let overlaps = OverlapAnalyser::new(repo_root).analyse(lanes);
        let coverage = CoverageAnalyser::new(repo_root).analyse(lanes);
        let report = Self { overlaps, coverage, mode };
        if mode == LaneHealthMode::Strict && report.has_findings() {
            return Err(LfError::LaneHealthGateFailed { reason: report.summary() });
        }
        Ok(report)
    }

    fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.overlaps.is_empty() {
            parts.push(format!("{} lane overlap(s)", self.overlaps.len()));
        }
        if !self.coverage.healthy() {
            parts.push(format!("{} uncovered file(s)", self.coverage.uncovered.len()));
        }
        parts.join(", ")
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
