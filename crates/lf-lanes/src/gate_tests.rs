// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::LaneDef;
use std::fs;
use tempfile::tempdir;

#[test]
fn strict_mode_passes_when_nothing_is_found() {
    let dir = tempdir().unwrap();
    let lanes = vec![LaneDef::new("a", vec!["src/**".to_string()])];
    let report = LaneHealthGateReport::evaluate(&lanes, dir.path(), LaneHealthMode::Strict).unwrap();
    assert!(!report.has_findings());
}

#[test]
fn strict_mode_fails_on_overlapping_lanes() {
    let dir = tempdir().unwrap();
    let lanes = vec![
        LaneDef::new("a", vec!["src/**".to_string()]),
        LaneDef::new("b", vec!["src/api/**".to_string()]),
    ];
    let err = LaneHealthGateReport::evaluate(&lanes, dir.path(), LaneHealthMode::Strict).unwrap_err();
    assert!(matches!(err, LfError::LaneHealthGateFailed { .. }));
}

#[test]
fn strict_mode_fails_on_an_uncovered_file() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/helper.rs"), "").unwrap();
    let lanes = vec![LaneDef::new("a", vec!["src/**".to_string()])];
    let err = LaneHealthGateReport::evaluate(&lanes, dir.path(), LaneHealthMode::Strict).unwrap_err();
    assert!(matches!(err, LfError::LaneHealthGateFailed { .. }));
}

#[test]
fn advisory_mode_never_fails_but_still_reports_findings() {
    let dir = tempdir().unwrap();
    let lanes = vec![
        LaneDef::new("a", vec!["src/**".to_string()]),
        LaneDef::new("b", vec!["src/api/**".to_string()]),
    ];
    let report = LaneHealthGateReport::evaluate(&lanes, dir.path(), LaneHealthMode::Advisory).unwrap();
    assert!(report.has_findings());
    assert_eq!(report.overlaps.len(), 1);
}
