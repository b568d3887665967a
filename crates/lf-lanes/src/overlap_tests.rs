// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::LaneDef;
use std::fs;
use tempfile::tempdir;

#[test]
fn detects_overlap_between_nested_globs() {
    let dir = tempdir().unwrap();
    let lanes = vec![
        LaneDef::new("a", vec!["src/**".to_string()]),
        LaneDef::new("b", vec!["src/api/**".to_string()]),
    ];
    let analyser = OverlapAnalyser::new(dir.path());
    let reports = analyser.analyse(&lanes);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].lanes, ("a".to_string(), "b".to_string()));
}

#[test]
fn disjoint_lanes_report_no_overlap() {
    let dir = tempdir().unwrap();
    let lanes = vec![
        LaneDef::new("frontend", vec!["web/**".to_string()]),
        LaneDef::new("backend", vec!["server/**".to_string()]),
    ];
    let analyser = OverlapAnalyser::new(dir.path());
    assert!(analyser.analyse(&lanes).is_empty());
}

#[test]
fn overlap_evidence_lists_concrete_files_matching_both_lanes() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/api")).unwrap();
    fs::write(dir.path().join("src/api/handler.rs"), "").unwrap();
    fs::write(dir.path().join("src/lib.rs"), "").unwrap();

    let lanes = vec![
        LaneDef::new("a", vec!["src/**/*.rs".to_string()]),
        LaneDef::new("b", vec!["src/api/**/*.rs".to_string()]),
    ];
    let analyser = OverlapAnalyser::new(dir.path());
    let reports = analyser.analyse(&lanes);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].files.iter().any(|f| f.contains("handler.rs")));
}
