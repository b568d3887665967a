// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn wu_id_round_trips_through_display_and_parse() {
    let id = WuId::new(42);
    assert_eq!(id.to_string(), "WU-42");
    assert_eq!("WU-42".parse::<WuId>().unwrap(), id);
}

#[test]
fn wu_id_rejects_missing_prefix() {
    assert!("42".parse::<WuId>().is_err());
}

#[test]
fn wu_id_rejects_non_numeric_suffix() {
    assert!("WU-abc".parse::<WuId>().is_err());
}

#[test]
fn wu_id_serializes_as_display_string() {
    let id = WuId::new(7);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"WU-7\"");
    let back: WuId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn wu_status_display_matches_serde_rename() {
    assert_eq!(WuStatus::InProgress.to_string(), "in_progress");
}

#[test]
fn new_record_defaults_to_ready_with_no_claim_fields() {
    let rec = WuRecord::new(WuId::new(1), "lane-a", "do the thing");
    assert_eq!(rec.status, WuStatus::Ready);
    assert!(rec.assigned_to.is_none());
    assert!(rec.validate_in_progress_invariant().is_ok());
}

#[test]
fn in_progress_without_claim_fields_is_rejected() {
    let mut rec = WuRecord::new(WuId::new(2), "lane-a", "do the thing");
    rec.status = WuStatus::InProgress;
    let err = rec.validate_in_progress_invariant().unwrap_err();
    assert!(matches!(err, LfError::TransactionError { .. }));
}

#[test]
fn in_progress_with_worktree_path_satisfies_invariant() {
    let mut rec = WuRecord::new(WuId::new(3), "lane-a", "do the thing");
    rec.status = WuStatus::InProgress;
    rec.assigned_to = Some("agent@example.com".to_string());
    rec.claimed_at = Some("2025-02-15T00:00:00Z".to_string());
    rec.claimed_mode = Some(ClaimedMode::Worktree);
    rec.baseline_main_sha = Some("abc123".to_string());
    rec.worktree_path = Some(PathBuf::from("/tmp/wt/WU-3"));
    assert!(rec.validate_in_progress_invariant().is_ok());
}

#[test]
fn in_progress_with_neither_worktree_nor_branch_is_rejected() {
    let mut rec = WuRecord::new(WuId::new(4), "lane-a", "do the thing");
    rec.status = WuStatus::InProgress;
    rec.assigned_to = Some("agent@example.com".to_string());
    rec.claimed_at = Some("2025-02-15T00:00:00Z".to_string());
    rec.claimed_mode = Some(ClaimedMode::BranchPr);
    rec.baseline_main_sha = Some("abc123".to_string());
    let err = rec.validate_in_progress_invariant().unwrap_err();
    assert!(matches!(err, LfError::TransactionError { .. }));
}

#[test]
fn builder_produces_ready_wu_by_default() {
    let rec = WuRecord::builder().lane("payments").title("fix the thing").build();
    assert_eq!(rec.lane, "payments");
    assert_eq!(rec.status, WuStatus::Ready);
    assert_eq!(rec.id, WuId::new(1));
}

#[test]
fn builder_sets_optional_claim_fields() {
    let rec = WuRecord::builder()
        .status(WuStatus::InProgress)
        .assigned_to("agent@example.com")
        .claimed_mode(ClaimedMode::BranchOnly)
        .build();
    assert_eq!(rec.assigned_to.as_deref(), Some("agent@example.com"));
    assert_eq!(rec.claimed_mode, Some(ClaimedMode::BranchOnly));
}
