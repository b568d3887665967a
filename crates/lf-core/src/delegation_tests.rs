// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn delegation_id_round_trips() {
    let id = DelegationId::new(9);
    assert_eq!(id.to_string(), "DEL-9");
    assert_eq!("DEL-9".parse::<DelegationId>().unwrap(), id);
}

#[test]
fn new_record_starts_pending_with_attempt_one() {
    let rec = DelegationRecord::new(DelegationId::new(1), WuId::new(3), "lane-a", "2025-02-15T00:00:00Z");
    assert_eq!(rec.status, DelegationStatus::Pending);
    assert_eq!(rec.attempt, 1);
    assert!(rec.completed_at.is_none());
}

#[test]
fn record_serializes_to_jsonl_compatible_json() {
    let rec = DelegationRecord::new(DelegationId::new(2), WuId::new(4), "lane-a", "2025-02-15T00:00:00Z");
    let line = serde_json::to_string(&rec).unwrap();
    assert!(!line.contains('\n'));
    let back: DelegationRecord = serde_json::from_str(&line).unwrap();
    assert_eq!(back, rec);
}

#[test]
fn with_parent_sets_parent_wu_id() {
    let rec = DelegationRecord::new(DelegationId::new(5), WuId::new(10), "lane-b", "2025-02-15T00:00:00Z")
        .with_parent(WuId::new(1));
    assert_eq!(rec.parent_wu_id, Some(WuId::new(1)));
}
