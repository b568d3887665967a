// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::WuId;
use tempfile::tempdir;

#[test]
fn create_then_parse_round_trips() {
    let dir = tempdir().unwrap();
    let store = StampStore::new(dir.path());
    let outcome = store.create(WuId::new(42), "Hello", "2026-02-15").unwrap();
    assert_eq!(outcome, CreateOutcome::Created);

    let report = store.validate(WuId::new(42));
    assert!(report.valid);
    assert!(report.errors.is_empty());

    let content = store.parse_content(WuId::new(42)).unwrap();
    assert_eq!(content.wu_id, WuId::new(42));
    assert_eq!(content.title, "Hello");
    assert_eq!(content.completed_date, "2026-02-15");
}

#[test]
fn create_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = StampStore::new(dir.path());
    assert_eq!(store.create(WuId::new(1), "a", "2026-01-01").unwrap(), CreateOutcome::Created);
    assert_eq!(store.create(WuId::new(1), "b", "2026-01-02").unwrap(), CreateOutcome::AlreadyExists);
    let content = store.parse_content(WuId::new(1)).unwrap();
    assert_eq!(content.title, "a");
}

#[test]
fn empty_file_fails_with_empty_file_error() {
    let dir = tempdir().unwrap();
    let store = StampStore::new(dir.path());
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(dir.path().join("WU-5.done"), "").unwrap();
    let report = store.validate(WuId::new(5));
    assert!(!report.valid);
    assert_eq!(report.errors, vec![StampError::EmptyFile]);
}

#[test]
fn missing_completed_line_is_reported() {
    let dir = tempdir().unwrap();
    let store = StampStore::new(dir.path());
    std::fs::write(dir.path().join("WU-5.done"), "WU WU-5 — title\n").unwrap();
    let report = store.validate(WuId::new(5));
    assert_eq!(report.errors, vec![StampError::MissingCompletedLine]);
}

#[test]
fn invalid_date_format_is_reported() {
    let dir = tempdir().unwrap();
    let store = StampStore::new(dir.path());
    std::fs::write(dir.path().join("WU-5.done"), "WU WU-5 — title\nCompleted: Feb 15 2026\n").unwrap();
    let report = store.validate(WuId::new(5));
    assert_eq!(report.errors, vec![StampError::InvalidDateFormat]);
}

#[test]
fn wu_id_mismatch_when_file_and_requested_id_disagree() {
    let dir = tempdir().unwrap();
    let store = StampStore::new(dir.path());
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(dir.path().join("WU-5.done"), "WU WU-9 — title\nCompleted: 2026-02-15\n").unwrap();
    let err = store.parse_content(WuId::new(5)).unwrap_err();
    assert_eq!(err, StampError::WuIdMismatch);
}

#[test]
fn remove_then_exists_reflects_deletion() {
    let dir = tempdir().unwrap();
    let store = StampStore::new(dir.path());
    store.create(WuId::new(1), "a", "2026-01-01").unwrap();
    assert!(store.exists(WuId::new(1)));
    store.remove(WuId::new(1)).unwrap();
    assert!(!store.exists(WuId::new(1)));
}

#[test]
fn remove_missing_stamp_is_not_an_error() {
    let dir = tempdir().unwrap();
    let store = StampStore::new(dir.path());
    store.remove(WuId::new(999)).unwrap();
}
