// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::WuId;
use tempfile::tempdir;

fn wu_created(n: u64) -> Event {
    Event::WuCreated { wu_id: WuId::new(n), lane: "lane-a".into(), title: "t".into(), at: "2025-02-15T00:00:00Z".into() }
}

#[test]
fn append_returns_incrementing_sequence_numbers() {
    let dir = tempdir().unwrap();
    let mut log = EventLog::open(dir.path().join("events.jsonl"), 0).unwrap();
    assert_eq!(log.append(&wu_created(1)).unwrap(), 1);
    assert_eq!(log.append(&wu_created(2)).unwrap(), 2);
    assert_eq!(log.write_seq(), 2);
}

#[test]
fn reopening_replays_existing_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let mut log = EventLog::open(&path, 0).unwrap();
        log.append(&wu_created(1)).unwrap();
        log.append(&wu_created(2)).unwrap();
        log.flush().unwrap();
    }
    let log = EventLog::open(&path, 0).unwrap();
    assert_eq!(log.write_seq(), 2);
    assert_eq!(log.all()[0].seq, 1);
}

#[test]
fn reopening_with_processed_seq_resumes_watermark() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let mut log = EventLog::open(&path, 0).unwrap();
        log.append(&wu_created(1)).unwrap();
        log.append(&wu_created(2)).unwrap();
        log.flush().unwrap();
    }
    let log = EventLog::open(&path, 1).unwrap();
    assert_eq!(log.processed_seq(), 1);
    let next = log.next_unprocessed().unwrap();
    assert_eq!(next.seq, 2);
}

#[test]
fn mark_processed_advances_watermark_and_never_regresses() {
    let dir = tempdir().unwrap();
    let mut log = EventLog::open(dir.path().join("events.jsonl"), 0).unwrap();
    log.append(&wu_created(1)).unwrap();
    log.mark_processed(1);
    assert_eq!(log.processed_seq(), 1);
    log.mark_processed(0);
    assert_eq!(log.processed_seq(), 1);
}

#[test]
fn malformed_line_is_preserved_as_unknown_with_raw_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    std::fs::write(&path, "not json at all\n").unwrap();
    let log = EventLog::open(&path, 0).unwrap();
    assert_eq!(log.all().len(), 1);
    assert_eq!(log.all()[0].event, Event::Unknown);
    assert_eq!(log.all()[0].raw.as_deref(), Some("not json at all"));
}

#[test]
fn blank_lines_are_skipped_without_consuming_a_sequence_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let line = serde_json::to_string(&wu_created(1)).unwrap();
    std::fs::write(&path, format!("{line}\n\n")).unwrap();
    let log = EventLog::open(&path, 0).unwrap();
    assert_eq!(log.write_seq(), 1);
}
