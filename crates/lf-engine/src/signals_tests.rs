// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::{FakeClock, SignalId};
use tempfile::tempdir;

fn inbox(dir: &std::path::Path) -> SignalInbox<FakeClock> {
    SignalInbox::new(dir.join("signals.jsonl"), dir.join("signal-receipts.jsonl"), FakeClock::new())
}

#[test]
fn unread_signal_has_effective_read_false_until_receipted() {
    let dir = tempdir().unwrap();
    let inbox = inbox(dir.path());
    inbox.send(Signal::new(SignalId::new(1), "a", vec!["b".to_string()], "hi", "body", "2025-02-15T00:00:00Z")).unwrap();

    let loaded = inbox.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(!loaded[0].read);
}

#[test]
fn marking_read_is_reflected_by_union_of_reads_without_mutating_the_signal() {
    let dir = tempdir().unwrap();
    let inbox = inbox(dir.path());
    inbox.send(Signal::new(SignalId::new(1), "a", vec!["b".to_string()], "hi", "body", "2025-02-15T00:00:00Z")).unwrap();

    let marked = inbox.mark_read(&[SignalId::new(1)], "b").unwrap();
    assert_eq!(marked, 1);

    let loaded = inbox.load().unwrap();
    assert!(loaded[0].read);
    assert!(!loaded[0].signal.read, "the inline flag itself is never rewritten by mark_read");
}

#[test]
fn marking_read_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    let inbox = inbox(dir.path());
    inbox.send(Signal::new(SignalId::new(1), "a", vec!["b".to_string()], "hi", "body", "2025-02-15T00:00:00Z")).unwrap();

    assert_eq!(inbox.mark_read(&[SignalId::new(1)], "b").unwrap(), 1);
    assert_eq!(inbox.mark_read(&[SignalId::new(1)], "b").unwrap(), 0);
}

#[test]
fn inline_read_flag_alone_also_counts_as_effectively_read() {
    let dir = tempdir().unwrap();
    let inbox = inbox(dir.path());
    let mut signal = Signal::new(SignalId::new(2), "a", vec!["b".to_string()], "hi", "body", "2025-02-15T00:00:00Z");
    signal.read = true;
    inbox.send(signal).unwrap();

    let loaded = inbox.load().unwrap();
    assert!(loaded[0].read);
}

#[test]
fn unread_list_excludes_receipted_signals() {
    let dir = tempdir().unwrap();
    let inbox = inbox(dir.path());
    inbox.send(Signal::new(SignalId::new(1), "a", vec!["b".to_string()], "one", "body", "2025-02-15T00:00:00Z")).unwrap();
    inbox.send(Signal::new(SignalId::new(2), "a", vec!["b".to_string()], "two", "body", "2025-02-15T00:00:00Z")).unwrap();
    inbox.mark_read(&[SignalId::new(1)], "b").unwrap();

    let unread = inbox.unread().unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].signal.id, SignalId::new(2));
}

#[test]
fn cleanup_prunes_signals_past_ttl_and_their_orphaned_receipts() {
    let dir = tempdir().unwrap();
    let clock = FakeClock::new();
    let inbox = SignalInbox::new(dir.path().join("signals.jsonl"), dir.path().join("signal-receipts.jsonl"), clock.clone());

    let old_ts = clock.now_iso8601();
    inbox.send(Signal::new(SignalId::new(1), "a", vec!["b".to_string()], "old", "body", old_ts)).unwrap();
    inbox.mark_read(&[SignalId::new(1)], "b").unwrap();

    clock.advance(std::time::Duration::from_secs(8 * 24 * 60 * 60));
    let fresh_ts = clock.now_iso8601();
    inbox.send(Signal::new(SignalId::new(2), "a", vec!["b".to_string()], "fresh", "body", fresh_ts)).unwrap();

    // Read-class TTL of 7 days: the 8-day-old receipted signal is pruned, the fresh one survives.
    let pruned = inbox.cleanup(30 * 24 * 60 * 60, 7 * 24 * 60 * 60).unwrap();
    assert_eq!(pruned, 1);

    let remaining = inbox.load().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].signal.id, SignalId::new(2));

    let receipts = lf_storage::ReceiptLog::open(dir.path().join("signal-receipts.jsonl")).unwrap().read_all().unwrap();
    assert!(receipts.is_empty(), "the pruned signal's receipt must be pruned too");
}
