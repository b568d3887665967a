// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn wu_created_round_trips_through_json() {
    let ev = Event::WuCreated { wu_id: WuId::new(1), lane: "payments".into(), title: "fix it".into(), at: "2025-02-15T00:00:00Z".into() };
    let json = serde_json::to_string(&ev).unwrap();
    assert!(json.contains("\"type\":\"create\""));
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ev);
}

#[test]
fn unrecognised_type_parses_as_unknown_instead_of_erroring() {
    let json = r#"{"type":"wu:teleported","wu_id":"WU-1"}"#;
    let ev: Event = serde_json::from_str(json).unwrap();
    assert_eq!(ev, Event::Unknown);
}

#[test]
fn wu_id_accessor_covers_per_wu_events() {
    let ev = Event::WuClaimed { wu_id: WuId::new(7), assigned_to: "a".into(), mode: "worktree".into(), at: "t".into() };
    assert_eq!(ev.wu_id(), Some(WuId::new(7)));
}

#[test]
fn wu_id_accessor_is_none_for_signal_events() {
    let ev = Event::SignalSent { id: lf_core::SignalId::new(1), from: "a".into(), to: vec!["b".into()], at: "t".into() };
    assert_eq!(ev.wu_id(), None);
}
