// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lf_core::{WuId, WuRecordBuilder};

#[test]
fn backlog_groups_by_lane_and_sorts_ready_first() {
    let mut done = WuRecordBuilder::default().lane("payments").title("done thing").status(WuStatus::Done).build();
    done.id = WuId::new(1);
    let mut ready = WuRecordBuilder::default().lane("payments").title("ready thing").build();
    ready.id = WuId::new(2);
    let backlog = render_backlog(&[done, ready]);
    let ready_pos = backlog.find("ready thing").unwrap();
    let done_pos = backlog.find("done thing").unwrap();
    assert!(ready_pos < done_pos);
    assert!(backlog.contains("## payments"));
}

#[test]
fn backlog_rendering_is_deterministic_regardless_of_input_order() {
    let mut a = WuRecordBuilder::default().lane("a").title("alpha").build();
    a.id = WuId::new(1);
    let mut b = WuRecordBuilder::default().lane("b").title("beta").build();
    b.id = WuId::new(2);
    let forward = render_backlog(&[a.clone(), b.clone()]);
    let backward = render_backlog(&[b, a]);
    assert_eq!(forward, backward);
}

#[test]
fn status_table_includes_assigned_agent_when_present() {
    let mut record = WuRecordBuilder::default().lane("payments").title("fix").build();
    record.id = WuId::new(5);
    record.assigned_to = Some("agent@example.com".to_string());
    let status = render_status(&[record]);
    assert!(status.contains("agent@example.com"));
}

#[test]
fn status_table_uses_dash_for_unassigned() {
    let mut record = WuRecordBuilder::default().lane("payments").title("fix").build();
    record.id = WuId::new(6);
    let status = render_status(&[record]);
    assert!(status.contains("| WU-6 | payments | ready | - |"));
}
