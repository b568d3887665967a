// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialised views (C2): pure, byte-deterministic renderings of the WU
//! record set, regenerated whenever a WU record changes rather than
//! incrementally patched.

use lf_core::{WuRecord, WuStatus};
use std::fmt::Write as _;

/// Render the backlog view: every WU grouped by lane, ready-first within
/// each lane, in ascending id order. Pure function of the record set —
/// callers own writing the result to disk.
pub fn render_backlog(records: &[WuRecord]) -> String {
    let mut by_lane: std::collections::BTreeMap<&str, Vec<&WuRecord>> = std::collections::BTreeMap::new();
    for record in records {
        by_lane.entry(record.lane.as_str()).or_default().push(record);
    }
    let mut out = String::new();
    let _ = writeln!(out, "# Backlog");
    for (lane, mut wus) in by_lane {
        wus.sort_by_key(|w| (status_rank(w.status), w.id));
        let _ = writeln!(out);
        let _ = writeln!(out, "## {lane}");
        for wu in wus {
            let _ = writeln!(out, "- [{}] {} — {}", status_marker(wu.status), wu.id, wu.title);
        }
    }
    out
}

/// Render the status view: a flat table of every WU's current state.
pub fn render_status(records: &[WuRecord]) -> String {
    let mut sorted: Vec<&WuRecord> = records.iter().collect();
    sorted.sort_by_key(|w| w.id);
    let mut out = String::new();
    let _ = writeln!(out, "# Status");
    let _ = writeln!(out);
    let _ = writeln!(out, "| WU | Lane | Status | Assigned |");
    let _ = writeln!(out, "|---|---|---|---|");
    for wu in sorted {
        let assigned = wu.assigned_to.as_deref().unwrap_or("-");
        let _ = writeln!(out, "| {} | {} | {} | {} |", wu.id, wu.lane, wu.status, assigned);
    }
    out
}

fn status_rank(status: WuStatus) -> u8 {
    match status {
        WuStatus::Ready => 0,
        WuStatus::InProgress => 1,
        WuStatus::Blocked => 2,
        WuStatus::Done => 3,
    }
}

fn status_marker(status: WuStatus) -> &'static str {
    match status {
        WuStatus::Ready => " ",
        WuStatus::InProgress => "~",
        WuStatus::Blocked => "!",
        WuStatus::Done => "x",
    }
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
