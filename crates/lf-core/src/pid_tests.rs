// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_probe_defaults_to_alive() {
    let probe = FakePidProbe::new();
    assert!(probe.is_alive(1234));
}

#[test]
fn fake_probe_reports_dead_after_kill() {
    let probe = FakePidProbe::new();
    probe.kill(1234);
    assert!(!probe.is_alive(1234));
    assert!(probe.is_alive(5678));
}

#[test]
fn system_probe_considers_own_process_alive() {
    let probe = SystemPidProbe;
    let pid = std::process::id() as i32;
    assert!(probe.is_alive(pid));
}
