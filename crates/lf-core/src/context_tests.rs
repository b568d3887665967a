// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::pid::FakePidProbe;

#[test]
fn resolve_joins_against_repo_root() {
    let ctx = ExecContext::new("/repo", FakeClock::new(), Arc::new(FakePidProbe::new()));
    assert_eq!(ctx.resolve("wus/WU-1.yaml"), PathBuf::from("/repo/wus/WU-1.yaml"));
}

#[test]
fn repo_root_returns_configured_path() {
    let ctx = ExecContext::system("/workspace");
    assert_eq!(ctx.repo_root(), Path::new("/workspace"));
}

#[test]
fn pid_probe_is_reachable_through_context() {
    let probe = Arc::new(FakePidProbe::new());
    probe.kill(99);
    let ctx = ExecContext::new("/repo", FakeClock::new(), probe);
    assert!(!ctx.pid_probe().is_alive(99));
}
