// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures, gated behind `test-support` so downstream crates
//! can depend on `lf-core` with `features = ["test-support"]` in their own
//! dev-dependencies rather than re-deriving fake clocks and PID probes.

use crate::clock::FakeClock;
use crate::context::ExecContext;
use crate::pid::FakePidProbe;
use std::sync::Arc;

/// A fully-faked [`ExecContext`] rooted at `repo_root`, with an independently
/// controllable clock and PID probe.
pub fn fake_context(repo_root: impl Into<std::path::PathBuf>) -> ExecContext<FakeClock, FakePidProbe> {
    ExecContext::new(repo_root, FakeClock::new(), Arc::new(FakePidProbe::new()))
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
