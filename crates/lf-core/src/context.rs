// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution context threaded through every `lf-*` operation.
//!
//! Bundling the repo root, clock, and PID probe behind one struct keeps
//! call signatures short and gives tests a single seam to swap in fakes,
//! mirroring the teacher's habit of passing a context handle rather than
//! individual collaborators.

use crate::clock::{Clock, SystemClock};
use crate::pid::{PidProbe, SystemPidProbe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything an operation needs to touch the filesystem, read the clock,
/// and probe processes, without depending on global state.
pub struct ExecContext<C: Clock = SystemClock, P: PidProbe + ?Sized = SystemPidProbe> {
    repo_root: PathBuf,
    clock: C,
    pid_probe: Arc<P>,
}

impl<C: Clock, P: PidProbe + ?Sized> Clone for ExecContext<C, P> {
    fn clone(&self) -> Self {
        Self {
            repo_root: self.repo_root.clone(),
            clock: self.clock.clone(),
            pid_probe: Arc::clone(&self.pid_probe),
        }
    }
}

impl ExecContext<SystemClock, SystemPidProbe> {
    /// The real context: system clock, real PID probe, given repo root.
    pub fn system(repo_root: impl Into<PathBuf>) -> Self {
        Self { repo_root: repo_root.into(), clock: SystemClock, pid_probe: Arc::new(SystemPidProbe) }
    }
}

impl<C: Clock, P: PidProbe + ?Sized> ExecContext<C, P> {
    pub fn new(repo_root: impl Into<PathBuf>, clock: C, pid_probe: Arc<P>) -> Self {
        Self { repo_root: repo_root.into(), clock, pid_probe }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn pid_probe(&self) -> &P {
        &self.pid_probe
    }

    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.repo_root.join(relative)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
