// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID liveness probing, used by lane lock zombie detection (C6).

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Probes whether a process id is still alive.
///
/// The real implementation sends signal 0 via `nix`, which succeeds or fails
/// without actually delivering a signal to the target process.
pub trait PidProbe: Send + Sync {
    fn is_alive(&self, pid: i32) -> bool;
}

/// Real probe backed by `kill(pid, 0)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPidProbe;

impl PidProbe for SystemPidProbe {
    fn is_alive(&self, pid: i32) -> bool {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;
        kill(Pid::from_raw(pid), None).is_ok()
    }
}

/// Fake probe for tests: alive unless explicitly marked dead.
///
/// Shares its dead-set behind an `Arc` (like [`crate::clock::FakeClock`]) so
/// a clone can be handed to the thing under test while the original stays
/// in the test body to call [`FakePidProbe::kill`].
#[derive(Debug, Default, Clone)]
pub struct FakePidProbe {
    dead: Arc<Mutex<HashSet<i32>>>,
}

impl FakePidProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kill(&self, pid: i32) {
        self.dead.lock().insert(pid);
    }
}

impl PidProbe for FakePidProbe {
    fn is_alive(&self, pid: i32) -> bool {
        !self.dead.lock().contains(&pid)
    }
}

#[cfg(test)]
#[path = "pid_tests.rs"]
mod tests;
