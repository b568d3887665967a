// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LockManager`: exclusive-create lane lock files with PID/timestamp
//! zombie detection (spec §4.2, §8: "dead PID always wins over timestamp").

use lf_core::{Clock, LfError, PidProbe};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default staleness threshold (spec §4.2): 24 hours.
pub const DEFAULT_STALENESS_THRESHOLD_MS: u64 = 24 * 60 * 60 * 1000;

/// Contents of a `<lane>.lock` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockRecord {
    pub wu_id: String,
    pub lane: String,
    pub pid: i32,
    pub timestamp_ms: u64,
}

/// Why a lock is considered abandoned. Both predicates are computed
/// independently and OR together; a dead PID always wins over a fresh
/// timestamp (spec §8's boundary case: a dead PID is a zombie regardless
/// of how recent its timestamp is).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZombieReason {
    DeadPid,
    Stale,
}

/// Manages `<locks>/<lane>.lock` files for one workspace.
pub struct LockManager<C: Clock, P: PidProbe> {
    locks_dir: PathBuf,
    staleness_threshold_ms: u64,
    clock: C,
    pid_probe: P,
}

impl<C: Clock, P: PidProbe> LockManager<C, P> {
    pub fn new(locks_dir: impl Into<PathBuf>, clock: C, pid_probe: P) -> Self {
        Self { locks_dir: locks_dir.into(), staleness_threshold_ms: DEFAULT_STALENESS_THRESHOLD_MS, clock, pid_probe }
    }

    pub fn with_staleness_threshold_ms(mut self, ms: u64) -> Self {
        self.staleness_threshold_ms = ms;
        self
    }

    fn lock_path(&self, lane: &str) -> PathBuf {
        self.locks_dir.join(format!("{lane}.lock"))
    }

    /// Acquire the lane lock for `wu_id`, failing if one already exists
    /// (live or zombie — callers must `release`/reclaim explicitly first).
    pub fn acquire(&self, lane: &str, wu_id: &str, pid: i32) -> Result<(), LfError> {
        std::fs::create_dir_all(&self.locks_dir).map_err(|e| LfError::io(&self.locks_dir, e))?;
        let path = self.lock_path(lane);
        let record = LockRecord { wu_id: wu_id.to_string(), lane: lane.to_string(), pid, timestamp_ms: self.clock.epoch_ms() };
        let contents =
            serde_json::to_string(&record).map_err(|e| LfError::LockError { lane: lane.to_string(), reason: e.to_string() })?;
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                LfError::LockError { lane: lane.to_string(), reason: "lane is already locked".into() }
            } else {
                LfError::io(&path, e)
            }
        })?;
        file.write_all(contents.as_bytes()).map_err(|e| LfError::io(&path, e))?;
        Ok(())
    }

    /// Release the lane lock. Removing an already-missing lock is a no-op
    /// success, not an error (matches spec §8's "release happens on normal
    /// completion *and* on unexpected termination" — a crashed process may
    /// have never written one).
    pub fn release(&self, lane: &str) -> Result<(), LfError> {
        let path = self.lock_path(lane);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LfError::io(&path, e)),
        }
    }

    pub fn read(&self, lane: &str) -> Result<Option<LockRecord>, LfError> {
        let path = self.lock_path(lane);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let record: LockRecord = serde_json::from_str(&contents)
                    .map_err(|e| LfError::LockError { lane: lane.to_string(), reason: format!("malformed lock file: {e}") })?;
                Ok(Some(record))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LfError::io(&path, e)),
        }
    }

    /// Whether `lane`'s lock (if any) is a zombie, and why.
    pub fn zombie_status(&self, lane: &str) -> Result<Option<Option<ZombieReason>>, LfError> {
        let Some(record) = self.read(lane)? else {
            return Ok(None);
        };
        if !self.pid_probe.is_alive(record.pid) {
            return Ok(Some(Some(ZombieReason::DeadPid)));
        }
        let age_ms = self.clock.epoch_ms().saturating_sub(record.timestamp_ms);
        if age_ms > self.staleness_threshold_ms {
            return Ok(Some(Some(ZombieReason::Stale)));
        }
        Ok(Some(None))
    }

    /// List every lane currently holding a lock file, for the monitor's
    /// zombie scan (spec §4.4).
    pub fn list_locked_lanes(&self) -> Result<Vec<String>, LfError> {
        let dir = &self.locks_dir;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut lanes = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| LfError::io(dir, e))? {
            let entry = entry.map_err(|e| LfError::io(dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("lock") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    lanes.push(stem.to_string());
                }
            }
        }
        lanes.sort();
        Ok(lanes)
    }

    pub fn locks_dir(&self) -> &Path {
        &self.locks_dir
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
