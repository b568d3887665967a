// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw storage for the signal bus (C10): `signals.jsonl` and its companion
//! `signal-receipts.jsonl`. Both are append-only; the union-of-reads logic
//! that derives effective read state lives one layer up in
//! `lf-engine::signals`, which is the only consumer that needs to combine
//! the two logs.

use lf_core::{LfError, ReadReceipt, Signal, SignalId};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct SignalLog {
    path: PathBuf,
    file: File,
}

impl SignalLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LfError> {
        let path = path.into();
        OpenOptions::new().read(true).create(true).write(true).open(&path).map_err(|e| LfError::io(&path, e))?;
        let file = OpenOptions::new().append(true).open(&path).map_err(|e| LfError::io(&path, e))?;
        Ok(Self { path, file })
    }

    pub fn append(&mut self, signal: &Signal) -> Result<(), LfError> {
        let line = serde_json::to_string(signal)
            .map_err(|e| LfError::SignalUnavailable { path: self.path.clone(), reason: e.to_string() })?;
        writeln!(self.file, "{line}").map_err(|e| LfError::io(&self.path, e))
    }

    /// All signals currently on disk, in append order. Malformed lines are
    /// skipped (the signal bus has no "unknown variant" fallback the way
    /// the event log does — a signal either parses or it doesn't).
    pub fn read_all(&self) -> Result<Vec<Signal>, LfError> {
        let reader = BufReader::new(File::open(&self.path).map_err(|e| LfError::io(&self.path, e))?);
        let mut out = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| LfError::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(signal) = serde_json::from_str::<Signal>(&line) {
                out.push(signal);
            }
        }
        Ok(out)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub struct ReceiptLog {
    path: PathBuf,
    file: File,
}

impl ReceiptLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LfError> {
        let path = path.into();
        OpenOptions::new().read(true).create(true).write(true).open(&path).map_err(|e| LfError::io(&path, e))?;
        let file = OpenOptions::new().append(true).open(&path).map_err(|e| LfError::io(&path, e))?;
        Ok(Self { path, file })
    }

    pub fn append(&mut self, receipt: &ReadReceipt) -> Result<(), LfError> {
        let line = serde_json::to_string(receipt)
            .map_err(|e| LfError::SignalUnavailable { path: self.path.clone(), reason: e.to_string() })?;
        writeln!(self.file, "{line}").map_err(|e| LfError::io(&self.path, e))
    }

    pub fn read_all(&self) -> Result<Vec<ReadReceipt>, LfError> {
        let reader = BufReader::new(File::open(&self.path).map_err(|e| LfError::io(&self.path, e))?);
        let mut out = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| LfError::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(receipt) = serde_json::from_str::<ReadReceipt>(&line) {
                out.push(receipt);
            }
        }
        Ok(out)
    }

    /// Ids that already have a receipt on disk.
    pub fn read_ids(&self) -> Result<std::collections::HashSet<SignalId>, LfError> {
        Ok(self.read_all()?.into_iter().map(|r| r.signal_id).collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "signal_log_tests.rs"]
mod tests;
