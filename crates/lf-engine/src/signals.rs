// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal inbox (C10, spec §4.4): folds `signals.jsonl` and
//! `signal-receipts.jsonl` into effective read state, and owns the TTL
//! cleanup pass that prunes both logs.
//!
//! Two append-only logs exist instead of one so that two readers marking
//! the same signal read concurrently never race on a single file — each
//! just appends its own receipt, and a signal's effective read state is the
//! union of its inline flag and any receipt referencing its id.

use lf_core::{Clock, LfError, ReadReceipt, Signal, SignalId};
use lf_storage::{ReceiptLog, SignalLog};
use std::path::PathBuf;

/// A signal plus the read state derived from the union rule.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSignal {
    pub signal: Signal,
    pub read: bool,
}

pub struct SignalInbox<C: Clock> {
    signals_path: PathBuf,
    receipts_path: PathBuf,
    clock: C,
}

impl<C: Clock> SignalInbox<C> {
    pub fn new(signals_path: impl Into<PathBuf>, receipts_path: impl Into<PathBuf>, clock: C) -> Self {
        Self { signals_path: signals_path.into(), receipts_path: receipts_path.into(), clock }
    }

    pub fn send(&self, signal: Signal) -> Result<(), LfError> {
        SignalLog::open(&self.signals_path)?.append(&signal)
    }

    /// All signals on disk with their effective read state: inline `read`
    /// flag OR a matching receipt (spec §3/§8's union-of-reads rule).
    pub fn load(&self) -> Result<Vec<EffectiveSignal>, LfError> {
        let signals = SignalLog::open(&self.signals_path)?.read_all()?;
        let receipted = ReceiptLog::open(&self.receipts_path)?.read_ids()?;
        Ok(signals
            .into_iter()
            .map(|signal| {
                let read = signal.is_read_inline() || receipted.contains(&signal.id);
                EffectiveSignal { signal, read }
            })
            .collect())
    }

    pub fn unread(&self) -> Result<Vec<EffectiveSignal>, LfError> {
        Ok(self.load()?.into_iter().filter(|s| !s.read).collect())
    }

    /// Append one receipt per id not already receipted. Idempotent: calling
    /// this twice with the same ids marks nothing the second time (spec §8).
    pub fn mark_read(&self, ids: &[SignalId], reader: &str) -> Result<usize, LfError> {
        let mut receipts = ReceiptLog::open(&self.receipts_path)?;
        let already = receipts.read_ids()?;
        let mut marked = 0;
        for id in ids {
            if already.contains(id) {
                continue;
            }
            receipts.append(&ReadReceipt { signal_id: *id, reader: reader.to_string(), read_at: self.clock.now_iso8601() })?;
            marked += 1;
        }
        Ok(marked)
    }

    /// Rewrite both logs, dropping signals past their class's TTL and any
    /// receipt whose signal no longer exists. The only legitimate rewrite of
    /// these otherwise append-only logs (spec §4.4).
    pub fn cleanup(&self, unread_ttl_secs: u64, read_ttl_secs: u64) -> Result<usize, LfError> {
        let now_ms = self.clock.epoch_ms();
        let effective = self.load()?;
        let mut kept = Vec::new();
        let mut pruned = 0;
        for item in effective {
            let ttl_secs = if item.read { read_ttl_secs } else { unread_ttl_secs };
            let sent_ms = parse_iso8601_ms(&item.signal.sent_at).unwrap_or(now_ms);
            let age_secs = now_ms.saturating_sub(sent_ms) / 1000;
            if age_secs > ttl_secs {
                pruned += 1;
            } else {
                kept.push(item.signal);
            }
        }
        rewrite_signals(&self.signals_path, &kept)?;

        let surviving: std::collections::HashSet<SignalId> = kept.iter().map(|s| s.id).collect();
        let receipts = ReceiptLog::open(&self.receipts_path)?.read_all()?;
        let kept_receipts: Vec<ReadReceipt> = receipts.into_iter().filter(|r| surviving.contains(&r.signal_id)).collect();
        rewrite_receipts(&self.receipts_path, &kept_receipts)?;

        Ok(pruned)
    }
}

fn rewrite_signals(path: &std::path::Path, signals: &[Signal]) -> Result<(), LfError> {
    let mut body = String::new();
    for signal in signals {
        let line = serde_json::to_string(signal)
            .map_err(|e| LfError::SignalUnavailable { path: path.to_path_buf(), reason: e.to_string() })?;
        body.push_str(&line);
        body.push('\n');
    }
    std::fs::write(path, body).map_err(|e| LfError::io(path, e))
}

fn rewrite_receipts(path: &std::path::Path, receipts: &[ReadReceipt]) -> Result<(), LfError> {
    let mut body = String::new();
    for receipt in receipts {
        let line = serde_json::to_string(receipt)
            .map_err(|e| LfError::SignalUnavailable { path: path.to_path_buf(), reason: e.to_string() })?;
        body.push_str(&line);
        body.push('\n');
    }
    std::fs::write(path, body).map_err(|e| LfError::io(path, e))
}

/// Best-effort ISO-8601 millisecond parse; cleanup treats an unparseable
/// timestamp as "sent now" rather than failing the whole pass.
fn parse_iso8601_ms(s: &str) -> Option<u64> {
    chrono::DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.timestamp_millis().max(0) as u64)
}

#[cfg(test)]
#[path = "signals_tests.rs"]
mod tests;
