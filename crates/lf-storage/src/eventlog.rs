// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL event log (C1).
//!
//! Mirrors the write-ahead-log shape a durable job runner exposes: callers
//! `append` an event, get back its sequence number, and separately track how
//! far a consumer has `mark_processed`. Re-opening the log replays every
//! line already on disk so `write_seq` always reflects the true append
//! count, even across process restarts.

use crate::event::Event;
use lf_core::LfError;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One entry read back out of the log.
///
/// `event` is [`Event::Unknown`] both for genuinely unrecognised event types
/// and for lines that failed to parse as JSON at all; `raw` carries the
/// original line in the latter case so a caller can still inspect or
/// re-archive it instead of silently dropping it.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub seq: u64,
    pub event: Event,
    pub raw: Option<String>,
}

pub struct EventLog {
    path: PathBuf,
    file: File,
    entries: Vec<Entry>,
    processed_seq: u64,
}

impl EventLog {
    /// Open (creating if absent) the log at `path`, replaying every line
    /// already on disk, and set the consumer's starting processed watermark.
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self, LfError> {
        let path = path.as_ref().to_path_buf();
        let read_file = OpenOptions::new().read(true).create(true).write(true).open(&path).map_err(|e| LfError::io(&path, e))?;
        let reader = BufReader::new(&read_file);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|e| LfError::io(&path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let seq = entries.len() as u64 + 1;
            match serde_json::from_str::<Event>(&line) {
                Ok(event) => entries.push(Entry { seq, event, raw: None }),
                Err(_) => entries.push(Entry { seq, event: Event::Unknown, raw: Some(line) }),
            }
        }
        let file = OpenOptions::new().append(true).open(&path).map_err(|e| LfError::io(&path, e))?;
        Ok(Self { path, file, entries, processed_seq })
    }

    /// Append `event`, returning its 1-based sequence number.
    pub fn append(&mut self, event: &Event) -> Result<u64, LfError> {
        let line = serde_json::to_string(event).map_err(|e| LfError::YamlParseError {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        writeln!(self.file, "{line}").map_err(|e| LfError::io(&self.path, e))?;
        let seq = self.entries.len() as u64 + 1;
        self.entries.push(Entry { seq, event: event.clone(), raw: None });
        Ok(seq)
    }

    pub fn flush(&mut self) -> Result<(), LfError> {
        self.file.flush().map_err(|e| LfError::io(&self.path, e))
    }

    /// The first entry with a sequence number past the processed watermark.
    pub fn next_unprocessed(&self) -> Option<&Entry> {
        self.entries.iter().find(|e| e.seq > self.processed_seq)
    }

    /// All entries past the processed watermark, in order.
    pub fn unprocessed(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.seq > self.processed_seq)
    }

    pub fn all(&self) -> &[Entry] {
        &self.entries
    }

    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = self.processed_seq.max(seq);
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    pub fn write_seq(&self) -> u64 {
        self.entries.len() as u64
    }
}

#[cfg(test)]
#[path = "eventlog_tests.rs"]
mod tests;
