// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion stamps: proof artefacts written under `<stampsDir>/WU-<n>.done`
//! when a WU transitions to `done` (spec §3, §6).
//!
//! Format:
//! ```text
//! WU WU-<n> — <title>
//! Completed: YYYY-MM-DD
//! ```
//! with a trailing newline.

use lf_core::{LfError, WuId};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a stamp file failed to validate, per spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampError {
    EmptyFile,
    MissingWuLine,
    MissingCompletedLine,
    InvalidDateFormat,
    WuIdMismatch,
}

impl fmt::Display for StampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            StampError::EmptyFile => "EMPTY_FILE",
            StampError::MissingWuLine => "MISSING_WU_LINE",
            StampError::MissingCompletedLine => "MISSING_COMPLETED_LINE",
            StampError::InvalidDateFormat => "INVALID_DATE_FORMAT",
            StampError::WuIdMismatch => "WU_ID_MISMATCH",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for StampError {}

/// The parsed content of a valid stamp file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampContent {
    pub wu_id: WuId,
    pub title: String,
    pub completed_date: String,
}

/// Result of [`StampStore::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<StampError>,
}

/// Why `create` did (or didn't) write a new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

pub struct StampStore {
    stamps_dir: PathBuf,
}

impl StampStore {
    pub fn new(stamps_dir: impl Into<PathBuf>) -> Self {
        Self { stamps_dir: stamps_dir.into() }
    }

    fn path_for(&self, id: WuId) -> PathBuf {
        self.stamps_dir.join(format!("{id}.done"))
    }

    /// Write the stamp for `id`/`title` at `date` (`YYYY-MM-DD`).
    ///
    /// Idempotent: a second call with an existing stamp reports
    /// `AlreadyExists` and never touches the file (spec §8 round-trip
    /// property), regardless of whether the requested title/date differ
    /// from what's on disk — the first write wins.
    pub fn create(&self, id: WuId, title: &str, date: &str) -> Result<CreateOutcome, LfError> {
        let path = self.path_for(id);
        if path.exists() {
            return Ok(CreateOutcome::AlreadyExists);
        }
        fs::create_dir_all(&self.stamps_dir).map_err(|e| LfError::io(&self.stamps_dir, e))?;
        let body = format!("WU {id} — {title}\nCompleted: {date}\n");
        fs::write(&path, body).map_err(|e| LfError::io(&path, e))?;
        Ok(CreateOutcome::Created)
    }

    pub fn exists(&self, id: WuId) -> bool {
        self.path_for(id).exists()
    }

    pub fn remove(&self, id: WuId) -> Result<(), LfError> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LfError::io(&path, e)),
        }
    }

    /// Validate the on-disk stamp for `id` against the expected format,
    /// without checking its content matches any particular title.
    pub fn validate_format(&self, id: WuId) -> Result<(), StampError> {
        let path = self.path_for(id);
        let contents = fs::read_to_string(&path).unwrap_or_default();
        parse(&contents).map(|_| ())
    }

    /// The `{valid, errors}` shape spec §8's stamp round-trip scenario checks.
    pub fn validate(&self, id: WuId) -> ValidationReport {
        match self.validate_format(id) {
            Ok(()) => ValidationReport { valid: true, errors: Vec::new() },
            Err(e) => ValidationReport { valid: false, errors: vec![e] },
        }
    }

    /// Parse the stamp for `id` and confirm its `WU-<n>` line matches `id`.
    pub fn parse_content(&self, id: WuId) -> Result<StampContent, StampError> {
        let path = self.path_for(id);
        let contents = fs::read_to_string(&path).map_err(|_| StampError::EmptyFile)?;
        let content = parse(&contents)?;
        if content.wu_id != id {
            return Err(StampError::WuIdMismatch);
        }
        Ok(content)
    }

    pub fn stamps_dir(&self) -> &Path {
        &self.stamps_dir
    }
}

/// Parse raw stamp file content into its two fields, independent of which
/// WU id the caller expected.
fn parse(contents: &str) -> Result<StampContent, StampError> {
    if contents.trim().is_empty() {
        return Err(StampError::EmptyFile);
    }
    let mut lines = contents.lines();
    let wu_line = lines.next().ok_or(StampError::MissingWuLine)?;
    let completed_line = lines.next().ok_or(StampError::MissingCompletedLine)?;

    let rest = wu_line.strip_prefix("WU ").ok_or(StampError::MissingWuLine)?;
    let (wu_id_str, title) = rest.split_once(" — ").ok_or(StampError::MissingWuLine)?;
    let wu_id: WuId = wu_id_str.parse().map_err(|_| StampError::MissingWuLine)?;

    let date = completed_line.strip_prefix("Completed: ").ok_or(StampError::MissingCompletedLine)?;
    if !is_iso_date(date) {
        return Err(StampError::InvalidDateFormat);
    }

    Ok(StampContent { wu_id, title: title.to_string(), completed_date: date.to_string() })
}

fn is_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return false;
    }
    let digit = |i: usize| bytes[i].is_ascii_digit();
    bytes[4] == b'-' && bytes[7] == b'-' && (0..4).all(digit) && (5..7).all(digit) && (8..10).all(digit)
}

#[cfg(test)]
#[path = "stamps_tests.rs"]
mod tests;
