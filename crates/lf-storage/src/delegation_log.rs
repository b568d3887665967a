// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only delegation registry (C8): `delegations.jsonl` plus the
//! in-memory fold that reconstructs current delegation state.

use lf_core::{DelegationId, DelegationRecord, DelegationStatus, LfError, WuId};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub struct DelegationLog {
    path: PathBuf,
    file: File,
}

impl DelegationLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LfError> {
        let path = path.into();
        OpenOptions::new().read(true).create(true).write(true).open(&path).map_err(|e| LfError::io(&path, e))?;
        let file = OpenOptions::new().append(true).open(&path).map_err(|e| LfError::io(&path, e))?;
        Ok(Self { path, file })
    }

    pub fn append(&mut self, record: &DelegationRecord) -> Result<(), LfError> {
        let line = serde_json::to_string(record)
            .map_err(|e| LfError::YamlParseError { path: self.path.clone(), reason: e.to_string() })?;
        writeln!(self.file, "{line}").map_err(|e| LfError::io(&self.path, e))
    }

    /// Fold the full log into the latest record per delegation id.
    ///
    /// Later lines for the same id (recorded pickup, completion, failure)
    /// overwrite earlier ones; this is the only state-reconstruction rule.
    pub fn fold(&self) -> Result<BTreeMap<DelegationId, DelegationRecord>, LfError> {
        let reader = BufReader::new(File::open(&self.path).map_err(|e| LfError::io(&self.path, e))?);
        let mut state = BTreeMap::new();
        for line in reader.lines() {
            let line = line.map_err(|e| LfError::io(&self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(record) = serde_json::from_str::<DelegationRecord>(&line) {
                state.insert(record.id, record);
            }
        }
        Ok(state)
    }

    pub fn for_wu(&self, wu_id: WuId) -> Result<Vec<DelegationRecord>, LfError> {
        Ok(self.fold()?.into_values().filter(|r| r.wu_id == wu_id).collect())
    }

    pub fn pending(&self) -> Result<Vec<DelegationRecord>, LfError> {
        Ok(self.fold()?.into_values().filter(|r| r.status == DelegationStatus::Pending).collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "delegation_log_tests.rs"]
mod tests;
