// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The WU YAML record store: one file per Work Unit under `<wuDir>/`.

use lf_core::{LfError, WuId, WuRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and writes `<wuDir>/WU-<n>.yaml` files.
pub struct RecordStore {
    wu_dir: PathBuf,
}

impl RecordStore {
    pub fn new(wu_dir: impl Into<PathBuf>) -> Self {
        Self { wu_dir: wu_dir.into() }
    }

    fn path_for(&self, id: WuId) -> PathBuf {
        self.wu_dir.join(format!("{id}.yaml"))
    }

    pub fn load(&self, id: WuId) -> Result<WuRecord, LfError> {
        let path = self.path_for(id);
        let contents = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LfError::WuNotFound { wu_id: id.to_string() }
            } else {
                LfError::io(&path, e)
            }
        })?;
        serde_yaml::from_str(&contents)
            .map_err(|e| LfError::YamlParseError { path, reason: e.to_string() })
    }

    pub fn save(&self, record: &WuRecord) -> Result<(), LfError> {
        record.validate_in_progress_invariant()?;
        fs::create_dir_all(&self.wu_dir).map_err(|e| LfError::io(&self.wu_dir, e))?;
        let path = self.path_for(record.id);
        let yaml = serde_yaml::to_string(record)
            .map_err(|e| LfError::YamlParseError { path: path.clone(), reason: e.to_string() })?;
        fs::write(&path, yaml).map_err(|e| LfError::io(&path, e))
    }

    pub fn delete(&self, id: WuId) -> Result<(), LfError> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LfError::WuNotFound { wu_id: id.to_string() })
            }
            Err(e) => Err(LfError::io(&path, e)),
        }
    }

    pub fn exists(&self, id: WuId) -> bool {
        self.path_for(id).exists()
    }

    /// All WU ids currently on disk, sorted ascending.
    pub fn list_ids(&self) -> Result<Vec<WuId>, LfError> {
        if !self.wu_dir.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.wu_dir).map_err(|e| LfError::io(&self.wu_dir, e))? {
            let entry = entry.map_err(|e| LfError::io(&self.wu_dir, e))?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".yaml") {
                if let Ok(id) = stem.parse::<WuId>() {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub fn load_all(&self) -> Result<Vec<WuRecord>, LfError> {
        self.list_ids()?.into_iter().map(|id| self.load(id)).collect()
    }

    pub fn wu_dir(&self) -> &Path {
        &self.wu_dir
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
