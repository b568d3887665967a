// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `CoverageAnalyser` (C6, spec §4.2): walk the repo's tracked code files
//! and flag any that match no lane's globs.

use lf_core::LaneDef;
use std::path::{Path, PathBuf};

/// Extensions treated as "code" for coverage purposes.
const CODE_EXTENSIONS: &[&str] = &["rs", "ts", "tsx", "js", "jsx", "py", "go", "rb", "java", "kt", "c", "cpp", "h", "hpp"];

/// Directories never walked for coverage (build artefacts and VCS metadata).
const IGNORED_DIRS: &[&str] = &["target", "node_modules", ".git", "dist", "build"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    pub uncovered: Vec<String>,
}

impl CoverageReport {
    pub fn healthy(&self) -> bool {
        self.uncovered.is_empty()
    }
}

pub struct CoverageAnalyser<'a> {
    repo_root: &'a Path,
}

impl<'a> CoverageAnalyser<'a> {
    pub fn new(repo_root: &'a Path) -> Self {
        Self { repo_root }
    }

    pub fn analyse(&self, lanes: &[LaneDef]) -> CoverageReport {
        let patterns: Vec<glob::Pattern> =
            lanes.iter().flat_map(|l| l.patterns.iter()).filter_map(|p| glob::Pattern::new(p).ok()).collect();

        let mut uncovered = Vec::new();
        let mut stack = vec![self.repo_root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else { continue };
            for entry in entries.flatten() {
                let path = entry.path();
                let file_type = match entry.file_type() {
                    Ok(t) => t,
                    Err(_) => continue,
                };
                if file_type.is_dir() {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    if !IGNORED_DIRS.contains(&name.as_ref()) {
                        stack.push(path);
                    }
                    continue;
                }
                if !is_code_file(&path) {
                    continue;
                }
                let Ok(rel) = path.strip_prefix(self.repo_root) else { continue };
                let rel_str = rel.to_string_lossy().to_string();
                if !patterns.iter().any(|p| p.matches(&rel_str)) {
                    uncovered.push(rel_str);
                }
            }
        }
        uncovered.sort();
        CoverageReport { uncovered }
    }
}

fn is_code_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).map(|ext| CODE_EXTENSIONS.contains(&ext)).unwrap_or(false)
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;
