// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lane definitions: the partitioning of the codebase into ownership regions.
//!
//! Overlap analysis, lock management, and coverage checking all live in the
//! `lf-lanes` crate; this module only holds the plain data shape a lane
//! definition takes once parsed out of workspace config.

use serde::{Deserialize, Serialize};

/// A single lane as declared in `lanes.definitions[]` of workspace config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneDef {
    pub name: String,
    /// Glob patterns (relative to repo root) this lane owns.
    pub patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Maximum concurrent `in_progress` claims; `None` means the spec
    /// default of 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<u32>,
}

impl LaneDef {
    pub fn new(name: impl Into<String>, patterns: Vec<String>) -> Self {
        Self { name: name.into(), patterns, description: None, wip_limit: None }
    }

    /// The WIP limit to enforce: the configured value, or the spec default
    /// of 1 when unset.
    pub fn effective_wip_limit(&self) -> u32 {
        self.wip_limit.unwrap_or(1)
    }
}

impl LaneDef {
    crate::setters! {
        option {
            description: String,
            wip_limit: u32,
        }
    }
}

#[cfg(test)]
#[path = "lane_tests.rs"]
mod tests;
