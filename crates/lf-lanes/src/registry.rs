// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LaneRegistry`: lane definitions parsed out of workspace config, plus the
//! `claim` admission rule (spec §4.2: "lane has no live lock, or lock is a
//! zombie (operator reclaim required); WIP count under limit").

use crate::locks::ZombieReason;
use lf_core::{LaneDef, LfError};

/// The set of lane definitions for one workspace.
#[derive(Debug, Clone)]
pub struct LaneRegistry {
    lanes: Vec<LaneDef>,
}

impl LaneRegistry {
    pub fn new(lanes: Vec<LaneDef>) -> Self {
        Self { lanes }
    }

    pub fn lanes(&self) -> &[LaneDef] {
        &self.lanes
    }

    pub fn get(&self, name: &str) -> Option<&LaneDef> {
        self.lanes.iter().find(|l| l.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&LaneDef, LfError> {
        self.get(name)
            .ok_or_else(|| LfError::InvalidLane { lane: name.to_string(), reason: "no such lane defined".into() })
    }

    /// Whether `lane` may admit a new claim: the existing lock (if any)
    /// must be a zombie rather than live (claim never auto-reclaims — an
    /// operator must run `unlock` first), and `current_wip` must be under
    /// the lane's WIP limit.
    ///
    /// `lock_status` is `None` when the lane is unlocked, `Some(None)` when
    /// locked and alive, `Some(Some(reason))` when locked but zombied.
    pub fn check_admission(
        &self,
        lane: &str,
        lock_status: Option<Option<ZombieReason>>,
        current_wip: u32,
    ) -> Result<(), LfError> {
        let def = self.require(lane)?;
        if let Some(zombie) = lock_status {
            if zombie.is_none() {
                return Err(LfError::LockError {
                    lane: lane.to_string(),
                    reason: "lane is locked by a live process; claim cannot reclaim a live lock".into(),
                });
            }
            return Err(LfError::LockError {
                lane: lane.to_string(),
                reason: "lane lock is a zombie; run lane-unlock before claiming".into(),
            });
        }
        let limit = def.effective_wip_limit();
        if current_wip >= limit {
            return Err(LfError::LockError {
                lane: lane.to_string(),
                reason: format!("WIP limit reached ({current_wip}/{limit})"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
