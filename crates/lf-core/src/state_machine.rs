// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The WU status state machine (C3/C4).

use crate::error::LfError;
use crate::wu::WuId;
use crate::wu::WuStatus::{self, Blocked, Done, InProgress, Ready};

/// Validate that `current -> next` is a legal WU transition.
///
/// Legal edges:
/// - `ready -> in_progress` (claim)
/// - `in_progress -> ready` (release)
/// - `in_progress -> blocked` (block)
/// - `in_progress -> done` (complete)
/// - `blocked -> in_progress` (unblock)
///
/// `done` is terminal; no transition leaves it. Self-transitions are
/// rejected as no-ops that callers should detect before invoking this.
pub fn assert_transition(current: WuStatus, next: WuStatus, wu_id: &WuId) -> Result<(), LfError> {
    let legal = matches!(
        (current, next),
        (Ready, InProgress) | (InProgress, Ready) | (InProgress, Blocked) | (InProgress, Done) | (Blocked, InProgress)
    );
    if legal {
        Ok(())
    } else {
        Err(LfError::StateError {
            wu_id: wu_id.to_string(),
            from: current.to_string(),
            to: next.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
