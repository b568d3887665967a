// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The environment-variable contract from spec §6: the force-push bypass,
//! the current-operation name consulted by the pre-push allowlist, and the
//! headless-execution gate.

use std::env;

/// Operations allowed to force-push without a human in the loop, per the
/// pre-push allowlist spec §4.3/§6 describes. Every other operation name
/// is rejected even when `LUMENFLOW_FORCE` is set.
const FORCE_ALLOWLIST: &[&str] =
    &["wu-create", "wu-claim", "wu-release", "wu-block", "wu-unblock", "wu-complete", "wu-delete", "lane-unlock"];

/// Whether `LUMENFLOW_FORCE=1` is set, paired with a non-empty reason.
///
/// Returns the reason string for audit logging; `None` if force mode is
/// off or missing its required reason.
pub fn force_bypass_reason() -> Option<String> {
    let forced = env::var("LUMENFLOW_FORCE").map(|v| is_truthy(&v)).unwrap_or(false);
    if !forced {
        return None;
    }
    env::var("LUMENFLOW_FORCE_REASON").ok().filter(|r| !r.trim().is_empty())
}

/// The operation name the current process declares via `LUMENFLOW_WU_TOOL`,
/// consulted by the pre-push allowlist before permitting a force bypass.
pub fn current_operation() -> Option<String> {
    env::var("LUMENFLOW_WU_TOOL").ok()
}

/// Whether `operation` may force-push under the current environment: force
/// mode must be on with a reason, and the declared operation must be on the
/// allowlist.
pub fn force_push_permitted(operation: &str) -> Option<String> {
    let reason = force_bypass_reason()?;
    let declared = current_operation()?;
    if declared != operation || !FORCE_ALLOWLIST.contains(&operation) {
        return None;
    }
    Some(reason)
}

/// Whether unattended execution is permitted, per spec §6:
/// `LUMENFLOW_HEADLESS=1` only takes effect paired with `LUMENFLOW_ADMIN=1`,
/// `CI=<truthy>`, or `GITHUB_ACTIONS=<truthy>`.
pub fn headless_permitted() -> bool {
    let headless = env::var("LUMENFLOW_HEADLESS").map(|v| is_truthy(&v)).unwrap_or(false);
    if !headless {
        return false;
    }
    let admin = env::var("LUMENFLOW_ADMIN").map(|v| is_truthy(&v)).unwrap_or(false);
    let ci = env::var("CI").map(|v| is_truthy(&v)).unwrap_or(false);
    let gha = env::var("GITHUB_ACTIONS").map(|v| is_truthy(&v)).unwrap_or(false);
    admin || ci || gha
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True" | "yes")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
