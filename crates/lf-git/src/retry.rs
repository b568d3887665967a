// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff with jitter for the push-retry protocol (spec §4.3,
//! §6). Delay calculation is grounded on the calculate_delay/apply_jitter
//! shape used elsewhere in the retrieval pack for flaky remote operations.

use lf_core::RetryConfig;
use std::time::Duration;

/// The delay before retry attempt `attempt` (1-indexed: `attempt=1` is the
/// delay before the *second* overall try), capped at `max_delay_ms` and
/// jittered within `+/- jitter_fraction` when `jitter_fraction > 0`.
pub fn delay_for_attempt(config: &RetryConfig, attempt: u32) -> Duration {
    let pow = attempt.saturating_sub(1).min(20);
    let raw_ms = config.base_delay_ms.saturating_mul(2_u64.saturating_pow(pow));
    let capped_ms = raw_ms.min(config.max_delay_ms);
    if config.jitter_fraction <= 0.0 {
        return Duration::from_millis(capped_ms);
    }
    apply_jitter(capped_ms, config.jitter_fraction)
}

fn apply_jitter(delay_ms: u64, jitter_fraction: f64) -> Duration {
    use rand::Rng;
    let fraction = jitter_fraction.clamp(0.0, 1.0);
    let range = 2.0 * fraction;
    let mut rng = rand::thread_rng();
    let random_value: f64 = rng.r#gen();
    let factor = 1.0 - fraction + (random_value * range);
    let millis = (delay_ms as f64 * factor).round().max(0.0) as u64;
    Duration::from_millis(millis)
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
