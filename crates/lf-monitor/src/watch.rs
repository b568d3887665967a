// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring watch mode (C9, spec §4.4): runs [`DelegationMonitor::run_once`]
//! on a timer with cooperative cancellation and exponential backoff on
//! failure, the same pattern the teacher's listener loop uses
//! (`tokio_util::sync::CancellationToken` + `tokio::select!`) rather than a
//! bespoke signal-handling loop.

use crate::report::{DelegationMonitor, MonitorReport};
use lf_core::{Clock, PidProbe};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Ceiling on backoff growth after repeated failures (spec §4.4).
pub const MAX_BACKOFF: Duration = Duration::from_secs(3600);

/// Run one cycle, sleep, repeat, until `cancel` fires. Cancellation is only
/// ever observed between cycles — `run_once` itself is a single synchronous
/// pass and is never interrupted partway through.
///
/// `on_report` is called with each successful cycle's report; a failed
/// cycle only logs and backs off, it never calls back.
pub async fn run_watch<C, P>(
    monitor: &DelegationMonitor<C, P>,
    interval: Duration,
    cancel: CancellationToken,
    mut on_report: impl FnMut(MonitorReport),
) where
    C: Clock,
    P: PidProbe + Clone,
{
    let mut backoff = interval;
    loop {
        match monitor.run_once() {
            Ok(report) => {
                backoff = interval;
                on_report(report);
            }
            Err(e) => {
                error!(error = %e, backoff_secs = backoff.as_secs(), "monitor pass failed, backing off");
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                info!("monitor watch loop stopping");
                return;
            }
            _ = tokio::time::sleep(backoff) => {}
        }
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
