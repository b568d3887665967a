// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Core types and abstractions shared by every `lf-*` crate: Work Unit
//! records and their status machine, lane definitions, delegation and
//! signal records, the error taxonomy, workspace configuration, and the
//! clock/PID-probe seams the rest of the workspace tests against.

#[macro_use]
mod macros;

pub mod clock;
pub mod config;
pub mod context;
pub mod delegation;
pub mod error;
pub mod lane;
pub mod pid;
pub mod signal;
pub mod state_machine;
pub mod wu;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    CoChangeRule, DelegationConfig, DirectoriesConfig, EscalationAction, EscalationStep,
    GatesConfig, GitDeliveryConfig, LaneHealthMode, LanesConfig, MergeConfig, MergeMode,
    RetryConfig, SignalsConfig, SoftwareDeliveryConfig, WorkspaceConfig,
};
pub use context::ExecContext;
pub use delegation::{DelegationId, DelegationRecord, DelegationStatus};
pub use error::{LfError, LfResult};
pub use lane::LaneDef;
pub use pid::{FakePidProbe, PidProbe, SystemPidProbe};
pub use signal::{ReadReceipt, Signal, SignalId, SignalSeverity, SuggestedAction};
pub use state_machine::assert_transition;
pub use wu::{Approval, ClaimedMode, WuId, WuRecord, WuStatus};

#[cfg(any(test, feature = "test-support"))]
pub use wu::WuRecordBuilder;
