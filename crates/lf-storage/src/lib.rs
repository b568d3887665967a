// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Durable on-disk state for LumenFlow: the event log, materialised views,
//! WU YAML records, delegation registry, signal bus, and completion stamps.
//!
//! Every writer here is append-only or whole-file-rewrite; nothing in this
//! crate truncates or edits a log line in place, per spec §5's
//! shared-resource policy.

pub mod delegation_log;
pub mod event;
pub mod eventlog;
pub mod records;
pub mod signal_log;
pub mod stamps;
pub mod views;

pub use delegation_log::DelegationLog;
pub use event::Event;
pub use eventlog::{Entry, EventLog};
pub use records::RecordStore;
pub use signal_log::{ReceiptLog, SignalLog};
pub use stamps::{CreateOutcome, StampError, StampStore, ValidationReport};
pub use views::{render_backlog, render_status};
