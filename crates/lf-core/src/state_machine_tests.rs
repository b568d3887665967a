// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    claim = { Ready, InProgress, true },
    release = { InProgress, Ready, true },
    block = { InProgress, Blocked, true },
    complete = { InProgress, Done, true },
    unblock = { Blocked, InProgress, true },
    done_is_terminal = { Done, InProgress, false },
    blocked_cannot_complete_directly = { Blocked, Done, false },
    ready_cannot_complete_directly = { Ready, Done, false },
    self_transition_rejected = { InProgress, InProgress, false },
    blocked_cannot_go_to_ready_directly = { Blocked, Ready, false },
)]
fn transition_legality(from: WuStatus, to: WuStatus, expect_ok: bool) {
    let id = WuId::new(1);
    let result = assert_transition(from, to, &id);
    assert_eq!(result.is_ok(), expect_ok);
}

#[test]
fn illegal_transition_error_names_wu_and_states() {
    let id = WuId::new(9);
    let err = assert_transition(Done, Ready, &id).unwrap_err();
    assert_eq!(err.to_string(), "illegal transition for WU-9: done -> ready");
}
