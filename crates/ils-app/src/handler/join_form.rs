//! Joining screen edits
//!
//! The session configuration is editable only before the meeting starts;
//! every edit is ignored in any other phase.

use ils_core::prelude::*;
use ils_core::{DeviceKind, DeviceRef, LifecyclePhase, Mode};

use crate::state::AppState;

use super::UpdateResult;

fn editable(state: &AppState, what: &str) -> bool {
    if state.phase == LifecyclePhase::NotStarted {
        return true;
    }
    debug!("Ignoring {} edit in phase {}", what, state.phase.label());
    false
}

pub(crate) fn set_token(state: &mut AppState, value: String) -> UpdateResult {
    if editable(state, "token") {
        state.config.token = value;
        state.join_error = None;
    }
    UpdateResult::none()
}

pub(crate) fn set_meeting_id(state: &mut AppState, value: String) -> UpdateResult {
    if editable(state, "meeting id") {
        state.config.meeting_id = value;
        state.join_error = None;
    }
    UpdateResult::none()
}

pub(crate) fn set_participant_name(state: &mut AppState, value: String) -> UpdateResult {
    if editable(state, "name") {
        state.config.participant_name = value;
    }
    UpdateResult::none()
}

pub(crate) fn toggle_mic(state: &mut AppState) -> UpdateResult {
    if editable(state, "mic") {
        state.config.mic_on = !state.config.mic_on;
    }
    UpdateResult::none()
}

pub(crate) fn toggle_webcam(state: &mut AppState) -> UpdateResult {
    if editable(state, "webcam") {
        state.config.webcam_on = !state.config.webcam_on;
    }
    UpdateResult::none()
}

pub(crate) fn select_device(
    state: &mut AppState,
    kind: DeviceKind,
    device: DeviceRef,
) -> UpdateResult {
    if editable(state, kind.label()) {
        state.config.select_device(kind, device);
    }
    UpdateResult::none()
}

pub(crate) fn set_join_mode(state: &mut AppState, mode: Mode) -> UpdateResult {
    if editable(state, "mode") {
        state.config.mode = mode;
    }
    UpdateResult::none()
}
