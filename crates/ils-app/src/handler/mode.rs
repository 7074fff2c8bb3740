//! Mode listener
//!
//! The only writer of `AppState::mode`. Every recognized mode change is
//! applied immediately; unknown wire values are logged and dropped.

use ils_core::prelude::*;
use ils_core::Mode;

use crate::state::AppState;

use super::UpdateResult;

/// Overwrite the mode, bumping the revision when the value changes.
/// Returns whether it changed.
pub(crate) fn set_mode(state: &mut AppState, mode: Mode) -> bool {
    if state.mode == mode {
        return false;
    }
    info!("Mode changed: {} -> {}", state.mode.label(), mode.label());
    state.mode = mode;
    state.mode_revision += 1;
    true
}

/// `CHANGE_MODE` pub-sub message, optionally addressed to one participant
pub(crate) fn handle_change_mode(
    state: &mut AppState,
    value: &str,
    target: Option<&str>,
) -> UpdateResult {
    if let Some(target) = target {
        if !state.is_local(target) {
            trace!("Mode change addressed to {}", target);
            return UpdateResult::none();
        }
    }
    apply_wire_mode(state, value)
}

/// Mode switch reported by the SDK for a participant
pub(crate) fn handle_participant_mode_changed(
    state: &mut AppState,
    participant_id: &str,
    value: &str,
) -> UpdateResult {
    if !state.is_local(participant_id) {
        return UpdateResult::none();
    }
    apply_wire_mode(state, value)
}

fn apply_wire_mode(state: &mut AppState, value: &str) -> UpdateResult {
    if !state.phase.has_session() {
        debug!("Ignoring mode change outside a session");
        return UpdateResult::none();
    }

    match Mode::from_wire(value) {
        Some(mode) => {
            set_mode(state, mode);
        }
        None => warn!("Ignoring unknown mode value '{}'", value),
    }
    UpdateResult::none()
}
