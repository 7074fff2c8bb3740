//! Meeting lifecycle handlers
//!
//! The only writer of `AppState::phase`:
//!
//! ```text
//! NotStarted ──start──▶ WaitingForEntry ──allowed──▶ Joined ──leave──▶ Left
//!     ▲                       │                                        │
//!     │                     denied                                     │
//!     │                       ▼                                        │
//!     │                  EntryDenied ──denial timer──────────────────▶ │
//!     └──────────────────────return to join────────────────────────────┘
//! ```

use std::time::Duration;

use ils_core::prelude::*;
use ils_core::{EntryDecision, LifecyclePhase, Participant, SdkEvent};
use ils_sdk::{JoinRequest, Quality};

use crate::confirm_dialog::ConfirmDialogState;
use crate::scheduler::TimerKind;
use crate::state::AppState;
use crate::view::leave_guard_enabled;

use super::{devices, mode, UpdateAction, UpdateResult};

/// Timers owned by the lifecycle; toast dismissals are not among them
fn is_lifecycle_timer(kind: &TimerKind) -> bool {
    !matches!(kind, TimerKind::NoticeDismiss(_))
}

pub(crate) fn handle_start(state: &mut AppState) -> UpdateResult {
    if state.phase != LifecyclePhase::NotStarted {
        debug!("Ignoring start request in phase {}", state.phase.label());
        return UpdateResult::none();
    }

    if let Err(e) = state.config.validate() {
        warn!("Cannot start meeting: {}", e);
        state.join_error = Some(e.to_string());
        return UpdateResult::none();
    }

    state.config.participant_name = state.config.effective_name().to_string();
    state.join_error = None;
    state.reset_meeting();
    let join_mode = state.config.mode;
    mode::set_mode(state, join_mode);
    state.phase = LifecyclePhase::WaitingForEntry;

    info!(
        "Joining meeting {} as '{}' ({})",
        state.config.meeting_id,
        state.config.participant_name,
        state.config.mode.label()
    );

    UpdateResult::action(UpdateAction::JoinSession(JoinRequest::from_config(
        &state.config,
    )))
}

pub(crate) fn handle_session_attached(
    state: &mut AppState,
    local_participant_id: String,
) -> UpdateResult {
    if !state.phase.has_session() {
        // The meeting was abandoned while the join call was in flight
        info!("Session attached after leaving; leaving again");
        return UpdateResult::action(UpdateAction::LeaveSession);
    }

    info!("Session attached as participant {}", local_participant_id);
    state.local_participant_id = Some(local_participant_id);

    let mut result = UpdateResult::none();
    for event in std::mem::take(&mut state.pending_entry) {
        match event {
            SdkEvent::EntryResponded {
                participant_id,
                decision,
            } => result.merge(handle_entry_responded(state, &participant_id, decision)),
            SdkEvent::MeetingJoined => result.merge(handle_meeting_joined(state)),
            other => trace!("Dropping buffered event {}", other.event_type()),
        }
    }
    result
}

/// A join failure is fatal to the join and is handled like a denial
pub(crate) fn handle_join_failed(state: &mut AppState, message: String) -> UpdateResult {
    if state.phase != LifecyclePhase::WaitingForEntry {
        debug!("Ignoring join failure in phase {}", state.phase.label());
        return UpdateResult::none();
    }

    warn!("Join failed: {}", message);
    state.join_error = Some(Error::join(message).to_string());
    enter_denied(state);
    UpdateResult::none()
}

pub(crate) fn handle_entry_responded(
    state: &mut AppState,
    participant_id: &str,
    decision: EntryDecision,
) -> UpdateResult {
    if state.phase != LifecyclePhase::WaitingForEntry {
        debug!("Ignoring entry response in phase {}", state.phase.label());
        return UpdateResult::none();
    }

    if state.local_participant_id.is_none() {
        state.pending_entry.push(SdkEvent::EntryResponded {
            participant_id: participant_id.to_string(),
            decision,
        });
        return UpdateResult::none();
    }

    if !state.is_local(participant_id) {
        trace!("Entry response for remote participant {}", participant_id);
        return UpdateResult::none();
    }

    match decision {
        EntryDecision::Allowed => enter_joined(state),
        EntryDecision::Denied => {
            info!("Entry denied by host");
            enter_denied(state);
            UpdateResult::none()
        }
    }
}

/// Meetings without a waiting room never send an entry response
pub(crate) fn handle_meeting_joined(state: &mut AppState) -> UpdateResult {
    if state.phase != LifecyclePhase::WaitingForEntry {
        return UpdateResult::none();
    }

    if state.local_participant_id.is_none() {
        state.pending_entry.push(SdkEvent::MeetingJoined);
        return UpdateResult::none();
    }

    enter_joined(state)
}

pub(crate) fn handle_meeting_left(state: &mut AppState) -> UpdateResult {
    if !state.phase.has_session() {
        return UpdateResult::none();
    }
    info!("Meeting left by the SDK");
    enter_left(state, false)
}

pub(crate) fn handle_leave(state: &mut AppState) -> UpdateResult {
    if !state.phase.has_session() {
        debug!("Ignoring leave in phase {}", state.phase.label());
        return UpdateResult::none();
    }
    info!("Leaving meeting");
    enter_left(state, true)
}

pub(crate) fn handle_return_to_join(state: &mut AppState) -> UpdateResult {
    if state.phase != LifecyclePhase::Left {
        return UpdateResult::none();
    }

    state.config.clear();
    state.reset_meeting();
    state.join_focus = Default::default();
    state.phase = LifecyclePhase::NotStarted;
    UpdateResult::action(UpdateAction::EnumerateDevices)
}

pub(crate) fn handle_teardown(state: &mut AppState) -> UpdateResult {
    let cancelled = state.timers.cancel_all();
    state.denial_timer = None;
    state.devices.reset();
    debug!("Teardown cancelled {} timer(s)", cancelled);
    UpdateResult::none()
}

pub(crate) fn handle_tick(state: &mut AppState, now: Duration) -> UpdateResult {
    let mut result = UpdateResult::none();

    for timer in state.timers.advance_to(now) {
        match timer {
            TimerKind::DenialLeave => {
                state.denial_timer = None;
                if state.phase == LifecyclePhase::EntryDenied {
                    result.merge(enter_left(state, true));
                }
            }
            TimerKind::NoticeDismiss(id) => {
                state.notices.dismiss(id);
            }
            TimerKind::DeviceSettle { kind, seq } => {
                result.merge(devices::handle_settled(state, kind, seq));
            }
            TimerKind::RaisedHandExpiry(participant_id) => {
                state
                    .raised_hands
                    .retain(|h| h.participant_id != participant_id);
            }
            TimerKind::PollExpiry(poll_id) => {
                state.close_poll(&poll_id);
            }
            TimerKind::ReactionExpiry(id) => {
                state.remove_reaction(id);
            }
        }
    }

    result
}

pub(crate) fn handle_participant_joined(
    state: &mut AppState,
    participant_id: String,
    name: String,
) -> UpdateResult {
    if state.participants.iter().all(|p| p.id != participant_id) {
        state.participants.push(Participant {
            id: participant_id.clone(),
            name,
        });
    }

    UpdateResult::action(UpdateAction::SetParticipantQuality {
        participant_id,
        quality: Quality::High,
    })
}

pub(crate) fn handle_participant_left(state: &mut AppState, participant_id: &str) -> UpdateResult {
    state.participants.retain(|p| p.id != participant_id);
    state
        .raised_hands
        .retain(|h| h.participant_id != participant_id);
    state
        .timers
        .cancel_where(|k| matches!(k, TimerKind::RaisedHandExpiry(id) if id == participant_id));
    if state.presenter_id.as_deref() == Some(participant_id) {
        state.presenter_id = None;
    }
    UpdateResult::none()
}

pub(crate) fn handle_bridge_exited(state: &mut AppState, code: Option<i32>) -> UpdateResult {
    warn!("SDK bridge exited (code {:?})", code);
    if state.phase.has_session() {
        return enter_left(state, false);
    }
    UpdateResult::none()
}

pub(crate) fn handle_request_quit(state: &mut AppState) -> UpdateResult {
    if state.confirm_dialog.is_some() {
        return UpdateResult::none();
    }

    if state.phase.has_session() && leave_guard_enabled(state.viewport) {
        state.confirm_dialog = Some(ConfirmDialogState::leave_confirmation());
        return UpdateResult::none();
    }

    UpdateResult::message(crate::message::Message::Quit)
}

pub(crate) fn handle_quit(state: &mut AppState) -> UpdateResult {
    state.confirm_dialog = None;

    let mut result = UpdateResult::none();
    if state.phase.has_session() && !state.leave_sent {
        state.leave_sent = true;
        result.actions.push(UpdateAction::LeaveSession);
    }

    state.timers.cancel_all();
    state.denial_timer = None;
    state.devices.reset();
    state.quitting = true;
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Transitions
// ─────────────────────────────────────────────────────────────────────────────

fn enter_joined(state: &mut AppState) -> UpdateResult {
    if let Some(id) = state.denial_timer.take() {
        state.timers.cancel(id);
    }

    state.phase = LifecyclePhase::Joined;
    info!("Joined meeting {}", state.config.meeting_id);

    UpdateResult::actions(devices::reconcile_on_join(state))
}

fn enter_denied(state: &mut AppState) {
    if let Some(id) = state.denial_timer.take() {
        state.timers.cancel(id);
    }

    state.phase = LifecyclePhase::EntryDenied;
    let delay = state.settings.timing.denial_leave();
    state.denial_timer = Some(state.timers.schedule(delay, TimerKind::DenialLeave));
}

/// Enter `Left`: stop lifecycle timers, drop in-flight device work, clear
/// the credentials and ask the session to leave at most once.
fn enter_left(state: &mut AppState, send_leave: bool) -> UpdateResult {
    state.phase = LifecyclePhase::Left;

    state.denial_timer = None;
    state.timers.cancel_where(is_lifecycle_timer);
    state.devices.reset();
    state.config.clear();
    state.local_participant_id = None;
    state.pending_entry.clear();
    state.raised_hands.clear();
    state.polls.clear();
    state.reactions.clear();

    if state.leave_sent {
        return UpdateResult::none();
    }
    state.leave_sent = true;

    if send_leave {
        UpdateResult::action(UpdateAction::LeaveSession)
    } else {
        UpdateResult::none()
    }
}

/// Called when a joining error arrives while waiting for entry
pub(crate) fn fail_join(state: &mut AppState) {
    if state.phase == LifecyclePhase::WaitingForEntry {
        enter_denied(state);
    }
}
