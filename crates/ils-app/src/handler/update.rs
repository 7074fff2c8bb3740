//! Main update function - handles state transitions (TEA pattern)

use ils_core::prelude::*;
use ils_core::{BroadcastKind, SdkEvent};

use crate::message::Message;
use crate::state::AppState;

use super::{devices, join_form, keys::handle_key, lifecycle, mode, notify, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and actions
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::RequestQuit => lifecycle::handle_request_quit(state),
        Message::Quit => lifecycle::handle_quit(state),
        Message::ConfirmQuit => {
            state.confirm_dialog = None;
            UpdateResult::message(Message::Quit)
        }
        Message::CancelQuit => {
            state.confirm_dialog = None;
            UpdateResult::none()
        }
        Message::CycleDialogOption => {
            if let Some(dialog) = state.confirm_dialog.as_mut() {
                dialog.select_next();
            }
            UpdateResult::none()
        }

        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick { now } => lifecycle::handle_tick(state, now),

        Message::Sdk(event) => handle_sdk_event(state, event),

        Message::BridgeExited { code } => lifecycle::handle_bridge_exited(state, code),

        // ─────────────────────────────────────────────────────────
        // Joining Screen
        // ─────────────────────────────────────────────────────────
        Message::SetToken(value) => join_form::set_token(state, value),
        Message::SetMeetingId(value) => join_form::set_meeting_id(state, value),
        Message::SetParticipantName(value) => join_form::set_participant_name(state, value),
        Message::ToggleMic => join_form::toggle_mic(state),
        Message::ToggleWebcam => join_form::toggle_webcam(state),
        Message::SelectDevice { kind, device } => join_form::select_device(state, kind, device),
        Message::SetJoinMode(mode) => join_form::set_join_mode(state, mode),
        Message::FocusJoinField(field) => {
            state.join_focus = field;
            UpdateResult::none()
        }
        Message::EnumerateDevices => devices::handle_enumerate(state),
        Message::DevicesEnumerated { kind, devices } => {
            devices::handle_devices_enumerated(state, kind, devices)
        }

        // ─────────────────────────────────────────────────────────
        // Lifecycle
        // ─────────────────────────────────────────────────────────
        Message::StartMeeting => lifecycle::handle_start(state),
        Message::SessionAttached {
            local_participant_id,
        } => lifecycle::handle_session_attached(state, local_participant_id),
        Message::JoinFailed { message } => lifecycle::handle_join_failed(state, message),
        Message::LeaveMeeting => lifecycle::handle_leave(state),
        Message::ReturnToJoin => lifecycle::handle_return_to_join(state),
        Message::AcknowledgeError => notify::acknowledge_error(state),
        Message::Teardown => lifecycle::handle_teardown(state),

        // ─────────────────────────────────────────────────────────
        // Device Reconciliation
        // ─────────────────────────────────────────────────────────
        Message::ChangeDevice { kind, device } => {
            devices::handle_change_device(state, kind, device)
        }
        Message::DeviceDisabled { kind, seq } => devices::handle_disabled(state, kind, seq),
        Message::DeviceAcquired { kind, seq, track } => {
            devices::handle_acquired(state, kind, seq, track)
        }
        Message::DeviceApplied { kind, seq } => devices::handle_applied(state, kind, seq),
        Message::DeviceStepFailed { kind, seq, error } => {
            devices::handle_step_failed(state, kind, seq, error)
        }

        // ─────────────────────────────────────────────────────────
        // In-meeting
        // ─────────────────────────────────────────────────────────
        Message::RaiseHand => notify::handle_local_raise_hand(state),
        Message::SetChatDraft(draft) => {
            state.chat_draft = draft;
            UpdateResult::none()
        }
        Message::SendChat(text) => notify::handle_send_chat(state, text),
        Message::ToggleSidebar(panel) => {
            state.sidebar = if state.sidebar == Some(panel) {
                None
            } else {
                Some(panel)
            };
            UpdateResult::none()
        }
        Message::CloseSidebar => {
            state.sidebar = None;
            UpdateResult::none()
        }
        Message::ViewportResized(viewport) => {
            state.viewport = viewport;
            UpdateResult::none()
        }
        Message::DismissNotice(id) => {
            state.notices.dismiss(id);
            UpdateResult::none()
        }

        Message::ActionFailed {
            action,
            error,
            recoverable,
        } => {
            if recoverable {
                warn!("Session call '{}' failed: {}", action, error);
            } else {
                error!("Session call '{}' failed: {}", action, error);
            }
            UpdateResult::none()
        }
    }
}

/// Route an SDK callback to its owner
fn handle_sdk_event(state: &mut AppState, event: SdkEvent) -> UpdateResult {
    debug!("SDK event: {}", event.event_type());

    match event {
        SdkEvent::ParticipantJoined {
            participant_id,
            name,
        } => lifecycle::handle_participant_joined(state, participant_id, name),
        SdkEvent::ParticipantLeft { participant_id } => {
            lifecycle::handle_participant_left(state, &participant_id)
        }
        SdkEvent::EntryResponded {
            participant_id,
            decision,
        } => lifecycle::handle_entry_responded(state, &participant_id, decision),
        SdkEvent::MeetingJoined => lifecycle::handle_meeting_joined(state),
        SdkEvent::MeetingLeft => lifecycle::handle_meeting_left(state),
        SdkEvent::Error { code, message } => notify::handle_error(state, code, &message),
        SdkEvent::RecordingStateChanged { status } => notify::handle_recording(state, status),
        SdkEvent::HlsStateChanged {
            status,
            downstream_url,
        } => notify::handle_hls(state, status, downstream_url),
        SdkEvent::PresenterChanged { presenter_id } => {
            state.presenter_id = presenter_id;
            UpdateResult::none()
        }
        SdkEvent::ParticipantModeChanged {
            participant_id,
            mode: value,
        } => mode::handle_participant_mode_changed(state, &participant_id, &value),
        SdkEvent::PubSub(broadcast) => match broadcast.kind() {
            BroadcastKind::RaiseHand => notify::handle_raise_hand(state, &broadcast),
            BroadcastKind::Chat { message } => notify::handle_chat(state, &broadcast, message),
            BroadcastKind::Poll(poll) => notify::handle_poll(state, &broadcast, poll),
            BroadcastKind::Reaction { emoji } => notify::handle_reaction(state, &broadcast, emoji),
            BroadcastKind::ChangeMode { mode: value, target } => {
                mode::handle_change_mode(state, value, target)
            }
            BroadcastKind::Other { topic } => {
                trace!("Ignoring pub-sub message on topic '{}'", topic);
                UpdateResult::none()
            }
        },
    }
}
