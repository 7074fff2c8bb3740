//! Key event handlers per screen
//!
//! Modals take keys first: the leave confirmation, then the error modal.
//! Otherwise keys are routed by lifecycle phase.

use ils_core::{DeviceKind, LifecyclePhase};

use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, JoinField};
use crate::view::SidebarPanel;

/// Convert key events to messages based on current state
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    if state.confirm_dialog.is_some() {
        return handle_key_confirm_dialog(state, key);
    }

    if state.error_notice.is_some() {
        return handle_key_error_modal(key);
    }

    if key == InputKey::CharCtrl('c') {
        return Some(Message::RequestQuit);
    }

    match state.phase {
        LifecyclePhase::NotStarted => handle_key_joining(state, key),
        LifecyclePhase::WaitingForEntry | LifecyclePhase::EntryDenied => {
            handle_key_waiting(key)
        }
        LifecyclePhase::Joined => handle_key_meeting(state, key),
        LifecyclePhase::Left => handle_key_left(key),
    }
}

fn handle_key_confirm_dialog(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('y') | InputKey::Char('Y') => Some(Message::ConfirmQuit),
        InputKey::Char('n') | InputKey::Char('N') | InputKey::Esc => Some(Message::CancelQuit),
        InputKey::Tab | InputKey::BackTab | InputKey::Left | InputKey::Right => {
            Some(Message::CycleDialogOption)
        }
        InputKey::Enter => state
            .confirm_dialog
            .as_ref()
            .and_then(|d| d.selected_message()),
        _ => None,
    }
}

fn handle_key_error_modal(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Esc | InputKey::Char('o') => Some(Message::AcknowledgeError),
        _ => None,
    }
}

fn handle_key_joining(state: &AppState, key: InputKey) -> Option<Message> {
    let config = &state.config;

    match key {
        InputKey::Enter => Some(Message::StartMeeting),
        InputKey::Esc => Some(Message::RequestQuit),
        InputKey::Tab | InputKey::Down => Some(Message::FocusJoinField(state.join_focus.next())),
        InputKey::BackTab | InputKey::Up => {
            Some(Message::FocusJoinField(state.join_focus.prev()))
        }

        // Ctrl shortcuts for toggles and device selection
        InputKey::CharCtrl('a') => Some(Message::ToggleMic),
        InputKey::CharCtrl('v') => Some(Message::ToggleWebcam),
        InputKey::CharCtrl('b') => Some(Message::SetJoinMode(config.mode.toggled())),
        InputKey::CharCtrl('r') => Some(Message::EnumerateDevices),
        InputKey::Right => Some(Message::SelectDevice {
            kind: DeviceKind::Camera,
            device: state.next_device(DeviceKind::Camera, &config.selected_webcam),
        }),
        InputKey::Left => Some(Message::SelectDevice {
            kind: DeviceKind::Microphone,
            device: state.next_device(DeviceKind::Microphone, &config.selected_mic),
        }),

        InputKey::Char(c) => {
            let mut value = focused_value(state).to_string();
            value.push(c);
            Some(set_focused(state.join_focus, value))
        }
        InputKey::Backspace => {
            let mut value = focused_value(state).to_string();
            value.pop()?;
            Some(set_focused(state.join_focus, value))
        }
        _ => None,
    }
}

fn focused_value(state: &AppState) -> &str {
    match state.join_focus {
        JoinField::Token => &state.config.token,
        JoinField::MeetingId => &state.config.meeting_id,
        JoinField::Name => &state.config.participant_name,
    }
}

fn set_focused(field: JoinField, value: String) -> Message {
    match field {
        JoinField::Token => Message::SetToken(value),
        JoinField::MeetingId => Message::SetMeetingId(value),
        JoinField::Name => Message::SetParticipantName(value),
    }
}

fn handle_key_waiting(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('l') => Some(Message::LeaveMeeting),
        InputKey::Char('q') | InputKey::Esc => Some(Message::RequestQuit),
        _ => None,
    }
}

fn handle_key_meeting(state: &AppState, key: InputKey) -> Option<Message> {
    if state.sidebar == Some(SidebarPanel::Chat) {
        if let Some(msg) = handle_key_chat_input(state, key) {
            return Some(msg);
        }
    }

    match key {
        InputKey::Char('q') => Some(Message::RequestQuit),
        InputKey::Char('l') => Some(Message::LeaveMeeting),
        InputKey::Char('h') => Some(Message::RaiseHand),
        InputKey::Char('c') => Some(Message::ToggleSidebar(SidebarPanel::Chat)),
        InputKey::Char('p') => Some(Message::ToggleSidebar(SidebarPanel::Participants)),
        InputKey::Esc => Some(Message::CloseSidebar),
        InputKey::Char('v') if state.mode.is_interactive() => {
            Some(change_to_next(state, DeviceKind::Camera))
        }
        InputKey::Char('m') if state.mode.is_interactive() => {
            Some(change_to_next(state, DeviceKind::Microphone))
        }
        _ => None,
    }
}

/// Keys typed while the chat panel is open edit the draft
fn handle_key_chat_input(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::CloseSidebar),
        InputKey::Enter => Some(Message::SendChat(state.chat_draft.clone())),
        InputKey::Backspace => {
            let mut draft = state.chat_draft.clone();
            draft.pop();
            Some(Message::SetChatDraft(draft))
        }
        InputKey::Char(c) => {
            let mut draft = state.chat_draft.clone();
            draft.push(c);
            Some(Message::SetChatDraft(draft))
        }
        _ => None,
    }
}

fn change_to_next(state: &AppState, kind: DeviceKind) -> Message {
    Message::ChangeDevice {
        kind,
        device: state.next_device(kind, &state.current_device(kind)),
    }
}

fn handle_key_left(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter | InputKey::Char('r') => Some(Message::ReturnToJoin),
        InputKey::Char('q') | InputKey::Esc => Some(Message::RequestQuit),
        _ => None,
    }
}
