//! Full-screen rendering tests for each composed screen

use std::time::Duration;

use ils_app::confirm_dialog::ConfirmDialogState;
use ils_app::notices::SoundCue;
use ils_app::state::AppState;
use ils_app::view::SidebarPanel;
use ils_core::{ErrorNotice, HlsStatus, LifecyclePhase, Mode, Participant};

use super::view;
use crate::terminal::viewport_from_cells;
use crate::test_utils::TestTerminal;

fn state_for(term: &TestTerminal, phase: LifecyclePhase) -> AppState {
    let mut state = AppState::new();
    let area = term.area();
    state.viewport = viewport_from_cells(area.width, area.height, &state.settings.ui);
    state.phase = phase;
    state.config.meeting_id = "abcd-efgh".to_string();
    state.config.participant_name = "Ann".to_string();
    if phase == LifecyclePhase::Joined {
        state.local_participant_id = Some("local-1".to_string());
        state.participants.push(Participant {
            id: "p2".to_string(),
            name: "Bob".to_string(),
        });
    }
    state
}

#[test]
fn test_joining_screen() {
    let mut term = TestTerminal::new();
    let state = state_for(&term, LifecyclePhase::NotStarted);
    term.draw_with(|f| view(f, &state));

    assert!(term.buffer_contains("Join Meeting"));
    assert!(term.buffer_contains("abcd-efgh"));
}

#[test]
fn test_waiting_and_denied_screens() {
    let mut term = TestTerminal::new();
    let state = state_for(&term, LifecyclePhase::WaitingForEntry);
    term.draw_with(|f| view(f, &state));
    assert!(term.buffer_contains("Waiting for the host to let you in"));

    let state = state_for(&term, LifecyclePhase::EntryDenied);
    term.draw_with(|f| view(f, &state));
    assert!(term.buffer_contains("denied"));
}

#[test]
fn test_leave_screen() {
    let mut term = TestTerminal::new();
    let state = state_for(&term, LifecyclePhase::Left);
    term.draw_with(|f| view(f, &state));
    assert!(term.buffer_contains("You left the meeting!"));
}

#[test]
fn test_interactive_meeting_desktop() {
    let mut term = TestTerminal::new();
    let state = state_for(&term, LifecyclePhase::Joined);
    term.draw_with(|f| view(f, &state));

    assert!(term.buffer_contains("Meeting abcd-efgh"));
    assert!(term.buffer_contains("You (Ann)"));
    assert!(term.buffer_contains("Bob"));
    assert!(term.buffer_contains("next camera"));
}

#[test]
fn test_interactive_meeting_mobile_hides_top_bar() {
    let mut term = TestTerminal::compact();
    let state = state_for(&term, LifecyclePhase::Joined);
    term.draw_with(|f| view(f, &state));

    assert!(!term.buffer_contains("Meeting abcd-efgh"));
    assert!(term.buffer_contains("You (Ann)"));
}

#[test]
fn test_presenter_pane_shown_while_presenting() {
    let mut term = TestTerminal::new();
    let mut state = state_for(&term, LifecyclePhase::Joined);
    state.presenter_id = Some("p2".to_string());
    term.draw_with(|f| view(f, &state));

    assert!(term.buffer_contains("Bob is presenting"));
}

#[test]
fn test_broadcast_only_shows_stream_viewer() {
    let mut term = TestTerminal::new();
    let mut state = state_for(&term, LifecyclePhase::Joined);
    state.mode = Mode::BroadcastOnly;
    term.draw_with(|f| view(f, &state));

    assert!(term.buffer_contains("Waiting for host to start live stream."));
    assert!(!term.buffer_contains("You (Ann)"));

    state
        .hls
        .update(HlsStatus::Playable, Some("https://cdn.example/a.m3u8".to_string()));
    term.draw_with(|f| view(f, &state));
    assert!(term.buffer_contains("https://cdn.example/a.m3u8"));
}

#[test]
fn test_sidebar_rendered_beside_stage() {
    let mut term = TestTerminal::new();
    let mut state = state_for(&term, LifecyclePhase::Joined);
    state.sidebar = Some(SidebarPanel::Participants);
    term.draw_with(|f| view(f, &state));

    assert!(term.buffer_contains("Participants (2)"));
}

#[test]
fn test_toasts_render_over_meeting() {
    let mut term = TestTerminal::new();
    let mut state = state_for(&term, LifecyclePhase::Joined);
    state
        .notices
        .push("Bob raised hand 🖐🏼", SoundCue::Notification, Duration::from_secs(4));
    term.draw_with(|f| view(f, &state));

    assert!(term.buffer_contains("Bob raised hand"));
}

#[test]
fn test_error_modal_over_any_screen() {
    let mut term = TestTerminal::new();
    let mut state = state_for(&term, LifecyclePhase::WaitingForEntry);
    state.error_notice = Some(ErrorNotice::classify(4003, "raw"));
    term.draw_with(|f| view(f, &state));

    assert!(term.buffer_contains("Error Code: 4003"));
    assert!(term.buffer_contains("Unable to join meeting!"));
}

#[test]
fn test_leave_confirmation_dialog() {
    let mut term = TestTerminal::compact();
    let mut state = state_for(&term, LifecyclePhase::Joined);
    state.confirm_dialog = Some(ConfirmDialogState::leave_confirmation());
    term.draw_with(|f| view(f, &state));

    assert!(term.buffer_contains("Leave meeting?"));
}
