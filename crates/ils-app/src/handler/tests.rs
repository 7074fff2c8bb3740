//! Tests for handler module

use std::time::Duration;

use serde_json::json;

use super::*;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::notices::SoundCue;
use crate::state::AppState;
use crate::view::{Screen, SidebarPanel};
use ils_core::{
    Broadcast, DeviceKind, DeviceRef, EntryDecision, HlsStatus, LifecyclePhase, Mode,
    RecordingStatus, SdkEvent, Severity, TrackId, Viewport, JOINING_ERROR_MESSAGE,
    TOPIC_CHANGE_MODE, TOPIC_CHAT, TOPIC_POLL, TOPIC_RAISE_HAND, TOPIC_REACTION,
};

const LOCAL: &str = "local-1";

fn tick(state: &mut AppState, ms: u64) -> UpdateResult {
    update(
        state,
        Message::Tick {
            now: Duration::from_millis(ms),
        },
    )
}

fn sdk(state: &mut AppState, event: SdkEvent) -> UpdateResult {
    update(state, Message::Sdk(event))
}

fn broadcast(topic: &str, sender_id: &str, sender_name: &str, message: &str) -> Broadcast {
    Broadcast {
        topic: topic.to_string(),
        sender_id: sender_id.to_string(),
        sender_name: sender_name.to_string(),
        message: message.to_string(),
        payload: json!({}),
    }
}

fn entry(participant_id: &str, decision: EntryDecision) -> SdkEvent {
    SdkEvent::EntryResponded {
        participant_id: participant_id.to_string(),
        decision,
    }
}

/// State with credentials filled in, still on the joining screen
fn filled_state() -> AppState {
    let mut state = AppState::new();
    update(&mut state, Message::SetToken("t1".to_string()));
    update(&mut state, Message::SetMeetingId("m1".to_string()));
    update(&mut state, Message::SetParticipantName("Ada".to_string()));
    state
}

/// State waiting for the host, with the session attached
fn waiting_state() -> AppState {
    let mut state = filled_state();
    update(&mut state, Message::StartMeeting);
    update(
        &mut state,
        Message::SessionAttached {
            local_participant_id: LOCAL.to_string(),
        },
    );
    state
}

fn joined_state() -> AppState {
    let mut state = waiting_state();
    sdk(&mut state, entry(LOCAL, EntryDecision::Allowed));
    assert_eq!(state.phase, LifecyclePhase::Joined);
    state
}

fn leave_count(result: &UpdateResult) -> usize {
    result
        .actions
        .iter()
        .filter(|a| **a == UpdateAction::LeaveSession)
        .count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_start_requests_join_and_waits() {
    let mut state = filled_state();

    let result = update(&mut state, Message::StartMeeting);

    assert_eq!(state.phase, LifecyclePhase::WaitingForEntry);
    assert_eq!(state.screen(), Screen::WaitingToJoin { entry_denied: false });
    match &result.actions[..] {
        [UpdateAction::JoinSession(request)] => {
            assert_eq!(request.meeting_id, "m1");
            assert_eq!(request.token, "t1");
            assert_eq!(request.name, "Ada");
        }
        other => panic!("unexpected actions: {:?}", other),
    }
}

#[test]
fn test_start_with_empty_token_stays_on_joining_screen() {
    let mut state = AppState::new();
    update(&mut state, Message::SetMeetingId("m1".to_string()));

    let result = update(&mut state, Message::StartMeeting);

    assert_eq!(state.phase, LifecyclePhase::NotStarted);
    assert!(state.join_error.is_some());
    assert!(result.actions.is_empty());
}

#[test]
fn test_start_with_blank_name_uses_default_name() {
    let mut state = AppState::new();
    update(&mut state, Message::SetToken("t1".to_string()));
    update(&mut state, Message::SetMeetingId("m1".to_string()));
    update(&mut state, Message::SetParticipantName("   ".to_string()));

    let result = update(&mut state, Message::StartMeeting);

    assert_eq!(state.config.participant_name, "TestUser");
    assert!(result.has_action(|a| matches!(
        a,
        UpdateAction::JoinSession(request) if request.name == "TestUser"
    )));
}

#[test]
fn test_start_ignored_outside_joining_screen() {
    let mut state = waiting_state();
    let result = update(&mut state, Message::StartMeeting);
    assert!(result.actions.is_empty());
    assert_eq!(state.phase, LifecyclePhase::WaitingForEntry);
}

#[test]
fn test_allowed_entry_joins_meeting() {
    let mut state = waiting_state();

    sdk(&mut state, entry(LOCAL, EntryDecision::Allowed));

    assert_eq!(state.phase, LifecyclePhase::Joined);
    assert!(matches!(state.screen(), Screen::InMeeting(_)));
}

#[test]
fn test_entry_response_for_remote_participant_is_ignored() {
    let mut state = waiting_state();

    sdk(&mut state, entry("p2", EntryDecision::Denied));
    assert_eq!(state.phase, LifecyclePhase::WaitingForEntry);

    sdk(&mut state, entry("p2", EntryDecision::Allowed));
    assert_eq!(state.phase, LifecyclePhase::WaitingForEntry);
}

#[test]
fn test_entry_response_before_attach_is_replayed() {
    let mut state = filled_state();
    update(&mut state, Message::StartMeeting);

    sdk(&mut state, entry(LOCAL, EntryDecision::Allowed));
    assert_eq!(state.phase, LifecyclePhase::WaitingForEntry);
    assert_eq!(state.pending_entry.len(), 1);

    update(
        &mut state,
        Message::SessionAttached {
            local_participant_id: LOCAL.to_string(),
        },
    );

    assert_eq!(state.phase, LifecyclePhase::Joined);
    assert!(state.pending_entry.is_empty());
}

#[test]
fn test_meeting_joined_without_entry_response_admits() {
    let mut state = waiting_state();
    sdk(&mut state, SdkEvent::MeetingJoined);
    assert_eq!(state.phase, LifecyclePhase::Joined);
}

#[test]
fn test_session_attached_after_leave_leaves_again() {
    let mut state = filled_state();
    update(&mut state, Message::StartMeeting);
    update(&mut state, Message::LeaveMeeting);
    assert_eq!(state.phase, LifecyclePhase::Left);

    let result = update(
        &mut state,
        Message::SessionAttached {
            local_participant_id: LOCAL.to_string(),
        },
    );

    assert_eq!(leave_count(&result), 1);
    assert_eq!(state.phase, LifecyclePhase::Left);
    assert!(state.local_participant_id.is_none());
}

#[test]
fn test_join_failure_is_handled_like_denial() {
    let mut state = filled_state();
    update(&mut state, Message::StartMeeting);

    update(
        &mut state,
        Message::JoinFailed {
            message: "invalid token".to_string(),
        },
    );

    assert_eq!(state.phase, LifecyclePhase::EntryDenied);
    assert!(state
        .join_error
        .as_deref()
        .is_some_and(|e| e.contains("invalid token")));
}

#[test]
fn test_denied_entry_leaves_after_delay() {
    let mut state = waiting_state();

    sdk(&mut state, entry(LOCAL, EntryDecision::Denied));
    assert_eq!(state.phase, LifecyclePhase::EntryDenied);
    assert_eq!(state.screen(), Screen::WaitingToJoin { entry_denied: true });

    let result = tick(&mut state, 2999);
    assert_eq!(state.phase, LifecyclePhase::EntryDenied);
    assert!(result.actions.is_empty());

    let result = tick(&mut state, 3000);
    assert_eq!(state.phase, LifecyclePhase::Left);
    assert_eq!(leave_count(&result), 1);
    assert!(state.config.is_cleared());
}

#[test]
fn test_teardown_cancels_denial_timer() {
    let mut state = waiting_state();
    sdk(&mut state, entry(LOCAL, EntryDecision::Denied));

    update(&mut state, Message::Teardown);
    tick(&mut state, 10_000);

    assert_eq!(state.phase, LifecyclePhase::EntryDenied);
    assert!(state.timers.is_empty());
}

#[test]
fn test_leave_during_denial_sends_leave_once() {
    let mut state = waiting_state();
    sdk(&mut state, entry(LOCAL, EntryDecision::Denied));

    let result = update(&mut state, Message::LeaveMeeting);
    assert_eq!(leave_count(&result), 1);
    assert_eq!(state.phase, LifecyclePhase::Left);

    let result = tick(&mut state, 3000);
    assert_eq!(leave_count(&result), 0);
}

#[test]
fn test_leave_clears_config_and_sends_leave_once() {
    let mut state = joined_state();

    let result = update(&mut state, Message::LeaveMeeting);

    assert_eq!(state.phase, LifecyclePhase::Left);
    assert_eq!(state.screen(), Screen::Leave);
    assert_eq!(leave_count(&result), 1);
    assert!(state.config.is_cleared());
    assert!(!state.config.mic_on);
    assert!(!state.config.webcam_on);

    let result = sdk(&mut state, SdkEvent::MeetingLeft);
    assert_eq!(leave_count(&result), 0);
    let result = update(&mut state, Message::LeaveMeeting);
    assert_eq!(leave_count(&result), 0);
    let result = update(&mut state, Message::Quit);
    assert_eq!(leave_count(&result), 0);
}

#[test]
fn test_meeting_left_by_sdk_does_not_send_leave() {
    let mut state = joined_state();

    let result = sdk(&mut state, SdkEvent::MeetingLeft);

    assert_eq!(state.phase, LifecyclePhase::Left);
    assert_eq!(leave_count(&result), 0);
}

#[test]
fn test_bridge_exit_ends_meeting() {
    let mut state = joined_state();
    update(&mut state, Message::BridgeExited { code: Some(1) });
    assert_eq!(state.phase, LifecyclePhase::Left);
}

#[test]
fn test_return_to_join_resets_meeting() {
    let mut state = joined_state();
    update(&mut state, Message::LeaveMeeting);

    let result = update(&mut state, Message::ReturnToJoin);

    assert_eq!(state.phase, LifecyclePhase::NotStarted);
    assert_eq!(state.screen(), Screen::Joining);
    assert!(!state.leave_sent);
    assert!(result.has_action(|a| *a == UpdateAction::EnumerateDevices));
}

#[test]
fn test_config_edits_ignored_after_start() {
    let mut state = joined_state();

    update(&mut state, Message::SetToken("other".to_string()));
    update(&mut state, Message::SetMeetingId("other".to_string()));
    update(&mut state, Message::ToggleMic);
    update(&mut state, Message::SetJoinMode(Mode::BroadcastOnly));

    assert_eq!(state.config.token, "t1");
    assert_eq!(state.config.meeting_id, "m1");
    assert!(state.config.mic_on);
    assert_eq!(state.config.mode, Mode::Interactive);
}

#[test]
fn test_participant_joined_requests_high_quality() {
    let mut state = joined_state();

    let result = sdk(
        &mut state,
        SdkEvent::ParticipantJoined {
            participant_id: "p2".to_string(),
            name: "Grace".to_string(),
        },
    );

    assert_eq!(state.participant_name("p2"), Some("Grace"));
    assert!(result.has_action(|a| matches!(
        a,
        UpdateAction::SetParticipantQuality { participant_id, quality: ils_sdk::Quality::High }
            if participant_id == "p2"
    )));
}

#[test]
fn test_participant_left_clears_hand_and_presenter() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::ParticipantJoined {
            participant_id: "p2".to_string(),
            name: "Grace".to_string(),
        },
    );
    sdk(
        &mut state,
        SdkEvent::PresenterChanged {
            presenter_id: Some("p2".to_string()),
        },
    );
    sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_RAISE_HAND, "p2", "Grace", "Raise Hand")),
    );
    assert!(state.is_presenting());
    assert!(state.has_raised_hand("p2"));

    sdk(
        &mut state,
        SdkEvent::ParticipantLeft {
            participant_id: "p2".to_string(),
        },
    );

    assert!(!state.is_presenting());
    assert!(!state.has_raised_hand("p2"));
    assert!(state.participant_name("p2").is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Quit and leave guard
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_request_quit_on_desktop_quits_immediately() {
    let mut state = joined_state();

    let result = update(&mut state, Message::RequestQuit);

    assert!(state.confirm_dialog.is_none());
    assert!(matches!(result.message, Some(Message::Quit)));
}

#[test]
fn test_request_quit_on_mobile_shows_leave_guard() {
    let mut state = joined_state();
    update(&mut state, Message::ViewportResized(Viewport::new(375, 800)));

    let result = update(&mut state, Message::RequestQuit);
    assert!(state.confirm_dialog.is_some());
    assert!(result.message.is_none());

    let msg = handle_key(&state, InputKey::Char('y'));
    assert!(matches!(msg, Some(Message::ConfirmQuit)));

    let result = update(&mut state, Message::ConfirmQuit);
    assert!(state.confirm_dialog.is_none());
    let quit = result.message.expect("follow-up quit");

    let result = update(&mut state, quit);
    assert!(state.should_quit());
    assert_eq!(leave_count(&result), 1);
}

#[test]
fn test_leave_guard_cancel_keeps_meeting() {
    let mut state = joined_state();
    update(&mut state, Message::ViewportResized(Viewport::new(375, 800)));
    update(&mut state, Message::RequestQuit);

    let msg = handle_key(&state, InputKey::Esc).expect("cancel message");
    update(&mut state, msg);

    assert!(state.confirm_dialog.is_none());
    assert!(!state.should_quit());
    assert_eq!(state.phase, LifecyclePhase::Joined);
}

#[test]
fn test_request_quit_on_mobile_before_join_quits() {
    let mut state = AppState::new();
    update(&mut state, Message::ViewportResized(Viewport::new(375, 800)));

    let result = update(&mut state, Message::RequestQuit);

    assert!(state.confirm_dialog.is_none());
    assert!(matches!(result.message, Some(Message::Quit)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Notifications
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_joining_error_shows_modal_and_ends_join() {
    let mut state = waiting_state();

    let result = sdk(
        &mut state,
        SdkEvent::Error {
            code: 4001,
            message: "token expired".to_string(),
        },
    );

    let notice = state.error_notice.as_ref().expect("error modal");
    assert_eq!(notice.message, JOINING_ERROR_MESSAGE);
    assert_eq!(notice.severity, Severity::Normal);
    assert_eq!(state.phase, LifecyclePhase::EntryDenied);
    assert_eq!(
        result.actions,
        vec![UpdateAction::PlaySound(SoundCue::Error)]
    );
}

#[test]
fn test_critical_error_plays_critical_cue() {
    let mut state = joined_state();

    let result = sdk(
        &mut state,
        SdkEvent::Error {
            code: 5002,
            message: "media server failure".to_string(),
        },
    );

    let notice = state.error_notice.as_ref().expect("error modal");
    assert_eq!(notice.message, "media server failure");
    assert_eq!(notice.severity, Severity::Critical);
    assert_eq!(state.phase, LifecyclePhase::Joined);
    assert_eq!(
        result.actions,
        vec![UpdateAction::PlaySound(SoundCue::CriticalError)]
    );
}

#[test]
fn test_newer_error_replaces_modal() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::Error {
            code: 3001,
            message: "first".to_string(),
        },
    );
    sdk(
        &mut state,
        SdkEvent::Error {
            code: 3002,
            message: "second".to_string(),
        },
    );

    assert_eq!(state.error_notice.as_ref().map(|n| n.code), Some(3002));

    let msg = handle_key(&state, InputKey::Enter).expect("acknowledge");
    update(&mut state, msg);
    assert!(state.error_notice.is_none());
}

#[test]
fn test_error_modal_shown_in_broadcast_only_mode() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::ParticipantModeChanged {
            participant_id: LOCAL.to_string(),
            mode: "VIEWER".to_string(),
        },
    );

    let result = sdk(
        &mut state,
        SdkEvent::Error {
            code: 3001,
            message: "oops".to_string(),
        },
    );

    assert!(state.error_notice.is_some());
    assert_eq!(result.actions.len(), 1);
}

#[test]
fn test_recording_toast_dismissed_after_auto_close() {
    let mut state = joined_state();

    let result = sdk(
        &mut state,
        SdkEvent::RecordingStateChanged {
            status: RecordingStatus::Started,
        },
    );

    assert_eq!(
        result.actions,
        vec![UpdateAction::PlaySound(SoundCue::Notification)]
    );
    let texts: Vec<_> = state.notices.iter().map(|n| n.text.clone()).collect();
    assert_eq!(texts, vec!["Meeting recording is started."]);

    tick(&mut state, 3999);
    assert_eq!(state.notices.len(), 1);
    tick(&mut state, 4000);
    assert!(state.notices.is_empty());
}

#[test]
fn test_transitional_recording_states_are_silent() {
    let mut state = joined_state();

    let result = sdk(
        &mut state,
        SdkEvent::RecordingStateChanged {
            status: RecordingStatus::Starting,
        },
    );

    assert!(result.actions.is_empty());
    assert!(state.notices.is_empty());
    assert_eq!(state.recording, Some(RecordingStatus::Starting));
}

#[test]
fn test_toasts_suppressed_in_broadcast_only_mode() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::ParticipantModeChanged {
            participant_id: LOCAL.to_string(),
            mode: "VIEWER".to_string(),
        },
    );
    assert_eq!(state.mode, Mode::BroadcastOnly);

    let hls = sdk(
        &mut state,
        SdkEvent::HlsStateChanged {
            status: HlsStatus::Started,
            downstream_url: None,
        },
    );
    let hand = sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_RAISE_HAND, "p2", "Grace", "Raise Hand")),
    );
    let chat = sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_CHAT, "p2", "Grace", "hello")),
    );

    assert!(hls.actions.is_empty());
    assert!(hand.actions.is_empty());
    assert!(chat.actions.is_empty());
    assert!(state.notices.is_empty());

    // State behind the toasts is still recorded
    assert_eq!(
        state.hls.after_join,
        Some(crate::view::HlsAfterJoin::Started)
    );
    assert!(state.has_raised_hand("p2"));
    assert_eq!(state.chat.len(), 1);
}

#[test]
fn test_raise_hand_toast_names_sender() {
    let mut state = joined_state();

    sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(
            TOPIC_RAISE_HAND,
            "p2",
            "Bartholomew Featherstonehaugh",
            "Raise Hand",
        )),
    );
    sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_RAISE_HAND, LOCAL, "Ada", "Raise Hand")),
    );

    let texts: Vec<_> = state.notices.iter().map(|n| n.text.clone()).collect();
    assert_eq!(
        texts,
        vec!["Bartholomew ... raised hand 🖐🏼", "You raised hand 🖐🏼"]
    );
}

#[test]
fn test_raised_hand_expires() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_RAISE_HAND, "p2", "Grace", "Raise Hand")),
    );

    tick(&mut state, 14_999);
    assert!(state.has_raised_hand("p2"));
    tick(&mut state, 15_000);
    assert!(!state.has_raised_hand("p2"));
}

#[test]
fn test_repeated_raise_hand_restarts_expiry() {
    let mut state = joined_state();
    let hand = || SdkEvent::PubSub(broadcast(TOPIC_RAISE_HAND, "p2", "Grace", "Raise Hand"));

    sdk(&mut state, hand());
    tick(&mut state, 10_000);
    sdk(&mut state, hand());

    tick(&mut state, 15_000);
    assert!(state.has_raised_hand("p2"));
    tick(&mut state, 25_000);
    assert!(!state.has_raised_hand("p2"));
}

#[test]
fn test_local_chat_is_recorded_without_toast() {
    let mut state = joined_state();

    let result = sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_CHAT, LOCAL, "Ada", "hi all")),
    );

    assert!(result.actions.is_empty());
    assert!(state.notices.is_empty());
    assert_eq!(state.chat.back().map(|l| l.message.as_str()), Some("hi all"));
}

#[test]
fn test_remote_chat_toast_is_trimmed() {
    let mut state = joined_state();
    let long = "this message is long enough to overflow the snackbar width";

    sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_CHAT, "p2", "Grace", long)),
    );

    let notice = state.notices.iter().next().expect("chat toast");
    assert!(notice.text.starts_with("Grace says: this message"));
    assert!(notice.text.ends_with("..."));
    assert_eq!(notice.text.chars().count(), ils_core::SNACKBAR_DISPLAY_LEN);
}

fn poll_event(id: &str, question: &str, timeout: Option<u64>) -> SdkEvent {
    let mut poll = broadcast(TOPIC_POLL, "host", "Host", "");
    poll.payload = json!({
        "id": id,
        "question": question,
        "options": ["Yes", "No"],
        "timeout": timeout,
    });
    SdkEvent::PubSub(poll)
}

fn reaction_event(sender_name: &str, emoji: &str) -> SdkEvent {
    SdkEvent::PubSub(broadcast(TOPIC_REACTION, "p2", sender_name, emoji))
}

#[test]
fn test_poll_toasts_in_interactive_mode() {
    let mut state = joined_state();

    let result = sdk(&mut state, poll_event("poll-1", "Ship it?", None));

    assert_eq!(
        result.actions,
        vec![UpdateAction::PlaySound(SoundCue::Notification)]
    );
    let texts: Vec<_> = state.notices.iter().map(|n| n.text.clone()).collect();
    assert_eq!(texts, vec!["New poll: Ship it?"]);
    assert_eq!(state.polls.len(), 1);
    assert_eq!(state.polls[0].poll.options, vec!["Yes", "No"]);
    assert_eq!(state.polls[0].sender_name, "Host");
}

#[test]
fn test_poll_recorded_without_toast_in_broadcast_only_mode() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::ParticipantModeChanged {
            participant_id: LOCAL.to_string(),
            mode: "VIEWER".to_string(),
        },
    );

    let result = sdk(&mut state, poll_event("poll-1", "Ship it?", None));

    assert!(result.actions.is_empty());
    assert!(state.notices.is_empty());
    assert_eq!(state.polls.len(), 1);
}

#[test]
fn test_poll_before_entry_is_ignored() {
    let mut state = waiting_state();
    let result = sdk(&mut state, poll_event("poll-1", "Ship it?", None));
    assert!(result.actions.is_empty());
    assert!(state.polls.is_empty());
}

#[test]
fn test_poll_closes_after_timeout() {
    let mut state = joined_state();
    sdk(&mut state, poll_event("poll-1", "Ship it?", Some(30)));
    sdk(&mut state, poll_event("poll-2", "Open ended?", None));

    tick(&mut state, 29_999);
    assert_eq!(state.polls.len(), 2);
    tick(&mut state, 30_000);
    let open: Vec<_> = state.polls.iter().map(|p| p.poll.id.as_str()).collect();
    assert_eq!(open, vec!["poll-2"]);
}

#[test]
fn test_reaction_floats_until_ttl_in_any_mode() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::ParticipantModeChanged {
            participant_id: LOCAL.to_string(),
            mode: "VIEWER".to_string(),
        },
    );

    let result = sdk(&mut state, reaction_event("Grace", "clap"));
    tick(&mut state, 1000);
    sdk(&mut state, reaction_event("Linus", "🔥"));

    assert!(result.actions.is_empty());
    assert!(state.notices.is_empty());
    let floating: Vec<_> = state.reactions.iter().map(|r| r.emoji.as_str()).collect();
    assert_eq!(floating, vec!["👏", "🔥"]);

    tick(&mut state, 2500);
    let floating: Vec<_> = state.reactions.iter().map(|r| r.emoji.as_str()).collect();
    assert_eq!(floating, vec!["🔥"]);
    tick(&mut state, 3500);
    assert!(state.reactions.is_empty());
}

#[test]
fn test_leave_clears_polls_and_reactions() {
    let mut state = joined_state();
    sdk(&mut state, poll_event("poll-1", "Ship it?", Some(60)));
    sdk(&mut state, reaction_event("Grace", "heart"));

    update(&mut state, Message::LeaveMeeting);

    assert_eq!(state.phase, LifecyclePhase::Left);
    assert!(state.polls.is_empty());
    assert!(state.reactions.is_empty());
    // Only the poll toast dismissal survives
    assert_eq!(state.timers.len(), 1);
}

#[test]
fn test_unknown_topic_is_ignored() {
    let mut state = joined_state();
    let result = sdk(
        &mut state,
        SdkEvent::PubSub(broadcast("WHITEBOARD", "p2", "Grace", "yes")),
    );
    assert!(result.actions.is_empty());
    assert!(state.notices.is_empty());
}

#[test]
fn test_local_raise_hand_publishes() {
    let mut state = joined_state();

    let result = update(&mut state, Message::RaiseHand);

    assert_eq!(
        result.actions,
        vec![UpdateAction::Publish {
            topic: TOPIC_RAISE_HAND.to_string(),
            message: "Raise Hand".to_string(),
        }]
    );
}

#[test]
fn test_send_chat_publishes_and_clears_draft() {
    let mut state = joined_state();
    update(&mut state, Message::SetChatDraft("  hello  ".to_string()));

    let draft = state.chat_draft.clone();
    let result = update(&mut state, Message::SendChat(draft));

    assert!(state.chat_draft.is_empty());
    assert_eq!(
        result.actions,
        vec![UpdateAction::Publish {
            topic: TOPIC_CHAT.to_string(),
            message: "hello".to_string(),
        }]
    );

    let result = update(&mut state, Message::SendChat("   ".to_string()));
    assert!(result.actions.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode listener
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_join_mode_applied_on_start() {
    let mut state = filled_state();
    update(&mut state, Message::SetJoinMode(Mode::BroadcastOnly));

    update(&mut state, Message::StartMeeting);

    assert_eq!(state.mode, Mode::BroadcastOnly);
}

#[test]
fn test_change_mode_broadcast_updates_mode() {
    let mut state = joined_state();
    let revision = state.mode_revision;

    sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_CHANGE_MODE, "host", "Host", "VIEWER")),
    );

    assert_eq!(state.mode, Mode::BroadcastOnly);
    assert_eq!(state.mode_revision, revision + 1);
    assert!(matches!(
        state.screen(),
        Screen::InMeeting(layout) if layout.mode == Mode::BroadcastOnly
    ));

    // Same value again does not bump the revision
    sdk(
        &mut state,
        SdkEvent::PubSub(broadcast(TOPIC_CHANGE_MODE, "host", "Host", "VIEWER")),
    );
    assert_eq!(state.mode_revision, revision + 1);
}

#[test]
fn test_change_mode_for_other_participant_is_ignored() {
    let mut state = joined_state();
    let mut message = broadcast(TOPIC_CHANGE_MODE, "host", "Host", "");
    message.payload = json!({"mode": "VIEWER", "participantId": "p2"});

    sdk(&mut state, SdkEvent::PubSub(message));

    assert_eq!(state.mode, Mode::Interactive);
}

#[test]
fn test_unknown_mode_value_is_ignored() {
    let mut state = joined_state();
    let revision = state.mode_revision;

    sdk(
        &mut state,
        SdkEvent::ParticipantModeChanged {
            participant_id: LOCAL.to_string(),
            mode: "HOLOGRAM".to_string(),
        },
    );

    assert_eq!(state.mode, Mode::Interactive);
    assert_eq!(state.mode_revision, revision);
}

#[test]
fn test_mode_change_for_remote_participant_is_ignored() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::ParticipantModeChanged {
            participant_id: "p2".to_string(),
            mode: "VIEWER".to_string(),
        },
    );
    assert_eq!(state.mode, Mode::Interactive);
}

// ─────────────────────────────────────────────────────────────────────────────
// Device reconciliation
// ─────────────────────────────────────────────────────────────────────────────

fn disable_seq(result: &UpdateResult, kind: DeviceKind) -> u64 {
    result
        .actions
        .iter()
        .find_map(|a| match a {
            UpdateAction::DisableDevice { kind: k, seq } if *k == kind => Some(*seq),
            _ => None,
        })
        .expect("disable action")
}

/// Admit a waiting state and return the admission result
fn admit(state: &mut AppState) -> UpdateResult {
    sdk(state, entry(LOCAL, EntryDecision::Allowed))
}

#[test]
fn test_default_devices_are_not_reconciled() {
    let mut state = waiting_state();
    let result = admit(&mut state);
    assert!(result.actions.is_empty());
    assert!(state.devices.is_idle());
}

#[test]
fn test_disabled_device_is_not_reconciled() {
    let mut state = filled_state();
    update(&mut state, Message::ToggleWebcam);
    update(
        &mut state,
        Message::SelectDevice {
            kind: DeviceKind::Camera,
            device: DeviceRef::new("cam-2", "USB Camera"),
        },
    );
    update(&mut state, Message::StartMeeting);
    update(
        &mut state,
        Message::SessionAttached {
            local_participant_id: LOCAL.to_string(),
        },
    );

    let result = admit(&mut state);

    assert!(result.actions.is_empty());
}

#[test]
fn test_reconciliation_runs_steps_in_order() {
    let mut state = filled_state();
    let device = DeviceRef::new("cam-2", "USB Camera");
    update(
        &mut state,
        Message::SelectDevice {
            kind: DeviceKind::Camera,
            device: device.clone(),
        },
    );
    update(&mut state, Message::StartMeeting);
    update(
        &mut state,
        Message::SessionAttached {
            local_participant_id: LOCAL.to_string(),
        },
    );

    let result = admit(&mut state);
    assert_eq!(result.actions.len(), 1);
    let seq = disable_seq(&result, DeviceKind::Camera);

    // Disabled: settle timer starts, nothing acquired yet
    let result = update(
        &mut state,
        Message::DeviceDisabled {
            kind: DeviceKind::Camera,
            seq,
        },
    );
    assert!(result.actions.is_empty());
    assert!(tick(&mut state, 499).actions.is_empty());

    let result = tick(&mut state, 500);
    assert_eq!(
        result.actions,
        vec![UpdateAction::AcquireDevice {
            kind: DeviceKind::Camera,
            seq,
            device: device.clone(),
        }]
    );

    let track = TrackId("camera-track-1".to_string());
    let result = update(
        &mut state,
        Message::DeviceAcquired {
            kind: DeviceKind::Camera,
            seq,
            track: track.clone(),
        },
    );
    assert_eq!(
        result.actions,
        vec![UpdateAction::ApplyTrack {
            kind: DeviceKind::Camera,
            seq,
            track,
        }]
    );

    update(
        &mut state,
        Message::DeviceApplied {
            kind: DeviceKind::Camera,
            seq,
        },
    );
    assert_eq!(state.active_devices.get(&DeviceKind::Camera), Some(&device));
    assert_eq!(state.device_outcomes, 1);
    assert!(state.devices.is_idle());
}

#[test]
fn test_failed_step_moves_to_queued_request() {
    let mut state = filled_state();
    update(
        &mut state,
        Message::SelectDevice {
            kind: DeviceKind::Microphone,
            device: DeviceRef::new("mic-2", "Headset"),
        },
    );
    update(&mut state, Message::StartMeeting);
    update(
        &mut state,
        Message::SessionAttached {
            local_participant_id: LOCAL.to_string(),
        },
    );
    let first = disable_seq(&admit(&mut state), DeviceKind::Microphone);

    let result = update(
        &mut state,
        Message::ChangeDevice {
            kind: DeviceKind::Microphone,
            device: DeviceRef::new("mic-3", "Desk Mic"),
        },
    );
    assert!(result.actions.is_empty());
    assert_eq!(state.devices.queued(DeviceKind::Microphone), 1);

    let result = update(
        &mut state,
        Message::DeviceStepFailed {
            kind: DeviceKind::Microphone,
            seq: first,
            error: "busy".to_string(),
        },
    );

    let outcome = state.last_device_outcome.as_ref().expect("outcome");
    assert_eq!(outcome.error.as_deref(), Some("busy"));
    assert_eq!(state.phase, LifecyclePhase::Joined);
    let second = disable_seq(&result, DeviceKind::Microphone);
    assert_ne!(first, second);
    assert_eq!(
        state.devices.target(DeviceKind::Microphone),
        Some(&DeviceRef::new("mic-3", "Desk Mic"))
    );
}

#[test]
fn test_stale_device_results_are_ignored() {
    let mut state = joined_state();
    let result = update(
        &mut state,
        Message::ChangeDevice {
            kind: DeviceKind::Camera,
            device: DeviceRef::new("cam-2", "USB Camera"),
        },
    );
    let seq = disable_seq(&result, DeviceKind::Camera);

    update(&mut state, Message::LeaveMeeting);
    let result = update(
        &mut state,
        Message::DeviceDisabled {
            kind: DeviceKind::Camera,
            seq,
        },
    );

    assert!(result.actions.is_empty());
    assert!(state.timers.is_empty());
}

#[test]
fn test_change_device_ignored_before_join() {
    let mut state = waiting_state();
    let result = update(
        &mut state,
        Message::ChangeDevice {
            kind: DeviceKind::Camera,
            device: DeviceRef::new("cam-2", "USB Camera"),
        },
    );
    assert!(result.actions.is_empty());
    assert!(state.devices.is_idle());
}

// ─────────────────────────────────────────────────────────────────────────────
// Keys
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_typing_edits_focused_field() {
    let mut state = AppState::new();

    let msg = handle_key(&state, InputKey::Char('a'));
    assert!(matches!(msg, Some(Message::SetToken(ref v)) if v == "a"));

    let next = state.join_focus.next();
    update(&mut state, Message::FocusJoinField(next));
    let msg = handle_key(&state, InputKey::Char('m'));
    assert!(matches!(msg, Some(Message::SetMeetingId(ref v)) if v == "m"));
}

#[test]
fn test_backspace_on_empty_field_does_nothing() {
    let state = AppState::new();
    assert!(handle_key(&state, InputKey::Backspace).is_none());
}

#[test]
fn test_enter_on_joining_screen_starts_meeting() {
    let state = filled_state();
    assert!(matches!(
        handle_key(&state, InputKey::Enter),
        Some(Message::StartMeeting)
    ));
}

#[test]
fn test_meeting_keys() {
    let state = joined_state();

    assert!(matches!(
        handle_key(&state, InputKey::Char('h')),
        Some(Message::RaiseHand)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('l')),
        Some(Message::LeaveMeeting)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('c')),
        Some(Message::ToggleSidebar(SidebarPanel::Chat))
    ));
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::RequestQuit)
    ));
}

#[test]
fn test_chat_sidebar_captures_typing() {
    let mut state = joined_state();
    update(&mut state, Message::ToggleSidebar(SidebarPanel::Chat));

    let msg = handle_key(&state, InputKey::Char('h'));
    assert!(matches!(msg, Some(Message::SetChatDraft(ref d)) if d == "h"));

    update(&mut state, Message::SetChatDraft("hey".to_string()));
    let msg = handle_key(&state, InputKey::Enter);
    assert!(matches!(msg, Some(Message::SendChat(ref d)) if d == "hey"));
}

#[test]
fn test_device_keys_only_in_interactive_mode() {
    let mut state = joined_state();
    assert!(matches!(
        handle_key(&state, InputKey::Char('v')),
        Some(Message::ChangeDevice {
            kind: DeviceKind::Camera,
            ..
        })
    ));

    sdk(
        &mut state,
        SdkEvent::ParticipantModeChanged {
            participant_id: LOCAL.to_string(),
            mode: "VIEWER".to_string(),
        },
    );
    assert!(handle_key(&state, InputKey::Char('v')).is_none());
}

#[test]
fn test_error_modal_takes_keys_first() {
    let mut state = joined_state();
    sdk(
        &mut state,
        SdkEvent::Error {
            code: 3001,
            message: "oops".to_string(),
        },
    );

    assert!(handle_key(&state, InputKey::Char('h')).is_none());
    assert!(matches!(
        handle_key(&state, InputKey::Esc),
        Some(Message::AcknowledgeError)
    ));
}

#[test]
fn test_key_message_is_routed_through_update() {
    let mut state = AppState::new();

    let result = update(&mut state, Message::Key(InputKey::Char('x')));

    assert!(matches!(result.message, Some(Message::SetToken(ref v)) if v == "x"));
}

#[test]
fn test_left_screen_keys() {
    let mut state = joined_state();
    update(&mut state, Message::LeaveMeeting);

    assert!(matches!(
        handle_key(&state, InputKey::Enter),
        Some(Message::ReturnToJoin)
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('q')),
        Some(Message::RequestQuit)
    ));
}
