//! Notification dispatcher: toasts, sound cues and the error modal
//!
//! Toasts for recording, streaming, hand raises, chat and polls are shown
//! only in interactive mode. The state behind them is recorded in every mode.
//! Reactions never toast; they float over the stage until their timer fires.

use std::time::Duration;

use chrono::Local;

use ils_core::prelude::*;
use ils_core::{
    is_joining_error, reaction_glyph, trim_snackbar_text, truncate_name, Broadcast, ChatLine,
    ErrorNotice, HlsStatus, LifecyclePhase, Poll, RecordingStatus, NAME_DISPLAY_LEN, TOPIC_CHAT,
    TOPIC_RAISE_HAND,
};

use crate::notices::SoundCue;
use crate::scheduler::TimerKind;
use crate::state::{ActivePoll, AppState, RaisedHand};

use super::{lifecycle, UpdateAction, UpdateResult};

/// Payload published with a local hand raise
const RAISE_HAND_MESSAGE: &str = "Raise Hand";

/// Push a toast, schedule its dismissal and return its sound cue
fn show_toast(state: &mut AppState, text: String, sound: SoundCue) -> UpdateAction {
    let auto_close = state.settings.timing.notice_auto_close();
    let id = state.notices.push(text, sound, auto_close).id;
    state
        .timers
        .schedule(auto_close, TimerKind::NoticeDismiss(id));
    UpdateAction::PlaySound(sound)
}

fn toast_if_interactive(state: &mut AppState, text: impl Into<String>) -> UpdateResult {
    if !state.mode.is_interactive() {
        return UpdateResult::none();
    }
    UpdateResult::action(show_toast(state, text.into(), SoundCue::Notification))
}

pub(crate) fn handle_recording(state: &mut AppState, status: RecordingStatus) -> UpdateResult {
    state.recording = Some(status);
    match status {
        RecordingStatus::Started => toast_if_interactive(state, "Meeting recording is started."),
        RecordingStatus::Stopped => toast_if_interactive(state, "Meeting recording is stopped."),
        _ => UpdateResult::none(),
    }
}

pub(crate) fn handle_hls(
    state: &mut AppState,
    status: HlsStatus,
    downstream_url: Option<String>,
) -> UpdateResult {
    state.hls.update(status, downstream_url);
    match status {
        HlsStatus::Started => toast_if_interactive(state, "Meeting HLS is started."),
        HlsStatus::Stopped => toast_if_interactive(state, "Meeting HLS is stopped."),
        _ => UpdateResult::none(),
    }
}

pub(crate) fn handle_raise_hand(state: &mut AppState, broadcast: &Broadcast) -> UpdateResult {
    let sender = broadcast.sender_id.clone();

    state.raised_hands.retain(|h| h.participant_id != sender);
    state.timers.cancel_where(
        |k| matches!(k, TimerKind::RaisedHandExpiry(id) if *id == sender),
    );
    state.raised_hands.push(RaisedHand {
        participant_id: sender.clone(),
        raised_at: state.timers.now(),
    });
    let ttl = state.settings.timing.raised_hand_ttl();
    state
        .timers
        .schedule(ttl, TimerKind::RaisedHandExpiry(sender.clone()));

    let who = if state.is_local(&sender) {
        "You".to_string()
    } else {
        truncate_name(&broadcast.sender_name, NAME_DISPLAY_LEN)
    };
    toast_if_interactive(state, format!("{} raised hand 🖐🏼", who))
}

pub(crate) fn handle_chat(
    state: &mut AppState,
    broadcast: &Broadcast,
    message: &str,
) -> UpdateResult {
    state.push_chat(ChatLine {
        sender_id: broadcast.sender_id.clone(),
        sender_name: broadcast.sender_name.clone(),
        message: message.to_string(),
        received_at: Local::now(),
    });

    if state.is_local(&broadcast.sender_id) {
        return UpdateResult::none();
    }

    let text = trim_snackbar_text(&format!(
        "{} says: {}",
        truncate_name(&broadcast.sender_name, NAME_DISPLAY_LEN),
        message
    ));
    toast_if_interactive(state, text)
}

/// Record a poll while joined and toast it in interactive mode
pub(crate) fn handle_poll(
    state: &mut AppState,
    broadcast: &Broadcast,
    poll: Option<Poll>,
) -> UpdateResult {
    let Some(poll) = poll else {
        debug!("Ignoring poll without a question from {}", broadcast.sender_id);
        return UpdateResult::none();
    };
    if state.phase != LifecyclePhase::Joined {
        trace!("Ignoring poll {} outside the meeting", poll.id);
        return UpdateResult::none();
    }

    let poll_id = poll.id.clone();
    state
        .timers
        .cancel_where(|k| matches!(k, TimerKind::PollExpiry(id) if *id == poll_id));
    if let Some(secs) = poll.timeout_secs {
        state
            .timers
            .schedule(Duration::from_secs(secs), TimerKind::PollExpiry(poll_id));
    }

    let text = trim_snackbar_text(&format!("New poll: {}", poll.question));
    state.open_poll(ActivePoll {
        poll,
        sender_name: broadcast.sender_name.clone(),
        opened_at: state.timers.now(),
    });
    toast_if_interactive(state, text)
}

/// Float a reaction over the stage until its timer fires
pub(crate) fn handle_reaction(
    state: &mut AppState,
    broadcast: &Broadcast,
    emoji: &str,
) -> UpdateResult {
    let emoji = emoji.trim();
    if emoji.is_empty() || state.phase != LifecyclePhase::Joined {
        return UpdateResult::none();
    }

    let id = state.push_reaction(
        reaction_glyph(emoji).to_string(),
        truncate_name(&broadcast.sender_name, NAME_DISPLAY_LEN),
    );
    let ttl = state.settings.timing.reaction_ttl();
    state.timers.schedule(ttl, TimerKind::ReactionExpiry(id));
    UpdateResult::none()
}

/// Show the error modal and play the matching cue.
///
/// A joining error while waiting for entry also ends the join the way a
/// denial does.
pub(crate) fn handle_error(state: &mut AppState, code: i64, message: &str) -> UpdateResult {
    let notice = ErrorNotice::classify(code, message);
    warn!("SDK error {}: {} ({:?})", code, message, notice.severity);

    let sound = SoundCue::for_severity(notice.severity);
    state.error_notice = Some(notice);

    if is_joining_error(code) && state.phase == LifecyclePhase::WaitingForEntry {
        lifecycle::fail_join(state);
    }

    UpdateResult::action(UpdateAction::PlaySound(sound))
}

pub(crate) fn acknowledge_error(state: &mut AppState) -> UpdateResult {
    state.error_notice = None;
    UpdateResult::none()
}

pub(crate) fn handle_local_raise_hand(state: &mut AppState) -> UpdateResult {
    if state.phase != LifecyclePhase::Joined {
        return UpdateResult::none();
    }
    UpdateResult::action(UpdateAction::Publish {
        topic: TOPIC_RAISE_HAND.to_string(),
        message: RAISE_HAND_MESSAGE.to_string(),
    })
}

pub(crate) fn handle_send_chat(state: &mut AppState, text: String) -> UpdateResult {
    if state.phase != LifecyclePhase::Joined {
        return UpdateResult::none();
    }

    let text = text.trim();
    if text.is_empty() {
        return UpdateResult::none();
    }

    state.chat_draft.clear();
    UpdateResult::action(UpdateAction::Publish {
        topic: TOPIC_CHAT.to_string(),
        message: text.to_string(),
    })
}
