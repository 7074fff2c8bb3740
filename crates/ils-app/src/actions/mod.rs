//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Session calls run on spawned tokio tasks and report back through the
//! message channel, so `update()` never awaits.

use tokio::sync::{broadcast, mpsc};

use ils_core::prelude::*;
use ils_sdk::{MediaDevices, RealtimeSession};

use crate::config::SoundSettings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::UpdateAction;

pub mod session;

/// Everything the engine needs from the session collaborator
pub trait SessionBackend: RealtimeSession + MediaDevices + Clone + Send + Sync + 'static {}

impl<T> SessionBackend for T where
    T: RealtimeSession + MediaDevices + Clone + Send + Sync + 'static
{
}

/// Execute an action, spawning a background task for session calls
pub fn handle_action<S: SessionBackend>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    session: &S,
    event_tx: &broadcast::Sender<EngineEvent>,
    sounds: &SoundSettings,
) {
    match action {
        UpdateAction::PlaySound(cue) => {
            let url = cue.url(sounds).to_string();
            trace!("Playing {:?} cue: {}", cue, url);
            // No subscribers is fine
            let _ = event_tx.send(EngineEvent::Sound { cue, url });
        }

        UpdateAction::JoinSession(request) => {
            session::spawn_join(session.clone(), request, msg_tx);
        }

        UpdateAction::LeaveSession => {
            session::spawn_leave(session.clone(), msg_tx);
        }

        UpdateAction::DisableDevice { kind, seq } => {
            session::spawn_disable(session.clone(), kind, seq, msg_tx);
        }

        UpdateAction::AcquireDevice { kind, seq, device } => {
            session::spawn_acquire(session.clone(), kind, seq, device, msg_tx);
        }

        UpdateAction::ApplyTrack { kind, seq, track } => {
            session::spawn_apply(session.clone(), kind, seq, track, msg_tx);
        }

        UpdateAction::SetParticipantQuality {
            participant_id,
            quality,
        } => {
            session::spawn_set_quality(session.clone(), participant_id, quality, msg_tx);
        }

        UpdateAction::Publish { topic, message } => {
            session::spawn_publish(session.clone(), topic, message, msg_tx);
        }

        UpdateAction::EnumerateDevices => {
            session::spawn_enumerate(session.clone(), msg_tx);
        }
    }
}
