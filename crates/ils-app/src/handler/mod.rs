//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `lifecycle`: Meeting lifecycle transitions and timers
//! - `join_form`: Joining screen edits
//! - `devices`: Device reconciliation and enumeration
//! - `notify`: Toasts, sounds and the error modal
//! - `mode`: Mode listener
//! - `keys`: Key event handlers per screen

pub(crate) mod devices;
pub(crate) mod join_form;
pub(crate) mod keys;
pub(crate) mod lifecycle;
pub(crate) mod mode;
pub(crate) mod notify;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use ils_core::{DeviceKind, DeviceRef, TrackId};
use ils_sdk::{JoinRequest, Quality};

use crate::devices::SequenceId;
use crate::message::Message;
use crate::notices::SoundCue;

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Side effects the event loop performs after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Join the meeting; answers with `SessionAttached` or `JoinFailed`
    JoinSession(JoinRequest),

    /// Leave the meeting (fire-and-forget)
    LeaveSession,

    /// First step of a device switch; answers with `DeviceDisabled`
    DisableDevice { kind: DeviceKind, seq: SequenceId },

    /// Create a track from `device`; answers with `DeviceAcquired`
    AcquireDevice {
        kind: DeviceKind,
        seq: SequenceId,
        device: DeviceRef,
    },

    /// Publish the new track; answers with `DeviceApplied`
    ApplyTrack {
        kind: DeviceKind,
        seq: SequenceId,
        track: TrackId,
    },

    SetParticipantQuality {
        participant_id: String,
        quality: Quality,
    },

    /// Send a pub-sub message
    Publish { topic: String, message: String },

    /// List cameras and microphones; answers with `DevicesEnumerated`
    EnumerateDevices,

    /// Play an audio cue on the notification surface
    PlaySound(SoundCue),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Actions for the event loop to perform, in order
    pub actions: Vec<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            actions: Vec::new(),
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self::actions(vec![action])
    }

    pub fn actions(actions: Vec<UpdateAction>) -> Self {
        Self {
            message: None,
            actions,
        }
    }

    /// Fold `other` into this result. Actions keep their order; the first
    /// follow-up message wins.
    pub fn merge(&mut self, other: UpdateResult) {
        self.actions.extend(other.actions);
        if self.message.is_none() {
            self.message = other.message;
        }
    }

    /// Whether this result carries an action matching `predicate`
    pub fn has_action(&self, predicate: impl Fn(&UpdateAction) -> bool) -> bool {
        self.actions.iter().any(predicate)
    }
}
