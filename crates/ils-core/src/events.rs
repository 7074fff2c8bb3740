//! Events delivered by the real-time SDK
//!
//! Every callback the SDK can fire is folded into the single [`SdkEvent`]
//! enum so the application has one ingress point to pattern-match on.

use serde::Serialize;

use crate::types::{HlsStatus, RecordingStatus};

/// Pub-sub topic for hand-raise broadcasts
pub const TOPIC_RAISE_HAND: &str = "RAISE_HAND";
/// Pub-sub topic for chat messages
pub const TOPIC_CHAT: &str = "CHAT";
/// Pub-sub topic for host-driven mode changes
pub const TOPIC_CHANGE_MODE: &str = "CHANGE_MODE";
/// Pub-sub topic for polls created by the host
pub const TOPIC_POLL: &str = "POLL";
/// Pub-sub topic for emoji reactions
pub const TOPIC_REACTION: &str = "REACTION";

/// Reaction names the prebuilt UI publishes, with their glyphs
const REACTION_GLYPHS: [(&str, &str); 6] = [
    ("heart", "❤️"),
    ("clap", "👏"),
    ("laugh", "😂"),
    ("thumbsup", "👍"),
    ("confetti", "🎉"),
    ("wow", "😮"),
];

/// Host decision on a waiting-room request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDecision {
    Allowed,
    Denied,
}

impl EntryDecision {
    /// Anything other than `allowed` is treated as a denial.
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("allowed") {
            EntryDecision::Allowed
        } else {
            EntryDecision::Denied
        }
    }
}

/// A message received on a pub-sub topic
#[derive(Debug, Clone, PartialEq)]
pub struct Broadcast {
    pub topic: String,
    pub sender_id: String,
    pub sender_name: String,
    pub message: String,
    pub payload: serde_json::Value,
}

/// Typed view of a [`Broadcast`] by topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastKind<'a> {
    RaiseHand,
    Chat { message: &'a str },
    /// Mode change; `mode` is the raw wire value, `target` the addressed participant
    ChangeMode {
        mode: &'a str,
        target: Option<&'a str>,
    },
    /// A poll was created; `None` when the payload has no question
    Poll(Option<Poll>),
    Reaction { emoji: &'a str },
    Other { topic: &'a str },
}

/// A poll as published on [`TOPIC_POLL`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Seconds until the poll closes; `None` keeps it open
    pub timeout_secs: Option<u64>,
}

impl Poll {
    /// Parse a poll payload.
    ///
    /// Options may be plain strings or `{"option": ".."}` objects. The poll
    /// id falls back to the question when absent.
    pub fn from_payload(payload: &serde_json::Value, fallback_question: &str) -> Option<Self> {
        let question = payload
            .get("question")
            .and_then(|q| q.as_str())
            .unwrap_or(fallback_question)
            .trim();
        if question.is_empty() {
            return None;
        }

        let options = payload
            .get("options")
            .and_then(|o| o.as_array())
            .map(|options| {
                options
                    .iter()
                    .filter_map(|o| o.as_str().or_else(|| o.get("option")?.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let id = match payload.get("id") {
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => question.to_string(),
        };

        Some(Self {
            id,
            question: question.to_string(),
            options,
            timeout_secs: payload
                .get("timeout")
                .and_then(|t| t.as_u64())
                .filter(|t| *t > 0),
        })
    }
}

/// Display glyph for a reaction name; unknown names pass through unchanged
pub fn reaction_glyph(name: &str) -> &str {
    REACTION_GLYPHS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, glyph)| *glyph)
        .unwrap_or(name)
}

impl Broadcast {
    pub fn kind(&self) -> BroadcastKind<'_> {
        match self.topic.as_str() {
            TOPIC_RAISE_HAND => BroadcastKind::RaiseHand,
            TOPIC_CHAT => BroadcastKind::Chat {
                message: &self.message,
            },
            TOPIC_CHANGE_MODE => BroadcastKind::ChangeMode {
                mode: self
                    .payload
                    .get("mode")
                    .and_then(|m| m.as_str())
                    .unwrap_or(self.message.as_str()),
                target: self.payload.get("participantId").and_then(|p| p.as_str()),
            },
            TOPIC_POLL => BroadcastKind::Poll(Poll::from_payload(&self.payload, &self.message)),
            TOPIC_REACTION => BroadcastKind::Reaction {
                emoji: self
                    .payload
                    .get("emoji")
                    .and_then(|e| e.as_str())
                    .unwrap_or(self.message.as_str()),
            },
            topic => BroadcastKind::Other { topic },
        }
    }
}

/// Callbacks from the real-time SDK
#[derive(Debug, Clone, PartialEq)]
pub enum SdkEvent {
    ParticipantJoined {
        participant_id: String,
        name: String,
    },
    ParticipantLeft {
        participant_id: String,
    },
    EntryResponded {
        participant_id: String,
        decision: EntryDecision,
    },
    MeetingJoined,
    MeetingLeft,
    Error {
        code: i64,
        message: String,
    },
    RecordingStateChanged {
        status: RecordingStatus,
    },
    HlsStateChanged {
        status: HlsStatus,
        downstream_url: Option<String>,
    },
    PresenterChanged {
        presenter_id: Option<String>,
    },
    /// The SDK switched a participant's mode (raw wire value)
    ParticipantModeChanged {
        participant_id: String,
        mode: String,
    },
    PubSub(Broadcast),
}

impl SdkEvent {
    /// Short label for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            SdkEvent::ParticipantJoined { .. } => "participant_joined",
            SdkEvent::ParticipantLeft { .. } => "participant_left",
            SdkEvent::EntryResponded { .. } => "entry_responded",
            SdkEvent::MeetingJoined => "meeting_joined",
            SdkEvent::MeetingLeft => "meeting_left",
            SdkEvent::Error { .. } => "error",
            SdkEvent::RecordingStateChanged { .. } => "recording_state_changed",
            SdkEvent::HlsStateChanged { .. } => "hls_state_changed",
            SdkEvent::PresenterChanged { .. } => "presenter_changed",
            SdkEvent::ParticipantModeChanged { .. } => "participant_mode_changed",
            SdkEvent::PubSub(_) => "pubsub",
        }
    }
}
