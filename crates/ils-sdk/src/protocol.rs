//! NDJSON protocol handling for the SDK bridge

use serde::Deserialize;
use serde_json::Value;

use ils_core::prelude::*;
use ils_core::{Broadcast, EntryDecision, HlsStatus, RecordingStatus, SdkEvent};

/// Strip the outer brackets from a bridge line
///
/// Bridges may wrap each message in `[...]` the way JSON-RPC daemons do.
pub(crate) fn strip_brackets(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(&trimmed[1..trimmed.len() - 1])
    } else {
        None
    }
}

/// A raw bridge message (before parsing into typed events)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawMessage {
    /// A response to a request we sent
    Response {
        id: Value,
        #[serde(default)]
        result: Option<Value>,
        #[serde(default)]
        error: Option<Value>,
    },
    /// An unsolicited SDK callback
    Event {
        event: String,
        #[serde(default)]
        params: Value,
    },
}

impl RawMessage {
    pub fn parse(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// A parsed line from the bridge's stdout
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeMessage {
    /// Answer to request `id`
    Response {
        id: u64,
        result: Option<Value>,
        error: Option<Value>,
    },
    Event(SdkEvent),
}

// ─────────────────────────────────────────────────────────
// Event parameter payloads
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantParams {
    participant_id: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryParams {
    participant_id: String,
    decision: String,
}

#[derive(Debug, Deserialize)]
struct ErrorParams {
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct StatusParams {
    status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HlsParams {
    status: String,
    #[serde(default)]
    downstream_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresenterParams {
    #[serde(default)]
    presenter_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModeParams {
    participant_id: String,
    mode: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PubSubParams {
    topic: String,
    #[serde(default)]
    sender_id: String,
    #[serde(default)]
    sender_name: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    payload: Value,
}

// ─────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────

/// Parse one line of bridge output.
///
/// Accepts bracketed (`[{...}]`) and bare JSON lines. Returns `None` for
/// anything that is not a well-formed response or a known event.
pub fn parse_bridge_message(line: &str) -> Option<BridgeMessage> {
    let json = strip_brackets(line).unwrap_or(line);

    match RawMessage::parse(json)? {
        RawMessage::Response { id, result, error } => {
            let id = id
                .as_u64()
                .or_else(|| id.as_str().and_then(|s| s.parse().ok()))?;
            Some(BridgeMessage::Response { id, result, error })
        }
        RawMessage::Event { event, params } => {
            parse_event(&event, params).map(BridgeMessage::Event)
        }
    }
}

fn params<T: serde::de::DeserializeOwned>(event: &str, params: Value) -> Option<T> {
    match serde_json::from_value(params) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Malformed params for bridge event '{}': {}", event, e);
            None
        }
    }
}

/// Parse an event by name and parameters
fn parse_event(event: &str, raw: Value) -> Option<SdkEvent> {
    let parsed = match event {
        "participantJoined" => {
            let p: ParticipantParams = params(event, raw)?;
            SdkEvent::ParticipantJoined {
                participant_id: p.participant_id,
                name: p.display_name,
            }
        }
        "participantLeft" => {
            let p: ParticipantParams = params(event, raw)?;
            SdkEvent::ParticipantLeft {
                participant_id: p.participant_id,
            }
        }
        "entryResponded" => {
            let p: EntryParams = params(event, raw)?;
            SdkEvent::EntryResponded {
                participant_id: p.participant_id,
                decision: EntryDecision::from_wire(&p.decision),
            }
        }
        "meetingJoined" => SdkEvent::MeetingJoined,
        "meetingLeft" => SdkEvent::MeetingLeft,
        "error" => {
            let p: ErrorParams = params(event, raw)?;
            SdkEvent::Error {
                code: p.code,
                message: p.message,
            }
        }
        "recordingStateChanged" => {
            let p: StatusParams = params(event, raw)?;
            let Some(status) = RecordingStatus::from_wire(&p.status) else {
                warn!("Unknown recording status: {}", p.status);
                return None;
            };
            SdkEvent::RecordingStateChanged { status }
        }
        "hlsStateChanged" => {
            let p: HlsParams = params(event, raw)?;
            let Some(status) = HlsStatus::from_wire(&p.status) else {
                warn!("Unknown HLS status: {}", p.status);
                return None;
            };
            SdkEvent::HlsStateChanged {
                status,
                downstream_url: p.downstream_url.filter(|u| !u.is_empty()),
            }
        }
        "presenterChanged" => {
            let p: PresenterParams = params(event, raw)?;
            SdkEvent::PresenterChanged {
                presenter_id: p.presenter_id,
            }
        }
        "participantModeChanged" => {
            let p: ModeParams = params(event, raw)?;
            SdkEvent::ParticipantModeChanged {
                participant_id: p.participant_id,
                mode: p.mode,
            }
        }
        "pubsub" => {
            let p: PubSubParams = params(event, raw)?;
            SdkEvent::PubSub(Broadcast {
                topic: p.topic,
                sender_id: p.sender_id,
                sender_name: p.sender_name,
                message: p.message,
                payload: p.payload,
            })
        }
        other => {
            debug!("Ignoring unknown bridge event: {}", other);
            return None;
        }
    };
    Some(parsed)
}
