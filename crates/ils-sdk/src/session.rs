//! Real-time session and device provider seams
//!
//! [`RealtimeSession`] and [`MediaDevices`] are the two collaborators the
//! application talks to. [`BridgeSession`] implements both on top of the
//! bridge process; tests use `test_utils::FakeSession`.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

use ils_core::prelude::*;
use ils_core::{DeviceInfo, DeviceKind, DeviceRef, Mode, SdkEvent, SessionConfig, TrackId};

use crate::commands::{BridgeCommand, CommandSender, RequestTracker};
use crate::process::{BridgeEvent, BridgeProcess};
use crate::protocol::{parse_bridge_message, BridgeMessage};

/// Parameters of a join request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub meeting_id: String,
    pub token: String,
    pub name: String,
    pub mic_enabled: bool,
    pub webcam_enabled: bool,
    pub mode: Mode,
}

impl JoinRequest {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            meeting_id: config.meeting_id.trim().to_string(),
            token: config.token.trim().to_string(),
            name: config.effective_name().to_string(),
            mic_enabled: config.mic_on,
            webcam_enabled: config.webcam_on,
            mode: config.mode,
        }
    }
}

/// Answer to a successful join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedSession {
    pub local_participant_id: String,
}

/// Receive quality requested for a remote participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Low,
    Med,
    High,
}

impl Quality {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Med => "med",
            Quality::High => "high",
        }
    }
}

/// Operations on the real-time meeting session
#[trait_variant::make(RealtimeSession: Send)]
pub trait LocalRealtimeSession {
    /// Join the meeting; resolves with the local participant id
    async fn join(&self, request: JoinRequest) -> Result<JoinedSession>;

    async fn leave(&self) -> Result<()>;

    /// Stop publishing the current device of `kind`
    async fn disable_device(&self, kind: DeviceKind) -> Result<()>;

    /// Create an outbound track from a specific capture device
    async fn acquire_device(&self, kind: DeviceKind, device: &DeviceRef) -> Result<TrackId>;

    /// Publish `track` as the outbound track of `kind`
    async fn apply_track(&self, kind: DeviceKind, track: &TrackId) -> Result<()>;

    async fn set_participant_quality(&self, participant_id: &str, quality: Quality) -> Result<()>;

    async fn publish(&self, topic: &str, message: &str) -> Result<()>;
}

/// Device capability provider
#[trait_variant::make(MediaDevices: Send)]
pub trait LocalMediaDevices {
    async fn enumerate(&self, kind: DeviceKind) -> Result<Vec<DeviceInfo>>;
}

/// What the bridge session reports to the application
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Sdk(SdkEvent),
    /// The bridge process is gone; every pending request has been cancelled
    BridgeExited { code: Option<i32> },
}

/// Settings for spawning the bridge
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    pub command: String,
    pub args: Vec<String>,
    pub request_timeout: Duration,
}

struct BridgeInner {
    sender: CommandSender,
    process: Mutex<Option<BridgeProcess>>,
}

/// [`RealtimeSession`] backed by the SDK bridge process
#[derive(Clone)]
pub struct BridgeSession {
    inner: Arc<BridgeInner>,
}

impl std::fmt::Debug for BridgeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeSession")
            .field("sender", &self.inner.sender)
            .finish()
    }
}

impl BridgeSession {
    /// Spawn the bridge and start routing its output.
    ///
    /// Responses are matched to pending requests; SDK callbacks are forwarded
    /// to `event_tx`.
    pub fn spawn(options: &BridgeOptions, event_tx: mpsc::Sender<SessionEvent>) -> Result<Self> {
        let (bridge_tx, bridge_rx) = mpsc::channel::<BridgeEvent>(256);
        let process = BridgeProcess::spawn(&options.command, &options.args, bridge_tx)?;

        let tracker = Arc::new(RequestTracker::new());
        let sender = process
            .command_sender(Arc::clone(&tracker))
            .with_timeout(options.request_timeout);

        tokio::spawn(route_bridge_output(bridge_rx, tracker, event_tx));

        Ok(Self {
            inner: Arc::new(BridgeInner {
                sender,
                process: Mutex::new(Some(process)),
            }),
        })
    }

    /// Leave (best effort) and stop the bridge process
    pub async fn shutdown(&self) {
        let Some(mut process) = self.inner.process.lock().await.take() else {
            return;
        };
        if let Err(e) = process
            .shutdown(Some(&self.inner.sender), Duration::from_secs(2))
            .await
        {
            warn!("SDK bridge shutdown failed: {}", e);
        }
    }

    async fn call(&self, command: BridgeCommand) -> Result<Option<Value>> {
        self.inner.sender.request(command).await
    }
}

/// Fan bridge output into the tracker and the session event channel
async fn route_bridge_output(
    mut rx: mpsc::Receiver<BridgeEvent>,
    tracker: Arc<RequestTracker>,
    event_tx: mpsc::Sender<SessionEvent>,
) {
    while let Some(event) = rx.recv().await {
        match event {
            BridgeEvent::Stdout(line) => match parse_bridge_message(&line) {
                Some(BridgeMessage::Response { id, result, error }) => {
                    if !tracker.handle_response(id, result, error).await {
                        debug!("Unmatched bridge response #{}", id);
                    }
                }
                Some(BridgeMessage::Event(sdk_event)) => {
                    trace!("SDK event: {}", sdk_event.event_type());
                    if event_tx.send(SessionEvent::Sdk(sdk_event)).await.is_err() {
                        debug!("Session event channel closed");
                        break;
                    }
                }
                None => {
                    if !line.trim().is_empty() {
                        debug!("Dropping unparseable bridge line: {}", line);
                    }
                }
            },
            BridgeEvent::Stderr(line) => debug!("bridge: {}", line),
            BridgeEvent::Exited { code } => {
                let pending = tracker.pending_count().await;
                if pending > 0 {
                    warn!("SDK bridge exited with {} request(s) in flight", pending);
                }
                tracker.cancel_all().await;
                let _ = event_tx.send(SessionEvent::BridgeExited { code }).await;
                break;
            }
        }
    }
}

fn string_field(value: &Option<Value>, field: &str) -> Option<String> {
    value
        .as_ref()
        .and_then(|v| v.get(field))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

impl RealtimeSession for BridgeSession {
    async fn join(&self, request: JoinRequest) -> Result<JoinedSession> {
        let result = self
            .call(BridgeCommand::Join {
                meeting_id: request.meeting_id,
                token: request.token,
                name: request.name,
                mic_enabled: request.mic_enabled,
                webcam_enabled: request.webcam_enabled,
                mode: request.mode,
            })
            .await
            .map_err(|e| match e {
                Error::Bridge { message } => Error::join(message),
                other => other,
            })?;

        let local_participant_id = string_field(&result, "localParticipantId")
            .ok_or_else(|| Error::protocol("join response missing localParticipantId"))?;

        Ok(JoinedSession {
            local_participant_id,
        })
    }

    async fn leave(&self) -> Result<()> {
        self.call(BridgeCommand::Leave).await.map(|_| ())
    }

    async fn disable_device(&self, kind: DeviceKind) -> Result<()> {
        self.call(BridgeCommand::DisableDevice { kind })
            .await
            .map(|_| ())
            .map_err(|e| Error::device(kind.label(), e.to_string()))
    }

    async fn acquire_device(&self, kind: DeviceKind, device: &DeviceRef) -> Result<TrackId> {
        let device_id = device
            .id
            .clone()
            .ok_or_else(|| Error::device(kind.label(), "no device selected"))?;

        let result = self
            .call(BridgeCommand::CreateTrack { kind, device_id })
            .await
            .map_err(|e| Error::device(kind.label(), e.to_string()))?;

        string_field(&result, "trackId")
            .map(TrackId)
            .ok_or_else(|| Error::device(kind.label(), "bridge returned no track id"))
    }

    async fn apply_track(&self, kind: DeviceKind, track: &TrackId) -> Result<()> {
        self.call(BridgeCommand::ChangeTrack {
            kind,
            track_id: track.0.clone(),
        })
        .await
        .map(|_| ())
        .map_err(|e| Error::device(kind.label(), e.to_string()))
    }

    async fn set_participant_quality(&self, participant_id: &str, quality: Quality) -> Result<()> {
        self.call(BridgeCommand::SetQuality {
            participant_id: participant_id.to_string(),
            quality: quality.as_wire(),
        })
        .await
        .map(|_| ())
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        self.call(BridgeCommand::Publish {
            topic: topic.to_string(),
            message: message.to_string(),
        })
        .await
        .map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDevice {
    device_id: String,
    #[serde(default)]
    label: String,
}

impl MediaDevices for BridgeSession {
    async fn enumerate(&self, kind: DeviceKind) -> Result<Vec<DeviceInfo>> {
        let result = self.call(BridgeCommand::ListDevices { kind }).await?;
        let devices: Vec<WireDevice> =
            serde_json::from_value(result.unwrap_or(Value::Array(Vec::new())))?;
        Ok(devices
            .into_iter()
            .map(|d| DeviceInfo {
                label: if d.label.is_empty() {
                    d.device_id.clone()
                } else {
                    d.label
                },
                id: d.device_id,
            })
            .collect())
    }
}
