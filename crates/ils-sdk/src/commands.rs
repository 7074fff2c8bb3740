//! Command building and request tracking for bridge communication
//!
//! This module provides:
//! - Request ID tracking for matching responses
//! - Command building for the NDJSON request format
//! - Timeout handling for stalled commands

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::time::Instant;

use ils_core::prelude::*;
use ils_core::{DeviceKind, Mode};

/// Default time to wait for the bridge to answer a request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Global request ID counter
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique request ID
pub fn next_request_id() -> u64 {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A pending request awaiting response
struct PendingRequest {
    response_tx: oneshot::Sender<CommandResponse>,
    created_at: Instant,
}

/// Response from a command
#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub id: u64,
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn from_bridge_response(id: u64, result: Option<Value>, error: Option<Value>) -> Self {
        Self {
            id,
            success: error.is_none(),
            result,
            error: error.map(|e| match e {
                Value::String(s) => s,
                other => other.to_string(),
            }),
        }
    }

    pub fn success(id: u64, result: Option<Value>) -> Self {
        Self {
            id,
            success: true,
            result,
            error: None,
        }
    }

    pub fn error(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(message.into()),
        }
    }

    /// Convert into a `Result`, mapping bridge-side failures to [`Error::Bridge`]
    pub fn into_result(self) -> Result<Option<Value>> {
        if self.success {
            Ok(self.result)
        } else {
            Err(Error::bridge(
                self.error.unwrap_or_else(|| "unknown bridge error".to_string()),
            ))
        }
    }
}

/// Tracks pending requests and matches responses
pub struct RequestTracker {
    pending: Arc<RwLock<HashMap<u64, PendingRequest>>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a new pending request
    /// Returns (request_id, receiver for response)
    pub async fn register(&self) -> (u64, oneshot::Receiver<CommandResponse>) {
        let id = next_request_id();
        let (tx, rx) = oneshot::channel();

        let pending = PendingRequest {
            response_tx: tx,
            created_at: Instant::now(),
        };

        self.pending.write().await.insert(id, pending);

        (id, rx)
    }

    /// Handle an incoming response from the bridge
    /// Returns true if the response was matched to a pending request
    pub async fn handle_response(
        &self,
        id: u64,
        result: Option<Value>,
        error: Option<Value>,
    ) -> bool {
        if let Some(pending) = self.pending.write().await.remove(&id) {
            let response = CommandResponse::from_bridge_response(id, result, error);
            let _ = pending.response_tx.send(response);
            true
        } else {
            false
        }
    }

    /// Cancel all pending requests (e.g., on bridge exit)
    pub async fn cancel_all(&self) {
        let mut pending = self.pending.write().await;
        for (id, req) in pending.drain() {
            let _ = req
                .response_tx
                .send(CommandResponse::error(id, "Request cancelled"));
        }
    }

    /// Remove stale requests that have timed out
    pub async fn cleanup_stale(&self, timeout: Duration) -> Vec<u64> {
        let mut pending = self.pending.write().await;
        let now = Instant::now();

        let stale: Vec<u64> = pending
            .iter()
            .filter(|(_, req)| now.duration_since(req.created_at) >= timeout)
            .map(|(id, _)| *id)
            .collect();

        for id in &stale {
            if let Some(req) = pending.remove(id) {
                let _ = req
                    .response_tx
                    .send(CommandResponse::error(*id, "Request timed out"));
            }
        }

        stale
    }

    /// Get the number of pending requests
    pub async fn pending_count(&self) -> usize {
        self.pending.read().await.len()
    }
}

impl Default for RequestTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Requests understood by the SDK bridge
#[derive(Debug, Clone)]
pub enum BridgeCommand {
    Join {
        meeting_id: String,
        token: String,
        name: String,
        mic_enabled: bool,
        webcam_enabled: bool,
        mode: Mode,
    },
    Leave,
    /// Stop publishing the active device of `kind` (disable webcam / mute mic)
    DisableDevice { kind: DeviceKind },
    /// Create a capture track for a specific device
    CreateTrack { kind: DeviceKind, device_id: String },
    /// Replace the outbound track of `kind`
    ChangeTrack { kind: DeviceKind, track_id: String },
    SetQuality {
        participant_id: String,
        quality: &'static str,
    },
    Publish { topic: String, message: String },
    ListDevices { kind: DeviceKind },
}

impl BridgeCommand {
    /// Build the JSON request line
    pub fn build(&self, id: u64) -> String {
        let (method, params) = match self {
            BridgeCommand::Join {
                meeting_id,
                token,
                name,
                mic_enabled,
                webcam_enabled,
                mode,
            } => (
                "meeting.join",
                json!({
                    "meetingId": meeting_id,
                    "token": token,
                    "name": name,
                    "micEnabled": mic_enabled,
                    "webcamEnabled": webcam_enabled,
                    "mode": mode.as_wire(),
                    "multiStream": false,
                }),
            ),
            BridgeCommand::Leave => ("meeting.leave", json!({})),
            BridgeCommand::DisableDevice { kind } => match kind {
                DeviceKind::Camera => ("webcam.disable", json!({})),
                DeviceKind::Microphone => ("mic.mute", json!({})),
            },
            BridgeCommand::CreateTrack { kind, device_id } => match kind {
                DeviceKind::Camera => (
                    "media.createCameraTrack",
                    json!({
                        "deviceId": device_id,
                        "optimizationMode": "motion",
                        "encoderConfig": "h540p_w960p",
                        "facingMode": "environment",
                    }),
                ),
                DeviceKind::Microphone => {
                    ("media.createMicTrack", json!({ "deviceId": device_id }))
                }
            },
            BridgeCommand::ChangeTrack { kind, track_id } => match kind {
                DeviceKind::Camera => ("webcam.change", json!({ "trackId": track_id })),
                DeviceKind::Microphone => ("mic.change", json!({ "trackId": track_id })),
            },
            BridgeCommand::SetQuality {
                participant_id,
                quality,
            } => (
                "participant.setQuality",
                json!({ "participantId": participant_id, "quality": quality }),
            ),
            BridgeCommand::Publish { topic, message } => (
                "pubsub.publish",
                json!({ "topic": topic, "message": message, "persist": true }),
            ),
            BridgeCommand::ListDevices { kind } => {
                ("devices.list", json!({ "kind": kind.as_wire() }))
            }
        };

        json!({
            "id": id,
            "method": method,
            "params": params,
        })
        .to_string()
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BridgeCommand::Join { .. } => "join meeting",
            BridgeCommand::Leave => "leave meeting",
            BridgeCommand::DisableDevice { .. } => "disable device",
            BridgeCommand::CreateTrack { .. } => "create track",
            BridgeCommand::ChangeTrack { .. } => "change track",
            BridgeCommand::SetQuality { .. } => "set quality",
            BridgeCommand::Publish { .. } => "publish",
            BridgeCommand::ListDevices { .. } => "list devices",
        }
    }
}

/// Sends commands to the bridge process with request tracking
#[derive(Clone)]
pub struct CommandSender {
    /// Channel to send raw JSON to the bridge's stdin
    stdin_tx: mpsc::Sender<String>,
    tracker: Arc<RequestTracker>,
    timeout: Duration,
}

impl std::fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSender")
            .field("stdin_tx", &"<channel>")
            .field("tracker", &"<tracker>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CommandSender {
    pub fn new(stdin_tx: mpsc::Sender<String>, tracker: Arc<RequestTracker>) -> Self {
        Self {
            stdin_tx,
            tracker,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a command and wait for response
    pub async fn send(&self, command: BridgeCommand) -> Result<CommandResponse> {
        self.send_with_timeout(command, self.timeout).await
    }

    /// Send a command with custom timeout
    pub async fn send_with_timeout(
        &self,
        command: BridgeCommand,
        timeout: Duration,
    ) -> Result<CommandResponse> {
        let (id, response_rx) = self.tracker.register().await;
        let json = command.build(id);

        debug!("Sending command #{}: {}", id, command.description());

        self.stdin_tx
            .send(json)
            .await
            .map_err(|_| Error::channel_send("bridge stdin"))?;

        match tokio::time::timeout(timeout, response_rx).await {
            Ok(Ok(response)) => {
                debug!("Command #{} completed: success={}", id, response.success);
                Ok(response)
            }
            Ok(Err(_)) => Err(Error::bridge("Command cancelled")),
            Err(_) => {
                // Anything at least this old has timed out as well
                self.tracker.cleanup_stale(timeout).await;
                Err(Error::bridge(format!(
                    "Command '{}' timed out after {:?}",
                    command.description(),
                    timeout
                )))
            }
        }
    }

    /// Send a command and unwrap the bridge-side result
    pub async fn request(&self, command: BridgeCommand) -> Result<Option<Value>> {
        self.send(command).await?.into_result()
    }

    /// Get the request tracker (for response handling)
    pub fn tracker(&self) -> &Arc<RequestTracker> {
        &self.tracker
    }
}
