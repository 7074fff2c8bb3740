//! Core domain types for the meeting session

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fallback display name used when the joining screen leaves the name empty.
pub const DEFAULT_PARTICIPANT_NAME: &str = "TestUser";

/// Error codes the SDK reports while a join is being negotiated.
pub const JOINING_ERROR_CODES: [i64; 10] = [
    4001, 4002, 4003, 4004, 4005, 4006, 4007, 4008, 4009, 4010,
];

/// User-facing message that replaces the SDK text for joining errors.
pub const JOINING_ERROR_MESSAGE: &str = "Unable to join meeting!";

// ─────────────────────────────────────────────────────────────────────────────
// Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Broadcast mode of the local participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Two-way conference: peers send and receive media.
    #[default]
    Interactive,
    /// One-way streaming: the participant only watches the mixed HLS stream.
    BroadcastOnly,
}

impl Mode {
    /// Parse a mode value as it appears on the wire.
    ///
    /// Returns `None` for values outside the enumeration; callers log and
    /// ignore those.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SEND_AND_RECV" | "CONFERENCE" | "INTERACTIVE" => Some(Mode::Interactive),
            "SIGNALLING_ONLY" | "RECV_ONLY" | "VIEWER" | "BROADCAST_ONLY" => {
                Some(Mode::BroadcastOnly)
            }
            _ => None,
        }
    }

    /// Wire representation sent to the SDK bridge
    pub fn as_wire(&self) -> &'static str {
        match self {
            Mode::Interactive => "SEND_AND_RECV",
            Mode::BroadcastOnly => "SIGNALLING_ONLY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Interactive => "Host",
            Mode::BroadcastOnly => "Viewer",
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Mode::Interactive)
    }

    /// The other mode (joining screen toggle)
    pub fn toggled(&self) -> Self {
        match self {
            Mode::Interactive => Mode::BroadcastOnly,
            Mode::BroadcastOnly => Mode::Interactive,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Which part of the meeting lifecycle the client is in.
///
/// Exactly one value at any time; written only by the lifecycle handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Joining screen, credentials still editable
    #[default]
    NotStarted,
    /// Join requested, waiting for the host to admit us
    WaitingForEntry,
    /// Host denied entry; auto-leaves after the denial delay
    EntryDenied,
    /// Admitted and in the meeting
    Joined,
    /// Left the meeting; credentials have been cleared
    Left,
}

impl LifecyclePhase {
    pub fn label(&self) -> &'static str {
        match self {
            LifecyclePhase::NotStarted => "not_started",
            LifecyclePhase::WaitingForEntry => "waiting_for_entry",
            LifecyclePhase::EntryDenied => "entry_denied",
            LifecyclePhase::Joined => "joined",
            LifecyclePhase::Left => "left",
        }
    }

    /// Whether a session handle may be alive in this phase
    pub fn has_session(&self) -> bool {
        matches!(
            self,
            LifecyclePhase::WaitingForEntry | LifecyclePhase::EntryDenied | LifecyclePhase::Joined
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Devices
// ─────────────────────────────────────────────────────────────────────────────

/// Capture device category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Camera,
    Microphone,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 2] = [DeviceKind::Camera, DeviceKind::Microphone];

    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::Camera => "camera",
            DeviceKind::Microphone => "microphone",
        }
    }

    /// Wire name used by `devices.list`
    pub fn as_wire(&self) -> &'static str {
        match self {
            DeviceKind::Camera => "videoinput",
            DeviceKind::Microphone => "audioinput",
        }
    }
}

/// Reference to a capture device chosen on the joining screen.
///
/// An `id` of `None` means the system default device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceRef {
    pub id: Option<String>,
    pub label: Option<String>,
}

impl DeviceRef {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: Some(label.into()),
        }
    }

    pub fn system_default() -> Self {
        Self::default()
    }

    pub fn is_default(&self) -> bool {
        self.id.is_none()
    }

    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("System default")
    }
}

impl From<DeviceInfo> for DeviceRef {
    fn from(info: DeviceInfo) -> Self {
        Self {
            id: Some(info.id),
            label: Some(info.label),
        }
    }
}

/// A device reported by the device capability provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub id: String,
    pub label: String,
}

/// Opaque identifier of an outbound media track created by the SDK
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub String);

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Everything collected on the joining screen.
///
/// Editable only while the lifecycle is `NotStarted`, frozen afterwards, and
/// cleared when the meeting is left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub token: String,
    pub meeting_id: String,
    pub participant_name: String,
    pub mic_on: bool,
    pub webcam_on: bool,
    pub selected_mic: DeviceRef,
    pub selected_webcam: DeviceRef,
    pub mode: Mode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            meeting_id: String::new(),
            participant_name: String::new(),
            mic_on: true,
            webcam_on: true,
            selected_mic: DeviceRef::default(),
            selected_webcam: DeviceRef::default(),
            mode: Mode::default(),
        }
    }
}

impl SessionConfig {
    /// Reject configurations that cannot start a session
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::config_invalid("token is empty"));
        }
        if self.meeting_id.trim().is_empty() {
            return Err(Error::config_invalid("meeting id is empty"));
        }
        Ok(())
    }

    /// Name sent to the SDK
    pub fn effective_name(&self) -> &str {
        let name = self.participant_name.trim();
        if name.is_empty() {
            DEFAULT_PARTICIPANT_NAME
        } else {
            name
        }
    }

    /// Drop credentials and capture flags after leaving.
    ///
    /// Device selections and the join mode survive so the joining screen
    /// keeps the user's last choice.
    pub fn clear(&mut self) {
        self.token.clear();
        self.meeting_id.clear();
        self.participant_name.clear();
        self.mic_on = false;
        self.webcam_on = false;
    }

    pub fn is_cleared(&self) -> bool {
        self.token.is_empty() && self.meeting_id.is_empty()
    }

    pub fn device_enabled(&self, kind: DeviceKind) -> bool {
        match kind {
            DeviceKind::Camera => self.webcam_on,
            DeviceKind::Microphone => self.mic_on,
        }
    }

    pub fn selected_device(&self, kind: DeviceKind) -> &DeviceRef {
        match kind {
            DeviceKind::Camera => &self.selected_webcam,
            DeviceKind::Microphone => &self.selected_mic,
        }
    }

    pub fn select_device(&mut self, kind: DeviceKind, device: DeviceRef) {
        match kind {
            DeviceKind::Camera => self.selected_webcam = device,
            DeviceKind::Microphone => self.selected_mic = device,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors surfaced to the user
// ─────────────────────────────────────────────────────────────────────────────

/// Severity of an SDK error; selects the notification sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Normal,
}

/// Modal error shown until the user acknowledges it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub code: i64,
    pub message: String,
    pub severity: Severity,
}

impl ErrorNotice {
    /// Classify a raw SDK error event.
    ///
    /// Joining errors get a fixed message regardless of the SDK text, and
    /// codes whose decimal form starts with `500` are critical.
    pub fn classify(code: i64, message: &str) -> Self {
        let message = if is_joining_error(code) {
            JOINING_ERROR_MESSAGE.to_string()
        } else {
            message.to_string()
        };
        let severity = if is_critical_error(code) {
            Severity::Critical
        } else {
            Severity::Normal
        };
        Self {
            code,
            message,
            severity,
        }
    }

    pub fn title(&self) -> String {
        format!("Error Code: {}", self.code)
    }
}

pub fn is_joining_error(code: i64) -> bool {
    JOINING_ERROR_CODES.contains(&code)
}

pub fn is_critical_error(code: i64) -> bool {
    code.to_string().starts_with("500")
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording / streaming status
// ─────────────────────────────────────────────────────────────────────────────

/// Cloud recording status reported by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    Starting,
    Started,
    Stopping,
    Stopped,
}

impl RecordingStatus {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "RECORDING_STARTING" => Some(Self::Starting),
            "RECORDING_STARTED" => Some(Self::Started),
            "RECORDING_STOPPING" => Some(Self::Stopping),
            "RECORDING_STOPPED" => Some(Self::Stopped),
            _ => None,
        }
    }
}

/// HLS streaming status reported by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HlsStatus {
    Starting,
    Started,
    Playable,
    Stopping,
    #[default]
    Stopped,
}

impl HlsStatus {
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "HLS_STARTING" => Some(Self::Starting),
            "HLS_STARTED" => Some(Self::Started),
            "HLS_PLAYABLE" => Some(Self::Playable),
            "HLS_STOPPING" => Some(Self::Stopping),
            "HLS_STOPPED" => Some(Self::Stopped),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Participants and chat
// ─────────────────────────────────────────────────────────────────────────────

/// A remote (or local) participant known to the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// A chat message kept for the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub sender_id: String,
    pub sender_name: String,
    pub message: String,
    pub received_at: chrono::DateTime<chrono::Local>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Viewport
// ─────────────────────────────────────────────────────────────────────────────

/// Viewport size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn class(&self) -> ViewportClass {
        ViewportClass::from_width(self.width)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Breakpoint class of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    /// Below 768 px
    Mobile,
    /// 768–1023 px
    Tablet,
    /// 1024–1439 px
    Desktop,
    /// 1440 px and wider
    WideDesktop,
}

impl ViewportClass {
    pub fn from_width(width: u32) -> Self {
        match width {
            0..=767 => ViewportClass::Mobile,
            768..=1023 => ViewportClass::Tablet,
            1024..=1439 => ViewportClass::Desktop,
            _ => ViewportClass::WideDesktop,
        }
    }

    /// Mobile and tablet layouts share most restrictions
    pub fn is_compact(&self) -> bool {
        matches!(self, ViewportClass::Mobile | ViewportClass::Tablet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_wire() {
        assert_eq!(Mode::from_wire("SEND_AND_RECV"), Some(Mode::Interactive));
        assert_eq!(Mode::from_wire("conference"), Some(Mode::Interactive));
        assert_eq!(Mode::from_wire("SIGNALLING_ONLY"), Some(Mode::BroadcastOnly));
        assert_eq!(Mode::from_wire(" viewer "), Some(Mode::BroadcastOnly));
        assert_eq!(Mode::from_wire("SPECTATOR"), None);
        assert_eq!(Mode::from_wire(""), None);
    }

    #[test]
    fn test_mode_wire_round_trip() {
        for mode in [Mode::Interactive, Mode::BroadcastOnly] {
            assert_eq!(Mode::from_wire(mode.as_wire()), Some(mode));
        }
    }

    #[test]
    fn test_session_config_validate() {
        let mut config = SessionConfig::default();
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigInvalid { .. })
        ));

        config.token = "t1".to_string();
        assert!(config.validate().is_err());

        config.meeting_id = "   ".to_string();
        assert!(config.validate().is_err());

        config.meeting_id = "m1".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_name_falls_back() {
        let mut config = SessionConfig::default();
        assert_eq!(config.effective_name(), DEFAULT_PARTICIPANT_NAME);
        config.participant_name = "  Ada ".to_string();
        assert_eq!(config.effective_name(), "Ada");
    }

    #[test]
    fn test_clear_keeps_device_choice() {
        let mut config = SessionConfig {
            token: "t1".to_string(),
            meeting_id: "m1".to_string(),
            participant_name: "Ada".to_string(),
            selected_webcam: DeviceRef::new("cam-2", "USB Camera"),
            ..Default::default()
        };
        config.clear();
        assert!(config.is_cleared());
        assert!(config.participant_name.is_empty());
        assert!(!config.mic_on);
        assert!(!config.webcam_on);
        assert_eq!(config.selected_webcam.id.as_deref(), Some("cam-2"));
    }

    #[test]
    fn test_joining_error_replaces_message() {
        let notice = ErrorNotice::classify(4001, "token expired at edge node 7");
        assert_eq!(notice.message, JOINING_ERROR_MESSAGE);
        assert_eq!(notice.severity, Severity::Normal);

        let notice = ErrorNotice::classify(4010, "");
        assert_eq!(notice.message, JOINING_ERROR_MESSAGE);

        let notice = ErrorNotice::classify(4011, "something else");
        assert_eq!(notice.message, "something else");
    }

    #[test]
    fn test_critical_classification_uses_decimal_prefix() {
        assert_eq!(
            ErrorNotice::classify(50042, "media server down").severity,
            Severity::Critical
        );
        assert_eq!(ErrorNotice::classify(5001, "x").severity, Severity::Critical);
        assert_eq!(ErrorNotice::classify(500, "x").severity, Severity::Critical);
        assert_eq!(ErrorNotice::classify(4500, "x").severity, Severity::Normal);
        assert_eq!(ErrorNotice::classify(5100, "x").severity, Severity::Normal);
    }

    #[test]
    fn test_error_notice_title() {
        let notice = ErrorNotice::classify(4002, "x");
        assert_eq!(notice.title(), "Error Code: 4002");
    }

    #[test]
    fn test_status_from_wire() {
        assert_eq!(
            RecordingStatus::from_wire("RECORDING_STARTED"),
            Some(RecordingStatus::Started)
        );
        assert_eq!(RecordingStatus::from_wire("HLS_STARTED"), None);
        assert_eq!(HlsStatus::from_wire("HLS_PLAYABLE"), Some(HlsStatus::Playable));
        assert_eq!(HlsStatus::from_wire("bogus"), None);
    }

    #[test]
    fn test_viewport_classes() {
        assert_eq!(ViewportClass::from_width(375), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_width(767), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_width(768), ViewportClass::Tablet);
        assert_eq!(ViewportClass::from_width(1023), ViewportClass::Tablet);
        assert_eq!(ViewportClass::from_width(1024), ViewportClass::Desktop);
        assert_eq!(ViewportClass::from_width(1439), ViewportClass::Desktop);
        assert_eq!(ViewportClass::from_width(1440), ViewportClass::WideDesktop);
        assert!(ViewportClass::Tablet.is_compact());
        assert!(!ViewportClass::Desktop.is_compact());
    }

    #[test]
    fn test_device_ref_display() {
        assert_eq!(DeviceRef::system_default().display_name(), "System default");
        assert!(DeviceRef::system_default().is_default());
        let dev = DeviceRef::new("mic-1", "Headset");
        assert_eq!(dev.display_name(), "Headset");
        assert!(!dev.is_default());
    }
}
