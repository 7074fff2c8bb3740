//! Message types for the application (TEA pattern)

use std::time::Duration;

use ils_core::{DeviceInfo, DeviceKind, DeviceRef, Mode, SdkEvent, TrackId, Viewport};

use crate::devices::SequenceId;
use crate::input_key::InputKey;
use crate::state::JoinField;
use crate::view::SidebarPanel;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Virtual clock update; fires every timer due at `now`
    Tick { now: Duration },

    /// Callback from the real-time SDK
    Sdk(SdkEvent),

    /// The SDK bridge process exited
    BridgeExited { code: Option<i32> },

    /// Request to quit (may show the leave guard on small viewports)
    RequestQuit,

    /// Quit without confirmation (signal handler, confirmed dialog)
    Quit,

    /// Confirm quit from confirmation dialog
    ConfirmQuit,

    /// Cancel quit from confirmation dialog
    CancelQuit,

    /// Highlight the next option of the confirmation dialog
    CycleDialogOption,

    // ─────────────────────────────────────────────────────────
    // Joining Screen
    // ─────────────────────────────────────────────────────────
    SetToken(String),
    SetMeetingId(String),
    SetParticipantName(String),
    ToggleMic,
    ToggleWebcam,
    SelectDevice {
        kind: DeviceKind,
        device: DeviceRef,
    },
    SetJoinMode(Mode),
    /// Move keyboard focus between the joining screen text fields
    FocusJoinField(JoinField),

    /// Ask the device provider for cameras and microphones
    EnumerateDevices,
    DevicesEnumerated {
        kind: DeviceKind,
        devices: Vec<DeviceInfo>,
    },

    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Submit the joining screen
    StartMeeting,

    /// The SDK accepted the join request and created the session
    SessionAttached { local_participant_id: String },

    /// The join request failed before a session existed
    JoinFailed { message: String },

    /// User pressed leave
    LeaveMeeting,

    /// Go back from the leave screen to the joining screen
    ReturnToJoin,

    /// Close the error modal
    AcknowledgeError,

    /// Cancel every pending timer
    Teardown,

    // ─────────────────────────────────────────────────────────
    // Device Reconciliation
    // ─────────────────────────────────────────────────────────
    /// Switch the outbound device of `kind` while in the meeting
    ChangeDevice {
        kind: DeviceKind,
        device: DeviceRef,
    },
    DeviceDisabled {
        kind: DeviceKind,
        seq: SequenceId,
    },
    DeviceAcquired {
        kind: DeviceKind,
        seq: SequenceId,
        track: TrackId,
    },
    DeviceApplied {
        kind: DeviceKind,
        seq: SequenceId,
    },
    DeviceStepFailed {
        kind: DeviceKind,
        seq: SequenceId,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // In-meeting
    // ─────────────────────────────────────────────────────────
    /// Broadcast a hand raise for the local participant
    RaiseHand,
    /// Replace the chat input draft
    SetChatDraft(String),
    /// Publish a chat message
    SendChat(String),
    /// Open `panel`, or close the sidebar if `panel` is already open
    ToggleSidebar(SidebarPanel),
    CloseSidebar,
    ViewportResized(Viewport),
    DismissNotice(u64),

    /// A fire-and-forget session call failed
    ActionFailed {
        action: &'static str,
        error: String,
        recoverable: bool,
    },
}
