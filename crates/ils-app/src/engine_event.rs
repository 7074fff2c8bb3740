//! Domain events emitted by the Engine for frontends
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner prints them as NDJSON; the TUI
//! uses `Sound` to ring the terminal bell.

use ils_core::{DeviceKind, DeviceRef, ErrorNotice, LifecyclePhase, Mode};

use crate::notices::{Notice, SoundCue};
use crate::view::Screen;

/// Domain events emitted by the Engine
#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────
    PhaseChanged {
        old_phase: LifecyclePhase,
        new_phase: LifecyclePhase,
    },

    /// The composed screen differs from the previous cycle
    ScreenChanged { screen: Screen },

    ModeChanged { mode: Mode, revision: u64 },

    // ─────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────
    /// A toast was pushed onto the stack
    NoticeShown { notice: Notice },

    /// An audio cue should play
    Sound { cue: SoundCue, url: String },

    /// The error modal was shown (`Some`) or acknowledged (`None`)
    ErrorNoticeChanged { notice: Option<ErrorNotice> },

    // ─────────────────────────────────────────────────────────
    // Devices
    // ─────────────────────────────────────────────────────────
    DeviceReconciled { kind: DeviceKind, device: DeviceRef },

    DeviceFailed {
        kind: DeviceKind,
        device: DeviceRef,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Engine Lifecycle
    // ─────────────────────────────────────────────────────────
    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PhaseChanged { .. } => "phase_changed",
            Self::ScreenChanged { .. } => "screen_changed",
            Self::ModeChanged { .. } => "mode_changed",
            Self::NoticeShown { .. } => "notice",
            Self::Sound { .. } => "sound",
            Self::ErrorNoticeChanged { .. } => "error_notice",
            Self::DeviceReconciled { .. } => "device_reconciled",
            Self::DeviceFailed { .. } => "device_failed",
            Self::Shutdown => "shutdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_event_type_labels() {
        assert_eq!(EngineEvent::Shutdown.event_type(), "shutdown");

        let event = EngineEvent::PhaseChanged {
            old_phase: LifecyclePhase::NotStarted,
            new_phase: LifecyclePhase::WaitingForEntry,
        };
        assert_eq!(event.event_type(), "phase_changed");

        let event = EngineEvent::Sound {
            cue: SoundCue::Notification,
            url: "https://example.com/a.mp3".to_string(),
        };
        assert_eq!(event.event_type(), "sound");

        let event = EngineEvent::ErrorNoticeChanged { notice: None };
        assert_eq!(event.event_type(), "error_notice");
    }
}
