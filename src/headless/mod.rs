//! Headless mode - NDJSON event output for scripted use
//!
//! Instead of drawing the TUI, `ils --headless` starts the meeting right
//! away and prints one JSON object per line for every engine event.
//!
//! # Example Output
//!
//! ```json
//! {"event":"phase_changed","old_phase":"not_started","new_phase":"waiting_for_entry","timestamp":1704700001000}
//! {"event":"sound","cue":"notification","url":"https://static.videosdk.live/prebuilt/notification.mp3","timestamp":1704700002000}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use ils_app::notices::SoundCue;
use ils_app::{EngineEvent, Screen};
use ils_core::{DeviceKind, DeviceRef, ErrorNotice, Mode};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    PhaseChanged {
        old_phase: &'static str,
        new_phase: &'static str,
        timestamp: i64,
    },

    ScreenChanged { screen: Screen, timestamp: i64 },

    Notice { id: u64, text: String, timestamp: i64 },

    Sound {
        cue: SoundCue,
        url: String,
        timestamp: i64,
    },

    /// `notice` is null once the modal is acknowledged
    ErrorNotice {
        notice: Option<ErrorNotice>,
        timestamp: i64,
    },

    ModeChanged {
        mode: Mode,
        revision: u64,
        timestamp: i64,
    },

    DeviceReconciled {
        kind: DeviceKind,
        device: DeviceRef,
        timestamp: i64,
    },

    DeviceFailed {
        kind: DeviceKind,
        device: DeviceRef,
        error: String,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Map an engine event to its headless line; `Shutdown` has none
    pub fn from_engine_event(event: &EngineEvent) -> Option<Self> {
        let timestamp = Self::now();
        let event = match event {
            EngineEvent::PhaseChanged {
                old_phase,
                new_phase,
            } => Self::PhaseChanged {
                old_phase: old_phase.label(),
                new_phase: new_phase.label(),
                timestamp,
            },
            EngineEvent::ScreenChanged { screen } => Self::ScreenChanged {
                screen: screen.clone(),
                timestamp,
            },
            EngineEvent::ModeChanged { mode, revision } => Self::ModeChanged {
                mode: *mode,
                revision: *revision,
                timestamp,
            },
            EngineEvent::NoticeShown { notice } => Self::Notice {
                id: notice.id,
                text: notice.text.clone(),
                timestamp,
            },
            EngineEvent::Sound { cue, url } => Self::Sound {
                cue: *cue,
                url: url.clone(),
                timestamp,
            },
            EngineEvent::ErrorNoticeChanged { notice } => Self::ErrorNotice {
                notice: notice.clone(),
                timestamp,
            },
            EngineEvent::DeviceReconciled { kind, device } => Self::DeviceReconciled {
                kind: *kind,
                device: device.clone(),
                timestamp,
            },
            EngineEvent::DeviceFailed {
                kind,
                device,
                error,
            } => Self::DeviceFailed {
                kind: *kind,
                device: device.clone(),
                error: error.clone(),
                timestamp,
            },
            EngineEvent::Shutdown => return None,
        };
        Some(event)
    }
}
