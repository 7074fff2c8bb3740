//! Configuration types for the ILS client
//!
//! Defines `Settings` (`.ils/config.toml`) and its sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default notification sound
pub const DEFAULT_NOTIFICATION_SOUND: &str =
    "https://static.videosdk.live/prebuilt/notification.mp3";
/// Default sound for normal SDK errors
pub const DEFAULT_ERROR_SOUND: &str =
    "https://static.videosdk.live/prebuilt/notification_err.mp3";
/// Default sound for critical SDK errors
pub const DEFAULT_CRITICAL_ERROR_SOUND: &str =
    "https://static.videosdk.live/prebuilt/notification_critical_err.mp3";

/// Application settings (.ils/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub timing: TimingSettings,

    #[serde(default)]
    pub sounds: SoundSettings,

    #[serde(default)]
    pub bridge: BridgeSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Delays used by the meeting lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimingSettings {
    /// Pause between disabling a device and acquiring its replacement
    #[serde(default = "default_device_settle_ms")]
    pub device_settle_ms: u64,

    /// How long the denial screen stays before leaving
    #[serde(default = "default_denial_leave_ms")]
    pub denial_leave_ms: u64,

    /// Toast lifetime
    #[serde(default = "default_notice_auto_close_ms")]
    pub notice_auto_close_ms: u64,

    /// How long a raised hand stays visible in the participant list
    #[serde(default = "default_raised_hand_ttl_ms")]
    pub raised_hand_ttl_ms: u64,

    /// How long a reaction floats over the stage
    #[serde(default = "default_reaction_ttl_ms")]
    pub reaction_ttl_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            device_settle_ms: default_device_settle_ms(),
            denial_leave_ms: default_denial_leave_ms(),
            notice_auto_close_ms: default_notice_auto_close_ms(),
            raised_hand_ttl_ms: default_raised_hand_ttl_ms(),
            reaction_ttl_ms: default_reaction_ttl_ms(),
        }
    }
}

impl TimingSettings {
    pub fn device_settle(&self) -> Duration {
        Duration::from_millis(self.device_settle_ms)
    }

    pub fn denial_leave(&self) -> Duration {
        Duration::from_millis(self.denial_leave_ms)
    }

    pub fn notice_auto_close(&self) -> Duration {
        Duration::from_millis(self.notice_auto_close_ms)
    }

    pub fn raised_hand_ttl(&self) -> Duration {
        Duration::from_millis(self.raised_hand_ttl_ms)
    }

    pub fn reaction_ttl(&self) -> Duration {
        Duration::from_millis(self.reaction_ttl_ms)
    }
}

fn default_device_settle_ms() -> u64 {
    500
}

fn default_denial_leave_ms() -> u64 {
    3000
}

fn default_notice_auto_close_ms() -> u64 {
    4000
}

fn default_raised_hand_ttl_ms() -> u64 {
    15_000
}

fn default_reaction_ttl_ms() -> u64 {
    2500
}

/// Audio cue URLs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SoundSettings {
    #[serde(default = "default_notification_sound")]
    pub notification: String,

    #[serde(default = "default_error_sound")]
    pub error: String,

    #[serde(default = "default_critical_error_sound")]
    pub critical_error: String,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            notification: default_notification_sound(),
            error: default_error_sound(),
            critical_error: default_critical_error_sound(),
        }
    }
}

fn default_notification_sound() -> String {
    DEFAULT_NOTIFICATION_SOUND.to_string()
}

fn default_error_sound() -> String {
    DEFAULT_ERROR_SOUND.to_string()
}

fn default_critical_error_sound() -> String {
    DEFAULT_CRITICAL_ERROR_SOUND.to_string()
}

/// How to launch the SDK bridge process
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BridgeSettings {
    #[serde(default = "default_bridge_command")]
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            command: default_bridge_command(),
            args: Vec::new(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl BridgeSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_bridge_command() -> String {
    "videosdk-bridge".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Chat lines kept for the sidebar
    #[serde(default = "default_chat_history")]
    pub chat_history: usize,

    /// Logical pixels per terminal column, used to classify the viewport
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: u32,

    /// Logical pixels per terminal row
    #[serde(default = "default_cell_height_px")]
    pub cell_height_px: u32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            chat_history: default_chat_history(),
            cell_width_px: default_cell_width_px(),
            cell_height_px: default_cell_height_px(),
        }
    }
}

fn default_chat_history() -> usize {
    200
}

fn default_cell_width_px() -> u32 {
    8
}

fn default_cell_height_px() -> u32 {
    16
}
