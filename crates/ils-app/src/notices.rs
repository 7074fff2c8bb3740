//! Toast notifications and sound cues

use std::time::Duration;

use serde::Serialize;

use ils_core::Severity;

use crate::config::SoundSettings;

/// Audio cue played alongside a toast or error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Notification,
    Error,
    CriticalError,
}

impl SoundCue {
    pub fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical => SoundCue::CriticalError,
            Severity::Normal => SoundCue::Error,
        }
    }

    /// Resolve the configured URL for this cue
    pub fn url<'a>(&self, sounds: &'a SoundSettings) -> &'a str {
        match self {
            SoundCue::Notification => &sounds.notification,
            SoundCue::Error => &sounds.error,
            SoundCue::CriticalError => &sounds.critical_error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPosition {
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastTheme {
    Light,
}

/// A transient toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub text: String,
    pub sound: SoundCue,
    pub position: ToastPosition,
    pub theme: ToastTheme,
    #[serde(serialize_with = "serialize_millis")]
    pub auto_close: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Visible toasts, oldest first. Each toast is dismissed independently.
#[derive(Debug, Clone, Default)]
pub struct NoticeStack {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a toast and return it
    pub fn push(
        &mut self,
        text: impl Into<String>,
        sound: SoundCue,
        auto_close: Duration,
    ) -> &Notice {
        self.next_id += 1;
        self.notices.push(Notice {
            id: self.next_id,
            text: text.into(),
            sound,
            position: ToastPosition::BottomLeft,
            theme: ToastTheme::Light,
            auto_close,
        });
        &self.notices[self.notices.len() - 1]
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Toasts created after `id` was handed out
    pub fn newer_than(&self, id: u64) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.id > id)
    }

    /// Id of the most recently created toast (0 before the first)
    pub fn last_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
