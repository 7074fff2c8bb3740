//! Application state (Model in TEA pattern)

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use ils_core::{
    ChatLine, DeviceInfo, DeviceKind, DeviceRef, ErrorNotice, LifecyclePhase, Mode, Participant,
    Poll, RecordingStatus, SdkEvent, SessionConfig, Viewport,
};

use crate::config::Settings;
use crate::confirm_dialog::ConfirmDialogState;
use crate::devices::DeviceReconciler;
use crate::notices::NoticeStack;
use crate::scheduler::{Scheduler, TimerId};
use crate::view::{self, HlsViewerState, Screen, SidebarPanel};

/// Text field focused on the joining screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinField {
    #[default]
    Token,
    MeetingId,
    Name,
}

impl JoinField {
    pub fn next(&self) -> Self {
        match self {
            JoinField::Token => JoinField::MeetingId,
            JoinField::MeetingId => JoinField::Name,
            JoinField::Name => JoinField::Token,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            JoinField::Token => JoinField::Name,
            JoinField::MeetingId => JoinField::Token,
            JoinField::Name => JoinField::MeetingId,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JoinField::Token => "Token",
            JoinField::MeetingId => "Meeting ID",
            JoinField::Name => "Name",
        }
    }
}

/// A participant's raised hand, timestamped on the virtual clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaisedHand {
    pub participant_id: String,
    pub raised_at: Duration,
}

/// Open polls kept for the overlay; the oldest is dropped past this
const MAX_ACTIVE_POLLS: usize = 4;
/// Reactions floating at once; the oldest is dropped past this
const MAX_REACTIONS: usize = 16;

/// A poll received during the meeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePoll {
    pub poll: Poll,
    pub sender_name: String,
    pub opened_at: Duration,
}

/// An emoji reaction floating over the stage until its timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlyingReaction {
    pub id: u64,
    pub emoji: String,
    pub sender_name: String,
}

/// Result of one finished device reconciliation sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOutcome {
    pub kind: DeviceKind,
    pub device: DeviceRef,
    /// `None` when the new track was applied
    pub error: Option<String>,
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    /// Lifecycle phase; written only by the lifecycle handlers
    pub phase: LifecyclePhase,

    /// Joining screen values; frozen once the meeting starts
    pub config: SessionConfig,
    pub join_focus: JoinField,
    /// Validation or join failure shown on the joining screen
    pub join_error: Option<String>,
    pub available_devices: BTreeMap<DeviceKind, Vec<DeviceInfo>>,

    /// Present while a session handle exists
    pub local_participant_id: Option<String>,
    /// Admission events that arrived before the join call returned
    pub pending_entry: Vec<SdkEvent>,

    /// Broadcast mode; written only by the mode listener
    pub mode: Mode,
    /// Bumped every time `mode` changes value
    pub mode_revision: u64,

    /// Error modal; newest replaces prior
    pub error_notice: Option<ErrorNotice>,
    pub notices: NoticeStack,

    pub timers: Scheduler,
    pub denial_timer: Option<TimerId>,

    pub devices: DeviceReconciler,
    /// Devices applied by completed reconciliation sequences
    pub active_devices: BTreeMap<DeviceKind, DeviceRef>,
    pub last_device_outcome: Option<DeviceOutcome>,
    /// Count of finished sequences, successful or not
    pub device_outcomes: u64,

    pub participants: Vec<Participant>,
    pub presenter_id: Option<String>,
    pub raised_hands: Vec<RaisedHand>,
    pub polls: Vec<ActivePoll>,
    pub reactions: VecDeque<FlyingReaction>,
    next_reaction_id: u64,
    pub chat: VecDeque<ChatLine>,
    pub chat_draft: String,
    pub hls: HlsViewerState,
    pub recording: Option<RecordingStatus>,

    pub sidebar: Option<SidebarPanel>,
    pub viewport: Viewport,
    pub confirm_dialog: Option<ConfirmDialogState>,

    pub settings: Settings,

    /// Leave has been requested from the session for this meeting
    pub leave_sent: bool,
    pub quitting: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            phase: LifecyclePhase::NotStarted,
            config: SessionConfig::default(),
            join_focus: JoinField::default(),
            join_error: None,
            available_devices: BTreeMap::new(),
            local_participant_id: None,
            pending_entry: Vec::new(),
            mode: Mode::default(),
            mode_revision: 0,
            error_notice: None,
            notices: NoticeStack::new(),
            timers: Scheduler::new(),
            denial_timer: None,
            devices: DeviceReconciler::new(),
            active_devices: BTreeMap::new(),
            last_device_outcome: None,
            device_outcomes: 0,
            participants: Vec::new(),
            presenter_id: None,
            raised_hands: Vec::new(),
            polls: Vec::new(),
            reactions: VecDeque::new(),
            next_reaction_id: 0,
            chat: VecDeque::new(),
            chat_draft: String::new(),
            hls: HlsViewerState::default(),
            recording: None,
            sidebar: None,
            viewport: Viewport::default(),
            confirm_dialog: None,
            settings,
            leave_sent: false,
            quitting: false,
        }
    }

    /// Compose the screen for the current state
    pub fn screen(&self) -> Screen {
        view::compose(
            self.phase,
            self.mode,
            self.viewport,
            self.is_presenting(),
            self.sidebar,
        )
    }

    pub fn is_presenting(&self) -> bool {
        self.presenter_id.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    pub fn is_local(&self, participant_id: &str) -> bool {
        self.local_participant_id.as_deref() == Some(participant_id)
    }

    pub fn participant_name(&self, participant_id: &str) -> Option<&str> {
        self.participants
            .iter()
            .find(|p| p.id == participant_id)
            .map(|p| p.name.as_str())
    }

    pub fn has_raised_hand(&self, participant_id: &str) -> bool {
        self.raised_hands
            .iter()
            .any(|h| h.participant_id == participant_id)
    }

    /// Record a poll, replacing one with the same id
    pub fn open_poll(&mut self, poll: ActivePoll) {
        self.polls.retain(|p| p.poll.id != poll.poll.id);
        self.polls.push(poll);
        if self.polls.len() > MAX_ACTIVE_POLLS {
            self.polls.remove(0);
        }
    }

    pub fn close_poll(&mut self, poll_id: &str) {
        self.polls.retain(|p| p.poll.id != poll_id);
    }

    /// Add a floating reaction and return its id
    pub fn push_reaction(&mut self, emoji: String, sender_name: String) -> u64 {
        self.next_reaction_id += 1;
        let id = self.next_reaction_id;
        self.reactions.push_back(FlyingReaction {
            id,
            emoji,
            sender_name,
        });
        while self.reactions.len() > MAX_REACTIONS {
            self.reactions.pop_front();
        }
        id
    }

    pub fn remove_reaction(&mut self, id: u64) {
        self.reactions.retain(|r| r.id != id);
    }

    /// Append to the chat buffer, dropping the oldest lines past the limit
    pub fn push_chat(&mut self, line: ChatLine) {
        self.chat.push_back(line);
        while self.chat.len() > self.settings.ui.chat_history.max(1) {
            self.chat.pop_front();
        }
    }

    pub fn devices_for(&self, kind: DeviceKind) -> &[DeviceInfo] {
        self.available_devices
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The device after `current` in the enumerated list, wrapping to the
    /// system default at the end
    pub fn next_device(&self, kind: DeviceKind, current: &DeviceRef) -> DeviceRef {
        let devices = self.devices_for(kind);
        let position = current
            .id
            .as_deref()
            .and_then(|id| devices.iter().position(|d| d.id == id));
        match position {
            None => devices
                .first()
                .cloned()
                .map(DeviceRef::from)
                .unwrap_or_default(),
            Some(i) => devices
                .get(i + 1)
                .cloned()
                .map(DeviceRef::from)
                .unwrap_or_default(),
        }
    }

    /// Device currently published for `kind` in the meeting
    pub fn current_device(&self, kind: DeviceKind) -> DeviceRef {
        self.active_devices
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| self.config.selected_device(kind).clone())
    }

    /// Forget everything learned during the last meeting
    pub(crate) fn reset_meeting(&mut self) {
        self.local_participant_id = None;
        self.pending_entry.clear();
        self.participants.clear();
        self.presenter_id = None;
        self.raised_hands.clear();
        self.polls.clear();
        self.reactions.clear();
        self.chat.clear();
        self.chat_draft.clear();
        self.hls = HlsViewerState::default();
        self.recording = None;
        self.sidebar = None;
        self.active_devices.clear();
        self.devices.reset();
        self.leave_sent = false;
    }
}
