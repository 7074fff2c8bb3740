//! View composition
//!
//! [`compose`] maps lifecycle phase, mode and viewport to the screen a
//! frontend should draw. It is a pure function: the same inputs always give
//! the same [`Screen`]. Frontends render content from `AppState` inside the
//! regions described here.

use serde::Serialize;

use ils_core::{HlsStatus, LifecyclePhase, Mode, Viewport, ViewportClass};

pub const TOP_BAR_HEIGHT: u32 = 60;
pub const BOTTOM_BAR_HEIGHT: u32 = 60;

pub const STREAM_WAITING_TITLE: &str = "Waiting for host to start live stream.";
pub const STREAM_WAITING_SUBTITLE: &str = "Meanwhile, take a few deep breaths.";
pub const STREAM_STOPPED_TITLE: &str = "Host has stopped the live streaming.";

/// Which sidebar panel is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarPanel {
    Chat,
    Participants,
}

impl SidebarPanel {
    pub fn title(&self) -> &'static str {
        match self {
            SidebarPanel::Chat => "Chat",
            SidebarPanel::Participants => "Participants",
        }
    }
}

/// Top-level screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Joining,
    WaitingToJoin { entry_denied: bool },
    Leave,
    InMeeting(MeetingLayout),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Joining => "joining",
            Screen::WaitingToJoin { .. } => "waiting_to_join",
            Screen::Leave => "leave",
            Screen::InMeeting(_) => "in_meeting",
        }
    }
}

/// Regions of the in-meeting screen, in logical pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingLayout {
    pub mode: Mode,
    pub viewport_class: ViewportClass,
    /// 0 when the top bar is hidden
    pub top_bar_height: u32,
    pub bottom_bar_height: u32,
    pub stage: Stage,
    pub sidebar: Option<SidebarLayout>,
}

/// Main content area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    /// Conference view
    Interactive {
        presenter_pane: bool,
        participant_grid: bool,
        presenter_height: u32,
    },
    /// HLS stream player
    Stream { width: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SidebarLayout {
    pub panel: SidebarPanel,
    pub width: u32,
    pub height: u32,
}

/// Sidebar width for a viewport class
pub fn sidebar_width(class: ViewportClass) -> u32 {
    match class {
        ViewportClass::WideDesktop => 400,
        ViewportClass::Desktop => 360,
        ViewportClass::Tablet => 320,
        ViewportClass::Mobile => 280,
    }
}

/// Compose the screen for the current state
pub fn compose(
    phase: LifecyclePhase,
    mode: Mode,
    viewport: Viewport,
    is_presenting: bool,
    sidebar: Option<SidebarPanel>,
) -> Screen {
    match phase {
        LifecyclePhase::NotStarted => Screen::Joining,
        LifecyclePhase::WaitingForEntry => Screen::WaitingToJoin {
            entry_denied: false,
        },
        LifecyclePhase::EntryDenied => Screen::WaitingToJoin { entry_denied: true },
        LifecyclePhase::Left => Screen::Leave,
        LifecyclePhase::Joined => {
            Screen::InMeeting(meeting_layout(mode, viewport, is_presenting, sidebar))
        }
    }
}

fn meeting_layout(
    mode: Mode,
    viewport: Viewport,
    is_presenting: bool,
    sidebar: Option<SidebarPanel>,
) -> MeetingLayout {
    let class = viewport.class();
    let interactive = mode.is_interactive();

    let top_bar_height = if interactive && !class.is_compact() {
        TOP_BAR_HEIGHT
    } else {
        0
    };

    let stage = if interactive {
        Stage::Interactive {
            presenter_pane: is_presenting,
            participant_grid: !(is_presenting && class == ViewportClass::Mobile),
            presenter_height: viewport
                .height
                .saturating_sub(TOP_BAR_HEIGHT + BOTTOM_BAR_HEIGHT),
        }
    } else {
        let reserved = match sidebar {
            Some(_) if !class.is_compact() => sidebar_width(class),
            _ => 0,
        };
        Stage::Stream {
            width: viewport.width.saturating_sub(reserved),
        }
    };

    let sidebar = sidebar.map(|panel| {
        let height = if !interactive || class.is_compact() {
            viewport.height.saturating_sub(BOTTOM_BAR_HEIGHT)
        } else {
            viewport
                .height
                .saturating_sub(TOP_BAR_HEIGHT + BOTTOM_BAR_HEIGHT)
        };
        SidebarLayout {
            panel,
            width: sidebar_width(class),
            height,
        }
    });

    MeetingLayout {
        mode,
        viewport_class: class,
        top_bar_height,
        bottom_bar_height: BOTTOM_BAR_HEIGHT,
        stage,
        sidebar,
    }
}

/// Whether closing the client should ask for confirmation
pub fn leave_guard_enabled(viewport: Viewport) -> bool {
    viewport.class() == ViewportClass::Mobile
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream viewer
// ─────────────────────────────────────────────────────────────────────────────

/// Stream state observed since joining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HlsAfterJoin {
    Started,
    Stopped,
}

/// HLS state as seen by a broadcast-only viewer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HlsViewerState {
    pub status: HlsStatus,
    pub downstream_url: Option<String>,
    pub after_join: Option<HlsAfterJoin>,
}

impl HlsViewerState {
    pub fn update(&mut self, status: HlsStatus, downstream_url: Option<String>) {
        self.status = status;
        if downstream_url.is_some() || status == HlsStatus::Stopped {
            self.downstream_url = downstream_url;
        }
        match status {
            HlsStatus::Started => self.after_join = Some(HlsAfterJoin::Started),
            HlsStatus::Stopped => self.after_join = Some(HlsAfterJoin::Stopped),
            _ => {}
        }
    }
}

/// What the stream viewer shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HlsViewerContent {
    Playing {
        url: String,
    },
    Placeholder {
        title: &'static str,
        subtitle: Option<&'static str>,
        animation_size: u32,
        looping: bool,
    },
}

/// Placeholder animation edge length for a viewport class
pub fn placeholder_animation_size(class: ViewportClass) -> u32 {
    if class.is_compact() {
        180
    } else {
        240
    }
}

pub fn hls_viewer_content(hls: &HlsViewerState, viewport: Viewport) -> HlsViewerContent {
    let playable = matches!(hls.status, HlsStatus::Playable | HlsStatus::Stopping);
    if let (true, Some(url)) = (playable, &hls.downstream_url) {
        return HlsViewerContent::Playing { url: url.clone() };
    }

    let stopped = hls.after_join == Some(HlsAfterJoin::Stopped);
    HlsViewerContent::Placeholder {
        title: if stopped {
            STREAM_STOPPED_TITLE
        } else {
            STREAM_WAITING_TITLE
        },
        subtitle: (!stopped).then_some(STREAM_WAITING_SUBTITLE),
        animation_size: placeholder_animation_size(viewport.class()),
        looping: !stopped,
    }
}
