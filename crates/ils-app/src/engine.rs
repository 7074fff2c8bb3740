//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the TEA state, the message channel, the session
//! collaborator and the virtual clock that drives timers. Frontends feed it
//! messages and subscribe to [`EngineEvent`]s.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use ils_core::prelude::*;
use ils_core::{ErrorNotice, LifecyclePhase};
use ils_sdk::SessionEvent;

use crate::actions::SessionBackend;
use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::AppState;
use crate::view::Screen;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to detect
/// what changed and emit appropriate EngineEvents.
#[derive(Debug, Clone)]
struct StateSnapshot {
    phase: LifecyclePhase,
    screen: Screen,
    mode_revision: u64,
    last_notice_id: u64,
    error_notice: Option<ErrorNotice>,
    device_outcomes: u64,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            phase: state.phase,
            screen: state.screen(),
            mode_revision: state.mode_revision,
            last_notice_id: state.notices.last_id(),
            error_notice: state.error_notice.clone(),
            device_outcomes: state.device_outcomes,
        }
    }
}

/// Orchestration engine for the prebuilt client.
///
/// Encapsulates everything shared between the TUI and headless runners:
/// - TEA state management
/// - Message channel
/// - Session collaborator
/// - Virtual clock for timers
/// - Event broadcasting for frontends
pub struct Engine<S> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, bridge events).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    session: S,

    /// Origin of the virtual clock
    started_at: Instant,

    event_tx: broadcast::Sender<EngineEvent>,
}

impl<S: SessionBackend> Engine<S> {
    /// Create an engine around `session`.
    ///
    /// Creates the message channel (capacity 256), spawns the signal handler
    /// and starts the virtual clock. Must be called inside a tokio runtime.
    pub fn new(settings: Settings, session: S) -> Self {
        let state = AppState::with_settings(settings);

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        signals::spawn_signal_handler(msg_tx.clone());

        let (event_tx, _) = broadcast::channel(256);

        Self {
            state,
            msg_tx,
            msg_rx,
            session,
            started_at: Instant::now(),
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// If the subscriber falls behind (buffer full), older events are
    /// dropped. Use `broadcast::error::RecvError::Lagged` to detect this.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Forward bridge session events into the message channel
    pub fn forward_session_events(&self, mut events: mpsc::Receiver<SessionEvent>) {
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let msg = match event {
                    SessionEvent::Sdk(event) => Message::Sdk(event),
                    SessionEvent::BridgeExited { code } => Message::BridgeExited { code },
                };
                if msg_tx.send(msg).await.is_err() {
                    break;
                }
            }
            debug!("Session event forwarder stopped");
        });
    }

    /// Time on the virtual clock
    pub fn now(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Wall-clock instant at which the next timer is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state
            .timers
            .next_deadline()
            .map(|due| self.started_at + due)
    }

    /// Fire every timer due at the current time
    pub fn tick(&mut self) {
        let now = self.now();
        self.process_message(Message::Tick { now });
    }

    /// Process a single message through the TEA update cycle.
    ///
    /// Timers due before the message arrived fire first. Emits EngineEvents
    /// based on state changes detected by comparing before/after snapshots.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        if !matches!(msg, Message::Tick { .. }) {
            let now = self.now();
            self.dispatch(Message::Tick { now });
        }
        self.dispatch(msg);

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    fn dispatch(&mut self, msg: Message) {
        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.session,
            &self.event_tx,
        );
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for spawning input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Stop timers and notify subscribers. The caller shuts the session down.
    pub fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);
        self.process_message(Message::Teardown);
        info!("Engine shut down");
    }

    /// Emit EngineEvents based on state changes after processing.
    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.phase != post.phase {
            self.emit(EngineEvent::PhaseChanged {
                old_phase: pre.phase,
                new_phase: post.phase,
            });
        }

        if pre.screen != post.screen {
            self.emit(EngineEvent::ScreenChanged {
                screen: post.screen.clone(),
            });
        }

        if pre.mode_revision != post.mode_revision {
            self.emit(EngineEvent::ModeChanged {
                mode: self.state.mode,
                revision: post.mode_revision,
            });
        }

        for notice in self.state.notices.newer_than(pre.last_notice_id) {
            self.emit(EngineEvent::NoticeShown {
                notice: notice.clone(),
            });
        }

        if pre.error_notice != post.error_notice {
            self.emit(EngineEvent::ErrorNoticeChanged {
                notice: post.error_notice.clone(),
            });
        }

        if pre.device_outcomes != post.device_outcomes {
            if let Some(outcome) = &self.state.last_device_outcome {
                let event = match &outcome.error {
                    None => EngineEvent::DeviceReconciled {
                        kind: outcome.kind,
                        device: outcome.device.clone(),
                    },
                    Some(error) => EngineEvent::DeviceFailed {
                        kind: outcome.kind,
                        device: outcome.device.clone(),
                        error: error.clone(),
                    },
                };
                self.emit(event);
            }
        }
    }

    fn emit(&self, event: EngineEvent) {
        trace!("Engine event: {}", event.event_type());
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}
