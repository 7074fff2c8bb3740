//! Deterministic timer scheduler
//!
//! Timers live in application state and are driven by a virtual clock: the
//! engine feeds elapsed time through `Message::Tick`, tests feed it directly.
//! Nothing here sleeps.

use std::time::Duration;

use ils_core::DeviceKind;

use crate::devices::SequenceId;

/// Identity of a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    /// Leave the meeting after entry was denied
    DenialLeave,
    /// Remove a toast
    NoticeDismiss(u64),
    /// Settle delay inside a device reconciliation sequence
    DeviceSettle { kind: DeviceKind, seq: SequenceId },
    /// Lower a raised hand
    RaisedHandExpiry(String),
    /// Close a poll that carried a timeout
    PollExpiry(String),
    /// Remove a floating reaction
    ReactionExpiry(u64),
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    due: Duration,
    kind: TimerKind,
}

/// Virtual-time timer wheel
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `kind` to fire `delay` after the current virtual time
    pub fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            kind,
        });
        id
    }

    /// Cancel a timer; returns false if it already fired or never existed
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel every timer matching `predicate`, returning how many were removed
    pub fn cancel_where(&mut self, predicate: impl Fn(&TimerKind) -> bool) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| !predicate(&t.kind));
        before - self.timers.len()
    }

    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    /// Move the clock to `now` and return the timers that became due.
    ///
    /// Fired timers are ordered by due time, then by scheduling order. The
    /// clock never moves backwards.
    pub fn advance_to(&mut self, now: Duration) -> Vec<TimerKind> {
        if now > self.now {
            self.now = now;
        }

        let current = self.now;
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.due <= current {
                due.push(t.clone());
                false
            } else {
                true
            }
        });

        due.sort_by_key(|t| (t.due, t.id));
        due.into_iter().map(|t| t.kind).collect()
    }

    /// Earliest pending due time
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
