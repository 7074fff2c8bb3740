//! Test utilities for session consumers
//!
//! [`FakeSession`] implements [`RealtimeSession`] and [`MediaDevices`]
//! in memory, recording every call so tests can assert on ordering.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use ils_core::prelude::*;
use ils_core::{DeviceInfo, DeviceKind, DeviceRef, TrackId};

use crate::session::{JoinRequest, JoinedSession, MediaDevices, Quality, RealtimeSession};

/// A call observed by [`FakeSession`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Join(JoinRequest),
    Leave,
    Disable(DeviceKind),
    Acquire(DeviceKind, DeviceRef),
    Apply(DeviceKind, TrackId),
    SetQuality(String, Quality),
    Publish(String, String),
    Enumerate(DeviceKind),
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<SessionCall>,
    local_participant_id: String,
    join_error: Option<String>,
    failing_devices: HashSet<DeviceKind>,
    acquire_delay: Duration,
    devices: HashMap<DeviceKind, Vec<DeviceInfo>>,
    acquires_in_flight: HashMap<DeviceKind, usize>,
    max_acquires_in_flight: HashMap<DeviceKind, usize>,
    next_track: u32,
}

/// In-memory session double
#[derive(Debug, Clone)]
pub struct FakeSession {
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeSession {
    fn default() -> Self {
        Self::new("local-1")
    }
}

impl FakeSession {
    pub fn new(local_participant_id: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                local_participant_id: local_participant_id.to_string(),
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `join` fail with `message`
    pub fn with_join_error(self, message: &str) -> Self {
        self.lock().join_error = Some(message.to_string());
        self
    }

    /// Make `acquire_device` fail for `kind`
    pub fn with_failing_device(self, kind: DeviceKind) -> Self {
        self.lock().failing_devices.insert(kind);
        self
    }

    /// Delay every `acquire_device` call (uses tokio time, so paused clocks apply)
    pub fn with_acquire_delay(self, delay: Duration) -> Self {
        self.lock().acquire_delay = delay;
        self
    }

    pub fn with_devices(self, kind: DeviceKind, devices: Vec<DeviceInfo>) -> Self {
        self.lock().devices.insert(kind, devices);
        self
    }

    /// All recorded calls in order
    pub fn calls(&self) -> Vec<SessionCall> {
        self.lock().calls.clone()
    }

    /// Recorded calls that touch devices of `kind`
    pub fn device_calls(&self, kind: DeviceKind) -> Vec<SessionCall> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                SessionCall::Disable(k) | SessionCall::Acquire(k, _) | SessionCall::Apply(k, _) => {
                    *k == kind
                }
                _ => false,
            })
            .collect()
    }

    /// Highest number of simultaneous `acquire_device` calls seen for `kind`
    pub fn max_acquires_in_flight(&self, kind: DeviceKind) -> usize {
        self.lock()
            .max_acquires_in_flight
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, call: SessionCall) {
        self.lock().calls.push(call);
    }
}

impl RealtimeSession for FakeSession {
    async fn join(&self, request: JoinRequest) -> Result<JoinedSession> {
        self.record(SessionCall::Join(request));
        let state = self.lock();
        match &state.join_error {
            Some(message) => Err(Error::join(message.clone())),
            None => Ok(JoinedSession {
                local_participant_id: state.local_participant_id.clone(),
            }),
        }
    }

    async fn leave(&self) -> Result<()> {
        self.record(SessionCall::Leave);
        Ok(())
    }

    async fn disable_device(&self, kind: DeviceKind) -> Result<()> {
        self.record(SessionCall::Disable(kind));
        Ok(())
    }

    async fn acquire_device(&self, kind: DeviceKind, device: &DeviceRef) -> Result<TrackId> {
        let delay = {
            let mut state = self.lock();
            state.calls.push(SessionCall::Acquire(kind, device.clone()));
            let in_flight = state.acquires_in_flight.entry(kind).or_insert(0);
            *in_flight += 1;
            let current = *in_flight;
            let max = state.max_acquires_in_flight.entry(kind).or_insert(0);
            *max = (*max).max(current);
            state.acquire_delay
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if let Some(in_flight) = state.acquires_in_flight.get_mut(&kind) {
            *in_flight -= 1;
        }
        if state.failing_devices.contains(&kind) {
            return Err(Error::device(kind.label(), "permission denied"));
        }
        state.next_track += 1;
        Ok(TrackId(format!("{}-track-{}", kind.label(), state.next_track)))
    }

    async fn apply_track(&self, kind: DeviceKind, track: &TrackId) -> Result<()> {
        self.record(SessionCall::Apply(kind, track.clone()));
        Ok(())
    }

    async fn set_participant_quality(&self, participant_id: &str, quality: Quality) -> Result<()> {
        self.record(SessionCall::SetQuality(participant_id.to_string(), quality));
        Ok(())
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        self.record(SessionCall::Publish(topic.to_string(), message.to_string()));
        Ok(())
    }
}

impl MediaDevices for FakeSession {
    async fn enumerate(&self, kind: DeviceKind) -> Result<Vec<DeviceInfo>> {
        self.record(SessionCall::Enumerate(kind));
        Ok(self.lock().devices.get(&kind).cloned().unwrap_or_default())
    }
}

/// Creates a test device
pub fn test_device(id: &str, label: &str) -> DeviceInfo {
    DeviceInfo {
        id: id.to_string(),
        label: label.to_string(),
    }
}
