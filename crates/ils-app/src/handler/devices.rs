//! Device reconciliation handlers
//!
//! Turns [`ReconcileStep`]s from the reconciler into actions and settle
//! timers, and feeds action results back into it.

use ils_core::prelude::*;
use ils_core::{DeviceInfo, DeviceKind, DeviceRef, LifecyclePhase, TrackId};

use crate::devices::{Completion, ReconcileStep, SequenceId};
use crate::scheduler::TimerKind;
use crate::state::{AppState, DeviceOutcome};

use super::{UpdateAction, UpdateResult};

/// Perform one step: an action for session calls, a timer for the settle delay
fn run_step(state: &mut AppState, step: ReconcileStep) -> Option<UpdateAction> {
    match step {
        ReconcileStep::Disable { kind, seq } => Some(UpdateAction::DisableDevice { kind, seq }),
        ReconcileStep::Settle { kind, seq } => {
            let delay = state.settings.timing.device_settle();
            state
                .timers
                .schedule(delay, TimerKind::DeviceSettle { kind, seq });
            None
        }
        ReconcileStep::Acquire { kind, seq, device } => {
            Some(UpdateAction::AcquireDevice { kind, seq, device })
        }
        ReconcileStep::Apply { kind, seq, track } => {
            Some(UpdateAction::ApplyTrack { kind, seq, track })
        }
    }
}

fn step_result(state: &mut AppState, step: Option<ReconcileStep>) -> UpdateResult {
    match step.and_then(|s| run_step(state, s)) {
        Some(action) => UpdateResult::action(action),
        None => UpdateResult::none(),
    }
}

/// Start a sequence for every enabled kind with a non-default device
pub(crate) fn reconcile_on_join(state: &mut AppState) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    for kind in DeviceKind::ALL {
        if !state.config.device_enabled(kind) {
            continue;
        }
        let device = state.config.selected_device(kind).clone();
        if device.is_default() {
            continue;
        }
        debug!("Reconciling {} to {}", kind.label(), device.display_name());
        if let Some(action) = state
            .devices
            .request(kind, device)
            .and_then(|step| run_step(state, step))
        {
            actions.push(action);
        }
    }
    actions
}

pub(crate) fn handle_change_device(
    state: &mut AppState,
    kind: DeviceKind,
    device: DeviceRef,
) -> UpdateResult {
    if state.phase != LifecyclePhase::Joined {
        debug!("Ignoring {} change outside the meeting", kind.label());
        return UpdateResult::none();
    }
    info!("Switching {} to {}", kind.label(), device.display_name());
    let step = state.devices.request(kind, device);
    step_result(state, step)
}

pub(crate) fn handle_disabled(
    state: &mut AppState,
    kind: DeviceKind,
    seq: SequenceId,
) -> UpdateResult {
    let step = state.devices.disabled(kind, seq);
    step_result(state, step)
}

pub(crate) fn handle_settled(
    state: &mut AppState,
    kind: DeviceKind,
    seq: SequenceId,
) -> UpdateResult {
    let step = state.devices.settled(kind, seq);
    step_result(state, step)
}

pub(crate) fn handle_acquired(
    state: &mut AppState,
    kind: DeviceKind,
    seq: SequenceId,
    track: TrackId,
) -> UpdateResult {
    let step = state.devices.acquired(kind, seq, track);
    step_result(state, step)
}

pub(crate) fn handle_applied(
    state: &mut AppState,
    kind: DeviceKind,
    seq: SequenceId,
) -> UpdateResult {
    match state.devices.applied(kind, seq) {
        Some(completion) => {
            info!("{} switched to {}", kind.label(), completion.device.display_name());
            state.active_devices.insert(kind, completion.device.clone());
            finish(state, kind, completion, None)
        }
        None => UpdateResult::none(),
    }
}

/// A failed step ends its sequence without rollback; the session continues
pub(crate) fn handle_step_failed(
    state: &mut AppState,
    kind: DeviceKind,
    seq: SequenceId,
    error: String,
) -> UpdateResult {
    match state.devices.failed(kind, seq) {
        Some(completion) => {
            warn!(
                "Failed to switch {} to {}: {}",
                kind.label(),
                completion.device.display_name(),
                error
            );
            finish(state, kind, completion, Some(error))
        }
        None => {
            debug!("Stale {} failure for sequence {}: {}", kind.label(), seq, error);
            UpdateResult::none()
        }
    }
}

fn finish(
    state: &mut AppState,
    kind: DeviceKind,
    completion: Completion,
    error: Option<String>,
) -> UpdateResult {
    state.last_device_outcome = Some(DeviceOutcome {
        kind,
        device: completion.device,
        error,
    });
    state.device_outcomes += 1;
    step_result(state, completion.next)
}

pub(crate) fn handle_enumerate(_state: &mut AppState) -> UpdateResult {
    UpdateResult::action(UpdateAction::EnumerateDevices)
}

pub(crate) fn handle_devices_enumerated(
    state: &mut AppState,
    kind: DeviceKind,
    devices: Vec<DeviceInfo>,
) -> UpdateResult {
    debug!("Found {} {} device(s)", devices.len(), kind.label());
    state.available_devices.insert(kind, devices);
    UpdateResult::none()
}
