//! Per-device reconciliation queue
//!
//! Switching the outbound camera or microphone is a fixed sequence:
//! disable the active device, wait for the settle delay, acquire the new
//! device, apply the new track. Each [`DeviceKind`] runs at most one sequence
//! at a time; requests that arrive meanwhile wait in FIFO order. A failed
//! step ends the sequence without rollback and the next request starts.
//!
//! The reconciler is pure bookkeeping. It tells the handler which step to
//! perform next; the handler turns steps into actions and timers.

use std::collections::VecDeque;

use ils_core::{DeviceKind, DeviceRef, TrackId};

/// Identity of one reconciliation sequence
pub type SequenceId = u64;

/// Where an in-flight sequence currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceStage {
    Disabling,
    Settling,
    Acquiring,
    Applying(TrackId),
}

/// The next side effect a sequence needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileStep {
    Disable {
        kind: DeviceKind,
        seq: SequenceId,
    },
    /// Start the settle delay
    Settle {
        kind: DeviceKind,
        seq: SequenceId,
    },
    Acquire {
        kind: DeviceKind,
        seq: SequenceId,
        device: DeviceRef,
    },
    Apply {
        kind: DeviceKind,
        seq: SequenceId,
        track: TrackId,
    },
}

/// A finished sequence and whatever starts next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub device: DeviceRef,
    pub next: Option<ReconcileStep>,
}

#[derive(Debug, Clone)]
struct InFlight {
    seq: SequenceId,
    device: DeviceRef,
    stage: SequenceStage,
}

#[derive(Debug, Clone, Default)]
struct Lane {
    in_flight: Option<InFlight>,
    queue: VecDeque<DeviceRef>,
}

/// Serializes device switches per kind
#[derive(Debug, Clone, Default)]
pub struct DeviceReconciler {
    camera: Lane,
    microphone: Lane,
    next_seq: SequenceId,
}

impl DeviceReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lane(&self, kind: DeviceKind) -> &Lane {
        match kind {
            DeviceKind::Camera => &self.camera,
            DeviceKind::Microphone => &self.microphone,
        }
    }

    fn lane_mut(&mut self, kind: DeviceKind) -> &mut Lane {
        match kind {
            DeviceKind::Camera => &mut self.camera,
            DeviceKind::Microphone => &mut self.microphone,
        }
    }

    /// Request a switch to `device`.
    ///
    /// Returns the first step if the lane was idle; otherwise the request is
    /// queued behind the running sequence and `None` is returned.
    pub fn request(&mut self, kind: DeviceKind, device: DeviceRef) -> Option<ReconcileStep> {
        if self.lane(kind).in_flight.is_some() {
            self.lane_mut(kind).queue.push_back(device);
            return None;
        }
        Some(self.start(kind, device))
    }

    fn start(&mut self, kind: DeviceKind, device: DeviceRef) -> ReconcileStep {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.lane_mut(kind).in_flight = Some(InFlight {
            seq,
            device,
            stage: SequenceStage::Disabling,
        });
        ReconcileStep::Disable { kind, seq }
    }

    /// Look up the in-flight sequence if `seq` is current and at `stage`
    fn current_mut(
        &mut self,
        kind: DeviceKind,
        seq: SequenceId,
        stage: impl Fn(&SequenceStage) -> bool,
    ) -> Option<&mut InFlight> {
        self.lane_mut(kind)
            .in_flight
            .as_mut()
            .filter(|f| f.seq == seq && stage(&f.stage))
    }

    /// The active device was disabled; the settle delay starts
    pub fn disabled(&mut self, kind: DeviceKind, seq: SequenceId) -> Option<ReconcileStep> {
        let flight = self.current_mut(kind, seq, |s| *s == SequenceStage::Disabling)?;
        flight.stage = SequenceStage::Settling;
        Some(ReconcileStep::Settle { kind, seq })
    }

    /// The settle delay elapsed; acquire the new device
    pub fn settled(&mut self, kind: DeviceKind, seq: SequenceId) -> Option<ReconcileStep> {
        let flight = self.current_mut(kind, seq, |s| *s == SequenceStage::Settling)?;
        flight.stage = SequenceStage::Acquiring;
        Some(ReconcileStep::Acquire {
            kind,
            seq,
            device: flight.device.clone(),
        })
    }

    /// The new track exists; apply it
    pub fn acquired(
        &mut self,
        kind: DeviceKind,
        seq: SequenceId,
        track: TrackId,
    ) -> Option<ReconcileStep> {
        let flight = self.current_mut(kind, seq, |s| *s == SequenceStage::Acquiring)?;
        flight.stage = SequenceStage::Applying(track.clone());
        Some(ReconcileStep::Apply { kind, seq, track })
    }

    /// The track was applied; the sequence is complete
    pub fn applied(&mut self, kind: DeviceKind, seq: SequenceId) -> Option<Completion> {
        self.current_mut(kind, seq, |s| matches!(s, SequenceStage::Applying(_)))?;
        self.finish(kind)
    }

    /// A step of sequence `seq` failed. No rollback happens.
    pub fn failed(&mut self, kind: DeviceKind, seq: SequenceId) -> Option<Completion> {
        self.current_mut(kind, seq, |_| true)?;
        self.finish(kind)
    }

    fn finish(&mut self, kind: DeviceKind) -> Option<Completion> {
        let flight = self.lane_mut(kind).in_flight.take()?;
        let next = self
            .lane_mut(kind)
            .queue
            .pop_front()
            .map(|device| self.start(kind, device));
        Some(Completion {
            device: flight.device,
            next,
        })
    }

    /// Stage of the running sequence for `kind`, if any
    pub fn stage(&self, kind: DeviceKind) -> Option<&SequenceStage> {
        self.lane(kind).in_flight.as_ref().map(|f| &f.stage)
    }

    /// Device being switched to for `kind`, if any
    pub fn target(&self, kind: DeviceKind) -> Option<&DeviceRef> {
        self.lane(kind).in_flight.as_ref().map(|f| &f.device)
    }

    pub fn queued(&self, kind: DeviceKind) -> usize {
        self.lane(kind).queue.len()
    }

    pub fn is_idle(&self) -> bool {
        DeviceKind::ALL
            .iter()
            .all(|k| self.lane(*k).in_flight.is_none() && self.lane(*k).queue.is_empty())
    }

    /// Forget every sequence; late results for old sequences are ignored
    pub fn reset(&mut self) {
        self.camera = Lane::default();
        self.microphone = Lane::default();
    }
}
