//! Session calls spawned by the action dispatcher
//!
//! Each helper runs one call on the session collaborator and posts the
//! result back as a [`Message`]. Device step failures are reported per
//! sequence so the reconciler can move on.

use tokio::sync::mpsc;

use ils_core::prelude::*;
use ils_core::{DeviceKind, DeviceRef, TrackId};
use ils_sdk::{JoinRequest, Quality};

use crate::devices::SequenceId;
use crate::message::Message;

use super::SessionBackend;

/// Failure report for a fire-and-forget session call
fn action_failed(action: &'static str, error: Error) -> Message {
    Message::ActionFailed {
        action,
        recoverable: error.is_recoverable(),
        error: error.to_string(),
    }
}

async fn post(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        debug!("Message channel closed; dropping session result");
    }
}

pub(super) fn spawn_join<S: SessionBackend>(
    session: S,
    request: JoinRequest,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let msg = match session.join(request).await {
            Ok(joined) => Message::SessionAttached {
                local_participant_id: joined.local_participant_id,
            },
            Err(Error::Join { message }) => Message::JoinFailed { message },
            Err(e) => Message::JoinFailed {
                message: e.to_string(),
            },
        };
        post(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_leave<S: SessionBackend>(session: S, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        if let Err(e) = session.leave().await {
            post(&msg_tx, action_failed("leave", e)).await;
        }
    });
}

pub(super) fn spawn_disable<S: SessionBackend>(
    session: S,
    kind: DeviceKind,
    seq: SequenceId,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let msg = match session.disable_device(kind).await {
            Ok(()) => Message::DeviceDisabled { kind, seq },
            Err(e) => Message::DeviceStepFailed {
                kind,
                seq,
                error: e.to_string(),
            },
        };
        post(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_acquire<S: SessionBackend>(
    session: S,
    kind: DeviceKind,
    seq: SequenceId,
    device: DeviceRef,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let msg = match session.acquire_device(kind, &device).await {
            Ok(track) => Message::DeviceAcquired { kind, seq, track },
            Err(e) => Message::DeviceStepFailed {
                kind,
                seq,
                error: e.to_string(),
            },
        };
        post(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_apply<S: SessionBackend>(
    session: S,
    kind: DeviceKind,
    seq: SequenceId,
    track: TrackId,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        let msg = match session.apply_track(kind, &track).await {
            Ok(()) => Message::DeviceApplied { kind, seq },
            Err(e) => Message::DeviceStepFailed {
                kind,
                seq,
                error: e.to_string(),
            },
        };
        post(&msg_tx, msg).await;
    });
}

pub(super) fn spawn_set_quality<S: SessionBackend>(
    session: S,
    participant_id: String,
    quality: Quality,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        if let Err(e) = session
            .set_participant_quality(&participant_id, quality)
            .await
        {
            post(&msg_tx, action_failed("set_quality", e)).await;
        }
    });
}

pub(super) fn spawn_publish<S: SessionBackend>(
    session: S,
    topic: String,
    message: String,
    msg_tx: mpsc::Sender<Message>,
) {
    tokio::spawn(async move {
        if let Err(e) = session.publish(&topic, &message).await {
            post(&msg_tx, action_failed("publish", e)).await;
        }
    });
}

pub(super) fn spawn_enumerate<S: SessionBackend>(session: S, msg_tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        for kind in DeviceKind::ALL {
            let msg = match session.enumerate(kind).await {
                Ok(devices) => Message::DevicesEnumerated { kind, devices },
                Err(e) => action_failed("enumerate_devices", e),
            };
            post(&msg_tx, msg).await;
        }
    });
}
