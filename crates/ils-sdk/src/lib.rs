//! # ils-sdk - Real-time SDK Bridge
//!
//! Talks to the real-time media SDK through a bridge child process speaking
//! NDJSON on stdio, and exposes the session/device seams the application
//! depends on.
//!
//! Depends on [`ils_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Session Seams
//! - [`RealtimeSession`] - Join/leave, device tracks, participant quality, pub-sub
//! - [`MediaDevices`] - Capture device enumeration
//! - [`BridgeSession`] - Both traits implemented over the bridge process
//!
//! ### Process Management
//! - [`BridgeProcess`] - Spawn and supervise the bridge child process
//! - [`CommandSender`] - Send requests with response matching and timeouts
//! - [`RequestTracker`] - Track pending request/response pairs
//!
//! ### Protocol Parsing
//! - [`parse_bridge_message()`] - Parse one line of bridge output

pub mod commands;
pub mod process;
pub mod protocol;
pub mod session;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use commands::{BridgeCommand, CommandResponse, CommandSender, RequestTracker};
pub use process::{BridgeEvent, BridgeProcess};
pub use protocol::{parse_bridge_message, BridgeMessage};
pub use session::{
    BridgeOptions, BridgeSession, JoinRequest, JoinedSession, LocalMediaDevices,
    LocalRealtimeSession, MediaDevices, Quality, RealtimeSession, SessionEvent,
};
