//! # ils-core - Core Domain Types
//!
//! Foundation crate for the ILS prebuilt client. Provides domain types, the
//! SDK event enumeration, error handling, logging setup and display helpers.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`LifecyclePhase`] - Which screen of the meeting lifecycle is active
//! - [`Mode`] - Interactive conference vs. broadcast-only viewer
//! - [`SessionConfig`] - Credentials and device choices from the joining screen
//! - [`ErrorNotice`] - Classified SDK error shown in the error modal
//! - [`Viewport`], [`ViewportClass`] - Viewport metrics and breakpoints
//!
//! ### Events (`events`)
//! - [`SdkEvent`] - Every callback the real-time SDK can deliver
//! - [`Broadcast`] - Pub-sub message with typed [`BroadcastKind`] view
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use ils_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod text;
pub mod types;

/// Prelude for common imports used throughout all ILS crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use events::{
    reaction_glyph, Broadcast, BroadcastKind, EntryDecision, Poll, SdkEvent, TOPIC_CHANGE_MODE,
    TOPIC_CHAT, TOPIC_POLL, TOPIC_RAISE_HAND, TOPIC_REACTION,
};
pub use text::{trim_snackbar_text, truncate_name, NAME_DISPLAY_LEN, SNACKBAR_DISPLAY_LEN};
pub use types::{
    is_critical_error, is_joining_error, ChatLine, DeviceInfo, DeviceKind, DeviceRef,
    ErrorNotice, HlsStatus, LifecyclePhase, Mode, Participant, RecordingStatus, SessionConfig,
    Severity, TrackId, Viewport, ViewportClass, DEFAULT_PARTICIPANT_NAME, JOINING_ERROR_CODES,
    JOINING_ERROR_MESSAGE,
};
