//! Session tracking for barge-in handling
//!
//! Features:
//! - Single-owner session tracker driven by ordered events
//! - Tokio task runtime with a cloneable handle for producers
//! - Readiness-guarded stop-speech action
//! - Transition audit trail and decision counters
//! - Recording/logging speech sessions for offline runs and tests

pub mod runtime;
pub mod session;
pub mod tracker;

pub use runtime::{spawn_tracker, TrackerHandle};
pub use session::{LoggingSession, RecordingSession};
pub use tracker::{SessionTracker, TrackerOptions, TrackerSnapshot, TrackerStats, TrackerSummary};

use thiserror::Error;

/// Tracker errors
///
/// Only the channel between producers and the tracker task can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Session tracker has shut down")]
    Closed,

    #[error("Session tracker queue is full")]
    Full,
}
