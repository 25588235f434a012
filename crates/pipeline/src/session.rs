//! Speech sessions without a speech framework
//!
//! - `LoggingSession`: logs stop requests (CLI replay/simulation)
//! - `RecordingSession`: counts and timestamps stop requests (tests)

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use barge_in_core::SpeechSession;

/// Speech session that only logs stop requests
#[derive(Debug, Clone)]
pub struct LoggingSession {
    name: String,
}

impl LoggingSession {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LoggingSession {
    fn default() -> Self {
        Self::new("offline")
    }
}

impl SpeechSession for LoggingSession {
    fn interrupt(&self) {
        tracing::info!(session = %self.name, "Agent speech stopped");
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Speech session that records every stop request
#[derive(Debug, Default)]
pub struct RecordingSession {
    interrupts: Mutex<Vec<DateTime<Utc>>>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stop requests received
    pub fn interrupt_count(&self) -> usize {
        self.interrupts.lock().len()
    }

    pub fn last_interrupt(&self) -> Option<DateTime<Utc>> {
        self.interrupts.lock().last().copied()
    }

    pub fn reset(&self) {
        self.interrupts.lock().clear();
    }
}

impl SpeechSession for RecordingSession {
    fn interrupt(&self) {
        self.interrupts.lock().push(Utc::now());
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_session_counts() {
        let session = RecordingSession::new();
        assert_eq!(session.interrupt_count(), 0);
        assert!(session.last_interrupt().is_none());

        session.interrupt();
        session.interrupt();
        assert_eq!(session.interrupt_count(), 2);
        assert!(session.last_interrupt().is_some());

        session.reset();
        assert_eq!(session.interrupt_count(), 0);
    }

    #[test]
    fn test_logging_session_name() {
        assert_eq!(LoggingSession::default().name(), "offline");
        assert_eq!(LoggingSession::new("replay").name(), "replay");
    }
}
