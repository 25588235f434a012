//! Session tracker
//!
//! Owns the interrupt state for one speech session and applies events to it
//! one at a time:
//! - Agent starts speaking -> Speaking
//! - Agent stops speaking -> Silent
//! - User starts speaking over the agent -> PotentialInterrupt
//! - Transcript while PotentialInterrupt -> IGNORE keeps the agent talking,
//!   INTERRUPT stops it
//!
//! The tracker is plain owned state with `&mut self` handlers. Run it inside
//! the task from [`crate::runtime`] so events never overlap.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;

use barge_in_config::{constants, ConfigError, Settings};
use barge_in_core::{
    tokenize, transition, DecisionEngine, InterruptDecision, SessionAction, SessionEvent,
    SessionState, SpeechSession, TranscriptGate, Transition, TransitionRecord,
};

/// Tracker options
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// Which transcripts are classified
    pub gate: TranscriptGate,
    /// Transition records kept for the audit trail (0 disables it)
    pub history_limit: usize,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            gate: TranscriptGate::AnyTranscript,
            history_limit: constants::tracker::HISTORY_LIMIT,
        }
    }
}

/// Counters over the session lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub events: u64,
    pub ignored: u64,
    pub interrupted: u64,
    /// Stop-speech calls delivered to the speech session
    pub interrupts_issued: u64,
    /// Stop-speech calls dropped because the session was not started
    pub interrupts_suppressed: u64,
}

/// Point-in-time view of the tracker
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSnapshot {
    pub session_id: String,
    pub state: SessionState,
    pub running: bool,
    pub stats: TrackerStats,
}

/// Final report returned when the tracker task ends
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSummary {
    pub session_id: String,
    pub final_state: SessionState,
    pub stats: TrackerStats,
    pub history: Vec<TransitionRecord>,
}

/// Single-owner interrupt state machine for one speech session
pub struct SessionTracker {
    session_id: String,
    engine: DecisionEngine,
    speech: Arc<dyn SpeechSession>,
    options: TrackerOptions,
    state: SessionState,
    /// Set once the speech session is up; stop-speech is a no-op before that
    running: bool,
    history: VecDeque<TransitionRecord>,
    stats: TrackerStats,
}

impl SessionTracker {
    /// Create a tracker with default options
    pub fn new(engine: DecisionEngine, speech: Arc<dyn SpeechSession>) -> Self {
        Self::with_options(engine, speech, TrackerOptions::default())
    }

    pub fn with_options(
        engine: DecisionEngine,
        speech: Arc<dyn SpeechSession>,
        options: TrackerOptions,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            engine,
            speech,
            history: VecDeque::with_capacity(options.history_limit.min(1024)),
            options,
            state: SessionState::default(),
            running: false,
            stats: TrackerStats::default(),
        }
    }

    /// Build from loaded settings (vocabulary, gate, history limit)
    pub fn from_settings(
        settings: &Settings,
        speech: Arc<dyn SpeechSession>,
    ) -> Result<Self, ConfigError> {
        let engine = DecisionEngine::new(settings.interrupt.vocabulary()?);
        let options = TrackerOptions {
            gate: settings.interrupt.transcript_gate,
            history_limit: settings.tracker.history_limit,
        };
        Ok(Self::with_options(engine, speech, options))
    }

    /// Override the generated session id
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Recent transitions, oldest first
    pub fn history(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.iter()
    }

    /// Apply one event
    pub fn handle(&mut self, event: SessionEvent) -> Transition {
        self.stats.events += 1;
        metrics::counter!("barge_in_events_total", "kind" => event.kind()).increment(1);

        self.log_event(&event);

        if matches!(event, SessionEvent::SessionStarted) {
            self.running = true;
            tracing::info!(speech = %self.speech.name(), "Speech session started");
        }

        let result = transition(self.state, &event, &self.engine, self.options.gate);

        if let Some(evaluation) = &result.evaluation {
            match evaluation.decision {
                InterruptDecision::Ignore => {
                    self.stats.ignored += 1;
                    tracing::info!(
                        tokens = ?evaluation.tokens,
                        reason = %evaluation.reason,
                        "[DECISION] IGNORE filler (continue speaking)"
                    );
                },
                InterruptDecision::Interrupt => {
                    self.stats.interrupted += 1;
                    tracing::info!(
                        tokens = ?evaluation.tokens,
                        reason = %evaluation.reason,
                        "[DECISION] INTERRUPT"
                    );
                },
            }
            metrics::counter!(
                "barge_in_decisions_total",
                "decision" => evaluation.decision.as_str()
            )
            .increment(1);
        }

        let interrupted = match result.action {
            Some(SessionAction::InterruptSpeech) => self.interrupt_speech(),
            None => false,
        };

        if result.changed() {
            tracing::info!(from = %result.from, to = %result.to, "[FSM] state transition");
        }
        tracing::debug!(state = %result.to, "[FSM] current state");

        self.state = result.to;
        self.record(&event, &result, interrupted);

        result
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            session_id: self.session_id.clone(),
            state: self.state,
            running: self.running,
            stats: self.stats,
        }
    }

    /// Consume the tracker into its final report
    pub fn into_summary(self) -> TrackerSummary {
        TrackerSummary {
            session_id: self.session_id,
            final_state: self.state,
            stats: self.stats,
            history: self.history.into_iter().collect(),
        }
    }

    fn interrupt_speech(&mut self) -> bool {
        if !self.running {
            self.stats.interrupts_suppressed += 1;
            metrics::counter!("barge_in_interrupts_total", "outcome" => "suppressed").increment(1);
            tracing::warn!("Speech session not started, interrupt skipped");
            return false;
        }

        self.speech.interrupt();
        self.stats.interrupts_issued += 1;
        metrics::counter!("barge_in_interrupts_total", "outcome" => "issued").increment(1);
        tracing::info!(speech = %self.speech.name(), "Interrupted agent speech");
        true
    }

    fn log_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::SessionStarted => {},
            SessionEvent::AgentStateChanged { old, new } => {
                tracing::info!(old = ?old, new = ?new, "[AGENT_STATE] changed");
            },
            SessionEvent::UserStateChanged { old, new } => {
                tracing::info!(old = ?old, new = ?new, "[USER_STATE] changed");
            },
            SessionEvent::TranscriptFinalized { text, is_final } => {
                tracing::info!(
                    text = %text,
                    tokens = ?tokenize(text),
                    is_final = is_final,
                    state = %self.state,
                    "[STT] transcript"
                );
            },
        }
    }

    fn record(&mut self, event: &SessionEvent, result: &Transition, interrupted: bool) {
        if self.options.history_limit == 0 {
            return;
        }
        if self.history.len() == self.options.history_limit {
            self.history.pop_front();
        }
        self.history
            .push_back(TransitionRecord::new(event, result, interrupted));
    }
}

impl std::fmt::Debug for SessionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTracker")
            .field("session_id", &self.session_id)
            .field("speech", &self.speech.name())
            .field("state", &self.state)
            .field("running", &self.running)
            .field("stats", &self.stats)
            .finish()
    }
}
