//! Session state machine
//!
//! Tracks whether the agent is silent, speaking, or possibly being
//! interrupted, and decides when a transcript is worth classifying.
//!
//! ```text
//!            agent speaking               user speaking
//!   Silent ─────────────────▶ Speaking ─────────────────▶ PotentialInterrupt
//!     ▲                         ▲   ▲                            │
//!     │  agent not speaking     │   └──── transcript: IGNORE ────┤
//!     └─────────────────────────┴──────── transcript: INTERRUPT ─┘
//!                                         (emit InterruptSpeech)
//! ```
//!
//! The states carry no behavior; everything lives in [`transition`], a pure
//! function from (state, event) to (state, optional action).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decision::{DecisionEngine, Evaluation, InterruptDecision};

/// Interrupt tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Agent is not talking
    #[default]
    Silent,
    /// Agent is talking
    Speaking,
    /// Agent is talking and the user started talking over it
    PotentialInterrupt,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silent => "SILENT",
            Self::Speaking => "SPEAKING",
            Self::PotentialInterrupt => "POTENTIAL_INTERRUPT",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Agent states reported by the speech session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentActivity {
    Initializing,
    Idle,
    Listening,
    Thinking,
    Speaking,
}

/// User states reported by voice activity detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserActivity {
    Listening,
    Speaking,
    Away,
}

/// Inbound events from the speech session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Speech session is up; the stop-speech action becomes safe to call
    SessionStarted,
    /// Agent state changed
    AgentStateChanged {
        old: AgentActivity,
        new: AgentActivity,
    },
    /// User state changed (VAD)
    UserStateChanged { old: UserActivity, new: UserActivity },
    /// Speech-to-text produced a transcript
    TranscriptFinalized {
        text: String,
        #[serde(default = "default_is_final")]
        is_final: bool,
    },
}

fn default_is_final() -> bool {
    true
}

impl SessionEvent {
    /// Create an agent state change event
    pub fn agent(old: AgentActivity, new: AgentActivity) -> Self {
        Self::AgentStateChanged { old, new }
    }

    /// Create a user state change event
    pub fn user(old: UserActivity, new: UserActivity) -> Self {
        Self::UserStateChanged { old, new }
    }

    /// Create a transcript event
    pub fn transcript(text: impl Into<String>, is_final: bool) -> Self {
        Self::TranscriptFinalized {
            text: text.into(),
            is_final,
        }
    }

    /// Short event name for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SessionStarted => "session_started",
            Self::AgentStateChanged { .. } => "agent_state_changed",
            Self::UserStateChanged { .. } => "user_state_changed",
            Self::TranscriptFinalized { .. } => "transcript_finalized",
        }
    }
}

/// Outbound actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    /// Stop whatever the agent is currently saying
    InterruptSpeech,
}

/// Which transcripts are classified while in `PotentialInterrupt`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptGate {
    /// Partial and final transcripts alike
    #[default]
    AnyTranscript,
    /// Partial transcripts are skipped without a state change
    FinalOnly,
}

impl TranscriptGate {
    pub fn admits(&self, is_final: bool) -> bool {
        match self {
            Self::AnyTranscript => true,
            Self::FinalOnly => is_final,
        }
    }
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
    pub action: Option<SessionAction>,
    /// Present only when the decision engine ran
    pub evaluation: Option<Evaluation>,
}

impl Transition {
    fn stay(state: SessionState) -> Self {
        Self::between(state, state)
    }

    fn between(from: SessionState, to: SessionState) -> Self {
        Self {
            from,
            to,
            action: None,
            evaluation: None,
        }
    }

    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    pub fn decision(&self) -> Option<InterruptDecision> {
        self.evaluation.as_ref().map(|e| e.decision)
    }
}

/// Apply one event to the current state
pub fn transition(
    state: SessionState,
    event: &SessionEvent,
    engine: &DecisionEngine,
    gate: TranscriptGate,
) -> Transition {
    match event {
        SessionEvent::SessionStarted => Transition::stay(state),

        SessionEvent::AgentStateChanged { new, .. } => {
            let next = if *new == AgentActivity::Speaking {
                SessionState::Speaking
            } else {
                SessionState::Silent
            };
            Transition::between(state, next)
        },

        SessionEvent::UserStateChanged { new, .. } => {
            if *new == UserActivity::Speaking && state == SessionState::Speaking {
                Transition::between(state, SessionState::PotentialInterrupt)
            } else {
                Transition::stay(state)
            }
        },

        SessionEvent::TranscriptFinalized { text, is_final } => {
            if state != SessionState::PotentialInterrupt || !gate.admits(*is_final) {
                return Transition::stay(state);
            }

            let evaluation = engine.evaluate(text);
            let (to, action) = match evaluation.decision {
                InterruptDecision::Ignore => (SessionState::Speaking, None),
                InterruptDecision::Interrupt => {
                    (SessionState::Silent, Some(SessionAction::InterruptSpeech))
                },
            };

            Transition {
                from: state,
                to,
                action,
                evaluation: Some(evaluation),
            }
        },
    }
}

/// Audit trail entry for one processed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: SessionState,
    pub to: SessionState,
    /// Event kind that triggered the transition
    pub event: String,
    pub decision: Option<InterruptDecision>,
    /// Whether the stop-speech action was actually delivered
    pub interrupted: bool,
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn new(event: &SessionEvent, transition: &Transition, interrupted: bool) -> Self {
        Self {
            from: transition.from,
            to: transition.to,
            event: event.kind().to_string(),
            decision: transition.decision(),
            interrupted,
            timestamp: Utc::now(),
        }
    }
}
