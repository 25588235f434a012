//! Built-in conversation scenarios
//!
//! Each scenario runs on a fresh tracker: the session starts, the agent is
//! put in the given state (and, if speaking, the user starts talking over
//! it), then the utterance arrives as a final transcript.

use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;

use barge_in_config::Settings;
use barge_in_core::{AgentActivity, DecisionEngine, InterruptDecision, SessionEvent, UserActivity};
use barge_in_pipeline::{LoggingSession, SessionTracker, TrackerOptions};

/// Agent state at the moment the user talks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    Speaking,
    Silent,
}

impl fmt::Display for AgentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Speaking => f.write_str("SPEAKING"),
            Self::Silent => f.write_str("SILENT"),
        }
    }
}

/// (agent state, what the user says)
pub const SCENARIOS: &[(AgentMode, &str)] = &[
    // Backchannel while the agent talks
    (AgentMode::Speaking, "yeah"),
    // Same word is a real answer when the agent is quiet
    (AgentMode::Silent, "yeah"),
    (AgentMode::Speaking, "stop"),
    (AgentMode::Speaking, "yeah but wait"),
    (AgentMode::Speaking, "okay yeah uh-huh"),
    (AgentMode::Speaking, "yeah, okay..."),
    (AgentMode::Speaking, "Yeah"),
    (AgentMode::Speaking, "banana"),
    (AgentMode::Speaking, "no please stop"),
    (AgentMode::Silent, "hello"),
    (AgentMode::Silent, "ok"),
    (AgentMode::Speaking, "yeah I understand but wait a second"),
];

/// What the agent ends up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    ContinuesSpeaking,
    Stops,
    RespondsNormally,
}

impl Outcome {
    fn decision_label(&self) -> &'static str {
        match self {
            Self::ContinuesSpeaking => "IGNORE (backchannel)",
            Self::Stops => "INTERRUPT",
            Self::RespondsNormally => "RESPOND",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContinuesSpeaking => f.write_str("Agent continues speaking"),
            Self::Stops => f.write_str("Agent stops immediately"),
            Self::RespondsNormally => f.write_str("Agent responds normally"),
        }
    }
}

/// Result of one scenario
#[derive(Debug, Clone)]
pub struct Played {
    pub tokens: Vec<String>,
    pub outcome: Outcome,
}

/// Run one scenario on a fresh tracker
pub fn play(
    engine: &DecisionEngine,
    options: &TrackerOptions,
    mode: AgentMode,
    utterance: &str,
) -> Played {
    let speech = Arc::new(LoggingSession::new("simulate"));
    let mut tracker = SessionTracker::with_options(engine.clone(), speech, options.clone());

    tracker.handle(SessionEvent::SessionStarted);
    if mode == AgentMode::Speaking {
        tracker.handle(SessionEvent::agent(
            AgentActivity::Thinking,
            AgentActivity::Speaking,
        ));
        tracker.handle(SessionEvent::user(
            UserActivity::Listening,
            UserActivity::Speaking,
        ));
    }
    let transition = tracker.handle(SessionEvent::transcript(utterance, true));

    match transition.evaluation {
        Some(evaluation) => Played {
            outcome: match evaluation.decision {
                InterruptDecision::Ignore => Outcome::ContinuesSpeaking,
                InterruptDecision::Interrupt => Outcome::Stops,
            },
            tokens: evaluation.tokens,
        },
        None => Played {
            tokens: barge_in_core::tokenize(utterance),
            outcome: Outcome::RespondsNormally,
        },
    }
}

pub fn run(settings: &Settings) -> Result<()> {
    let vocabulary = settings
        .interrupt
        .vocabulary()
        .context("Failed to build vocabulary")?;
    let engine = DecisionEngine::new(vocabulary);
    let options = TrackerOptions {
        gate: settings.interrupt.transcript_gate,
        history_limit: settings.tracker.history_limit,
    };

    println!("\n=== Barge-in Simulation ===");
    for (mode, utterance) in SCENARIOS {
        let played = play(&engine, &options, *mode, utterance);

        println!("\n----------------------------------------");
        println!("Agent state : {}", mode);
        println!("User said   : \"{}\"", utterance);
        println!("Tokens      : {:?}", played.tokens);
        println!("Decision    : {}", played.outcome.decision_label());
        println!("Result      : {}", played.outcome);
    }

    Ok(())
}
