//! Core types for barge-in handling
//!
//! This crate holds everything that does not depend on a runtime:
//! - Tokenizer for finalized transcripts
//! - Interrupt/filler vocabularies
//! - Interrupt decision engine (IGNORE vs INTERRUPT)
//! - Session state machine as a pure transition function
//! - The outbound `SpeechSession` trait
//! - Error types

pub mod decision;
pub mod error;
pub mod state;
pub mod tokenizer;
pub mod traits;
pub mod vocabulary;

pub use decision::{DecisionEngine, DecisionReason, Evaluation, InterruptDecision};
pub use error::{Error, Result};
pub use state::{
    transition, AgentActivity, SessionAction, SessionEvent, SessionState, TranscriptGate,
    Transition, TransitionRecord, UserActivity,
};
pub use tokenizer::tokenize;
pub use traits::SpeechSession;
pub use vocabulary::{Vocabulary, WordClass};
