//! Interrupt decision engine
//!
//! Decides whether speech heard while the agent is talking should stop the
//! agent. Precedence:
//! 1. Any interrupt word -> INTERRUPT (explicit cues win over filler)
//! 2. Non-empty and only filler -> IGNORE
//! 3. Anything else (empty, unknown words) -> INTERRUPT
//!
//! Rule 3 is the fail-safe: ambiguity never silently keeps the agent talking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::tokenizer::tokenize;
use crate::vocabulary::{Vocabulary, WordClass};

/// Outcome of the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterruptDecision {
    /// Backchannel, let the agent keep talking
    Ignore,
    /// Stop the agent's current speech
    Interrupt,
}

impl InterruptDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE",
            Self::Interrupt => "INTERRUPT",
        }
    }
}

impl fmt::Display for InterruptDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule produced the decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "word", rename_all = "snake_case")]
pub enum DecisionReason {
    /// First interrupt word found
    InterruptKeyword(String),
    /// Every token is filler
    OnlyFiller,
    /// Nothing to classify
    Empty,
    /// First token in neither vocabulary
    UnrecognizedToken(String),
}

impl DecisionReason {
    pub fn decision(&self) -> InterruptDecision {
        match self {
            Self::OnlyFiller => InterruptDecision::Ignore,
            Self::InterruptKeyword(_) | Self::Empty | Self::UnrecognizedToken(_) => {
                InterruptDecision::Interrupt
            },
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InterruptKeyword(word) => write!(f, "interrupt keyword '{}'", word),
            Self::OnlyFiller => f.write_str("only filler words"),
            Self::Empty => f.write_str("no words"),
            Self::UnrecognizedToken(word) => write!(f, "unrecognized word '{}'", word),
        }
    }
}

/// Full result of evaluating a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub tokens: Vec<String>,
    pub decision: InterruptDecision,
    pub reason: DecisionReason,
}

/// Stateless decision engine over a shared vocabulary
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    vocabulary: Arc<Vocabulary>,
}

impl DecisionEngine {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Decide on an already-tokenized utterance
    pub fn decide<S: AsRef<str>>(&self, tokens: &[S]) -> InterruptDecision {
        self.explain(tokens).decision()
    }

    /// Decide and report the rule that fired
    pub fn explain<S: AsRef<str>>(&self, tokens: &[S]) -> DecisionReason {
        if let Some(word) = tokens
            .iter()
            .map(AsRef::as_ref)
            .find(|t| self.vocabulary.is_interrupt_word(t))
        {
            return DecisionReason::InterruptKeyword(word.to_string());
        }

        if tokens.is_empty() {
            return DecisionReason::Empty;
        }

        match tokens
            .iter()
            .map(AsRef::as_ref)
            .find(|t| self.vocabulary.classify(t) != WordClass::Ignore)
        {
            Some(word) => DecisionReason::UnrecognizedToken(word.to_string()),
            None => DecisionReason::OnlyFiller,
        }
    }

    /// Tokenize a transcript and decide on it
    pub fn evaluate(&self, text: &str) -> Evaluation {
        let tokens = tokenize(text);
        let reason = self.explain(&tokens);
        Evaluation {
            decision: reason.decision(),
            tokens,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DecisionEngine {
        let vocab = Vocabulary::new(
            ["stop", "wait", "no", "hold", "pause"],
            ["yeah", "ok", "okay", "hmm", "uh-huh", "right"],
        )
        .unwrap();
        DecisionEngine::new(Arc::new(vocab))
    }

    #[test]
    fn test_single_filler_ignored() {
        assert_eq!(engine().decide(&["yeah"]), InterruptDecision::Ignore);
    }

    #[test]
    fn test_multiple_fillers_ignored() {
        assert_eq!(
            engine().decide(&["yeah", "ok", "hmm"]),
            InterruptDecision::Ignore
        );
    }

    #[test]
    fn test_single_interrupt_word() {
        assert_eq!(engine().decide(&["stop"]), InterruptDecision::Interrupt);
    }

    #[test]
    fn test_multiple_interrupt_words() {
        assert_eq!(engine().decide(&["no", "stop"]), InterruptDecision::Interrupt);
    }

    #[test]
    fn test_mixed_input_interrupts() {
        assert_eq!(
            engine().decide(&["yeah", "but", "wait"]),
            InterruptDecision::Interrupt
        );
    }

    #[test]
    fn test_unknown_words_interrupt() {
        assert_eq!(
            engine().decide(&["maybe", "later"]),
            InterruptDecision::Interrupt
        );
    }

    #[test]
    fn test_empty_tokens_interrupts() {
        let empty: [&str; 0] = [];
        assert_eq!(engine().decide(&empty), InterruptDecision::Interrupt);
        assert_eq!(engine().explain(&empty), DecisionReason::Empty);
    }

    #[test]
    fn test_interrupt_word_wins_over_any_amount_of_filler() {
        let engine = engine();
        for filler_count in 0..20 {
            let mut tokens = vec!["yeah"; filler_count];
            tokens.insert(filler_count / 2, "wait");
            assert_eq!(engine.decide(&tokens), InterruptDecision::Interrupt);
        }
    }

    #[test]
    fn test_pure_filler_always_ignored() {
        let engine = engine();
        let fillers = ["yeah", "ok", "okay", "hmm", "uh-huh", "right"];
        for len in 1..=fillers.len() {
            for start in 0..fillers.len() {
                let tokens: Vec<&str> = fillers.iter().cycle().skip(start).take(len).copied().collect();
                assert_eq!(engine.decide(&tokens), InterruptDecision::Ignore, "{tokens:?}");
            }
        }
    }

    #[test]
    fn test_explain_reports_first_offending_word() {
        let engine = engine();
        assert_eq!(
            engine.explain(&["yeah", "but", "wait"]),
            DecisionReason::InterruptKeyword("wait".to_string())
        );
        assert_eq!(
            engine.explain(&["yeah", "banana", "apple"]),
            DecisionReason::UnrecognizedToken("banana".to_string())
        );
        assert_eq!(engine.explain(&["ok", "uh-huh"]), DecisionReason::OnlyFiller);
    }

    #[test]
    fn test_evaluate_text() {
        let eval = engine().evaluate("Yeah, okay...");
        assert_eq!(eval.tokens, vec!["yeah", "okay"]);
        assert_eq!(eval.decision, InterruptDecision::Ignore);

        let eval = engine().evaluate("no please stop");
        assert_eq!(eval.decision, InterruptDecision::Interrupt);
        assert_eq!(eval.reason, DecisionReason::InterruptKeyword("no".to_string()));

        let eval = engine().evaluate("...");
        assert!(eval.tokens.is_empty());
        assert_eq!(eval.decision, InterruptDecision::Interrupt);
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_string(&InterruptDecision::Ignore).unwrap();
        assert_eq!(json, "\"IGNORE\"");
        assert_eq!(InterruptDecision::Interrupt.to_string(), "INTERRUPT");
    }
}
