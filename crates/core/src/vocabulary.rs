//! Interrupt and filler vocabularies
//!
//! Two disjoint word sets, built once at startup and shared read-only:
//! - interrupt words: explicit cues that the user wants the agent to stop
//! - ignore words: backchannel/filler that must never cut the agent off

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::tokenizer::is_token;

/// Vocabulary class of a single token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordClass {
    /// Explicit interrupt cue ("stop", "wait")
    Interrupt,
    /// Backchannel/filler ("yeah", "uh-huh")
    Ignore,
    /// In neither vocabulary
    Unknown,
}

/// Immutable pair of word sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    interrupt_words: BTreeSet<String>,
    ignore_words: BTreeSet<String>,
}

impl Vocabulary {
    /// Build a vocabulary from two word lists
    ///
    /// Words are trimmed and lower-cased. Fails if a word can never be produced
    /// by the tokenizer or if it appears in both lists.
    pub fn new<I, J, S, T>(interrupt_words: I, ignore_words: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let interrupt_words = normalize_all(interrupt_words)?;
        let ignore_words = normalize_all(ignore_words)?;

        if let Some(word) = interrupt_words.intersection(&ignore_words).next() {
            return Err(Error::OverlappingVocabulary { word: word.clone() });
        }

        tracing::debug!(
            interrupt_words = interrupt_words.len(),
            ignore_words = ignore_words.len(),
            "Vocabulary built"
        );

        Ok(Self {
            interrupt_words,
            ignore_words,
        })
    }

    /// Classify a single token
    pub fn classify(&self, token: &str) -> WordClass {
        if self.interrupt_words.contains(token) {
            WordClass::Interrupt
        } else if self.ignore_words.contains(token) {
            WordClass::Ignore
        } else {
            WordClass::Unknown
        }
    }

    pub fn is_interrupt_word(&self, token: &str) -> bool {
        self.interrupt_words.contains(token)
    }

    pub fn is_ignore_word(&self, token: &str) -> bool {
        self.ignore_words.contains(token)
    }

    /// Interrupt words in sorted order
    pub fn interrupt_words(&self) -> impl Iterator<Item = &str> {
        self.interrupt_words.iter().map(String::as_str)
    }

    /// Ignore words in sorted order
    pub fn ignore_words(&self) -> impl Iterator<Item = &str> {
        self.ignore_words.iter().map(String::as_str)
    }
}

fn normalize_all<I, S>(words: I) -> Result<BTreeSet<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|word| {
            let normalized = word.as_ref().trim().to_lowercase();
            if is_token(&normalized) {
                Ok(normalized)
            } else {
                Err(Error::InvalidWord {
                    word: word.as_ref().to_string(),
                })
            }
        })
        .collect()
}
