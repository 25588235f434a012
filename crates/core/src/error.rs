//! Error types

use thiserror::Error;

/// Result alias for fallible core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core errors
///
/// Only vocabulary construction can fail. Tokenizing, deciding and
/// transitioning are total.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Word '{word}' appears in both interrupt and ignore vocabularies")]
    OverlappingVocabulary { word: String },

    #[error("Invalid vocabulary word '{word}': must match [a-z-]+ after lower-casing")]
    InvalidWord { word: String },
}
