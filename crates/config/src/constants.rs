//! Centralized defaults
//!
//! Single source of truth for the built-in vocabularies and tracker limits.

/// Built-in vocabularies
///
/// The two lists must stay disjoint; `Vocabulary::new` rejects overlaps.
pub mod vocabulary {
    /// Explicit cues that the user wants the agent to stop talking
    pub const INTERRUPT_WORDS: &[&str] = &[
        "stop", "wait", "no", "hold", "pause", "cancel", "enough", "quiet", "halt", "hang",
        "nope", "sorry", "excuse", "listen",
    ];

    /// Backchannel/filler that must never cut the agent off
    pub const IGNORE_WORDS: &[&str] = &[
        "yeah", "yes", "yep", "yup", "ok", "okay", "k", "hmm", "hm", "mhm", "mm", "mm-hmm",
        "uh-huh", "uh", "um", "ah", "oh", "aha", "right", "sure", "alright", "cool", "nice",
        "great", "gotcha", "i", "see",
    ];
}

/// Session tracker defaults
pub mod tracker {
    /// Event channel capacity
    pub const EVENT_BUFFER: usize = 64;

    /// Transition records kept for the audit trail
    pub const HISTORY_LIMIT: usize = 256;

    /// Upper bound for the event channel capacity
    pub const MAX_EVENT_BUFFER: usize = 65_536;
}

/// Environment variable names
pub mod env {
    /// Prefix for setting overrides (`BARGE_IN__TRACKER__EVENT_BUFFER=128`)
    pub const PREFIX: &str = "BARGE_IN";

    /// Selects `config/{env}.*`
    pub const ENVIRONMENT: &str = "BARGE_IN_ENV";
}
