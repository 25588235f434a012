//! Core traits
//!
//! ```text
//! Speech:
//!   - SpeechSession: outbound control of the agent's speech
//! ```

mod speech;

pub use speech::SpeechSession;
