//! Speech session trait

use std::sync::Arc;

/// The external speech session the tracker controls
///
/// Implementations wrap whatever framework plays the agent's audio. The call
/// is fire-and-forget: it must not block and has nothing to report back.
///
/// # Example
///
/// ```ignore
/// struct FrameworkSession(framework::AgentSession);
///
/// impl SpeechSession for FrameworkSession {
///     fn interrupt(&self) {
///         self.0.interrupt();
///     }
///
///     fn name(&self) -> &str {
///         "framework"
///     }
/// }
/// ```
pub trait SpeechSession: Send + Sync + 'static {
    /// Stop whatever the agent is currently saying
    fn interrupt(&self);

    /// Backend name for logging
    fn name(&self) -> &str;
}

impl<T: SpeechSession + ?Sized> SpeechSession for Arc<T> {
    fn interrupt(&self) {
        (**self).interrupt()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
