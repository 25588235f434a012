//! Tracker task
//!
//! The tracker lives on a single tokio task. Producers (agent state
//! callbacks, user state callbacks, transcript callbacks) share a cloneable
//! [`TrackerHandle`] and push events through a bounded channel, so events
//! are applied one at a time in arrival order.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;

use barge_in_core::{AgentActivity, SessionEvent, UserActivity};

use crate::tracker::{SessionTracker, TrackerSnapshot, TrackerSummary};
use crate::TrackerError;

enum Command {
    Event(SessionEvent),
    Snapshot(oneshot::Sender<TrackerSnapshot>),
}

/// Producer side of a running tracker
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<Command>,
}

impl TrackerHandle {
    /// Queue an event, waiting for capacity
    pub async fn send(&self, event: SessionEvent) -> Result<(), TrackerError> {
        self.tx
            .send(Command::Event(event))
            .await
            .map_err(|_| TrackerError::Closed)
    }

    /// Queue an event without waiting (for synchronous callbacks)
    pub fn try_send(&self, event: SessionEvent) -> Result<(), TrackerError> {
        self.tx.try_send(Command::Event(event)).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TrackerError::Full,
            mpsc::error::TrySendError::Closed(_) => TrackerError::Closed,
        })
    }

    pub async fn session_started(&self) -> Result<(), TrackerError> {
        self.send(SessionEvent::SessionStarted).await
    }

    pub async fn agent_state_changed(
        &self,
        old: AgentActivity,
        new: AgentActivity,
    ) -> Result<(), TrackerError> {
        self.send(SessionEvent::agent(old, new)).await
    }

    pub async fn user_state_changed(
        &self,
        old: UserActivity,
        new: UserActivity,
    ) -> Result<(), TrackerError> {
        self.send(SessionEvent::user(old, new)).await
    }

    pub async fn transcript(
        &self,
        text: impl Into<String>,
        is_final: bool,
    ) -> Result<(), TrackerError> {
        self.send(SessionEvent::transcript(text, is_final)).await
    }

    /// Current tracker view, taken after every event queued before it
    pub async fn snapshot(&self) -> Result<TrackerSnapshot, TrackerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot(reply))
            .await
            .map_err(|_| TrackerError::Closed)?;
        rx.await.map_err(|_| TrackerError::Closed)
    }
}

/// Move a tracker onto its own task
///
/// The task runs until every handle is dropped, then returns the summary.
pub fn spawn_tracker(
    tracker: SessionTracker,
    buffer: usize,
) -> (TrackerHandle, JoinHandle<TrackerSummary>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let span = tracing::info_span!("session", id = %tracker.session_id());
    let task = tokio::spawn(run(tracker, rx).instrument(span));
    (TrackerHandle { tx }, task)
}

async fn run(mut tracker: SessionTracker, mut rx: mpsc::Receiver<Command>) -> TrackerSummary {
    tracing::debug!("Session tracker started");

    while let Some(command) = rx.recv().await {
        match command {
            Command::Event(event) => {
                tracker.handle(event);
            },
            Command::Snapshot(reply) => {
                // Caller may have given up waiting
                let _ = reply.send(tracker.snapshot());
            },
        }
    }

    let stats = tracker.stats();
    tracing::info!(
        state = %tracker.state(),
        events = stats.events,
        interrupts = stats.interrupts_issued,
        "Session tracker stopped"
    );
    tracker.into_summary()
}
