//! End-to-end barge-in scenarios through the tracker task

use std::sync::Arc;

use barge_in_config::Settings;
use barge_in_core::{
    tokenize, AgentActivity, InterruptDecision, SessionState, TranscriptGate,
    UserActivity,
};
use barge_in_pipeline::{
    spawn_tracker, RecordingSession, SessionTracker, TrackerHandle, TrackerSummary,
};
use tokio::task::JoinHandle;

fn start(
    settings: &Settings,
) -> (
    TrackerHandle,
    JoinHandle<TrackerSummary>,
    Arc<RecordingSession>,
) {
    let speech = Arc::new(RecordingSession::new());
    let tracker = SessionTracker::from_settings(settings, speech.clone()).unwrap();
    let (handle, task) = spawn_tracker(tracker, settings.tracker.event_buffer);
    (handle, task, speech)
}

async fn barge_in(handle: &TrackerHandle) {
    handle
        .agent_state_changed(AgentActivity::Thinking, AgentActivity::Speaking)
        .await
        .unwrap();
    handle
        .user_state_changed(UserActivity::Listening, UserActivity::Speaking)
        .await
        .unwrap();
}

#[test]
fn test_tokenize_sentence() {
    assert_eq!(
        tokenize("Yeah, wait a second!"),
        vec!["yeah", "wait", "a", "second"]
    );
}

#[tokio::test]
async fn test_fillers_keep_agent_speaking() {
    let (handle, task, speech) = start(&Settings::default());
    handle.session_started().await.unwrap();
    barge_in(&handle).await;
    handle.transcript("okay yeah uh-huh", true).await.unwrap();

    assert_eq!(handle.snapshot().await.unwrap().state, SessionState::Speaking);
    drop(handle);

    let summary = task.await.unwrap();
    let last = summary.history.last().unwrap();
    assert_eq!(last.decision, Some(InterruptDecision::Ignore));
    assert!(!last.interrupted);
    assert_eq!(speech.interrupt_count(), 0);
}

#[tokio::test]
async fn test_explicit_stop_interrupts_once() {
    let (handle, task, speech) = start(&Settings::default());
    handle.session_started().await.unwrap();
    barge_in(&handle).await;
    handle.transcript("no stop", true).await.unwrap();

    assert_eq!(handle.snapshot().await.unwrap().state, SessionState::Silent);
    drop(handle);

    let summary = task.await.unwrap();
    let last = summary.history.last().unwrap();
    assert_eq!(last.decision, Some(InterruptDecision::Interrupt));
    assert!(last.interrupted);
    assert_eq!(speech.interrupt_count(), 1);
}

#[tokio::test]
async fn test_transcript_while_silent_is_ignored() {
    let (handle, task, speech) = start(&Settings::default());
    handle.session_started().await.unwrap();
    handle.transcript("yeah", true).await.unwrap();
    drop(handle);

    let summary = task.await.unwrap();
    assert_eq!(summary.final_state, SessionState::Silent);
    assert!(summary.history.iter().all(|r| r.decision.is_none()));
    assert_eq!(summary.stats.ignored + summary.stats.interrupted, 0);
    assert_eq!(speech.interrupt_count(), 0);
}

#[tokio::test]
async fn test_mixed_filler_and_unknown_interrupts() {
    let (handle, task, speech) = start(&Settings::default());
    handle.session_started().await.unwrap();
    barge_in(&handle).await;
    handle.transcript("yeah but wait", true).await.unwrap();
    drop(handle);

    let summary = task.await.unwrap();
    assert_eq!(summary.final_state, SessionState::Silent);
    assert_eq!(summary.stats.interrupted, 1);
    assert_eq!(speech.interrupt_count(), 1);
}

#[tokio::test]
async fn test_agent_then_user_speaking() {
    let (handle, _task, _) = start(&Settings::default());

    handle
        .agent_state_changed(AgentActivity::Listening, AgentActivity::Speaking)
        .await
        .unwrap();
    assert_eq!(handle.snapshot().await.unwrap().state, SessionState::Speaking);

    handle
        .user_state_changed(UserActivity::Listening, UserActivity::Speaking)
        .await
        .unwrap();
    assert_eq!(
        handle.snapshot().await.unwrap().state,
        SessionState::PotentialInterrupt
    );
}

#[tokio::test]
async fn test_interrupt_before_session_start_is_noop() {
    let (handle, task, speech) = start(&Settings::default());
    barge_in(&handle).await;
    handle.transcript("stop", true).await.unwrap();
    drop(handle);

    let summary = task.await.unwrap();
    assert_eq!(summary.final_state, SessionState::Silent);
    assert_eq!(summary.stats.interrupts_suppressed, 1);
    assert_eq!(speech.interrupt_count(), 0);
}

#[tokio::test]
async fn test_final_only_gate_skips_partials() {
    let mut settings = Settings::default();
    settings.interrupt.transcript_gate = TranscriptGate::FinalOnly;

    let (handle, task, speech) = start(&settings);
    handle.session_started().await.unwrap();
    barge_in(&handle).await;

    handle.transcript("stop", false).await.unwrap();
    assert_eq!(
        handle.snapshot().await.unwrap().state,
        SessionState::PotentialInterrupt
    );

    handle.transcript("uh-huh", true).await.unwrap();
    drop(handle);

    let summary = task.await.unwrap();
    assert_eq!(summary.final_state, SessionState::Speaking);
    assert_eq!(speech.interrupt_count(), 0);
}

#[tokio::test]
async fn test_partials_evaluated_by_default() {
    let (handle, task, speech) = start(&Settings::default());
    handle.session_started().await.unwrap();
    barge_in(&handle).await;
    handle.transcript("wait", false).await.unwrap();
    drop(handle);

    assert_eq!(task.await.unwrap().final_state, SessionState::Silent);
    assert_eq!(speech.interrupt_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_keep_per_producer_order() {
    let (handle, task, _) = start(&Settings::default());

    // Agent producer alternates speaking/listening while others add noise
    let agent = {
        let handle = handle.clone();
        tokio::spawn(async move {
            for _ in 0..20 {
                handle
                    .agent_state_changed(AgentActivity::Listening, AgentActivity::Speaking)
                    .await
                    .unwrap();
                handle
                    .agent_state_changed(AgentActivity::Speaking, AgentActivity::Listening)
                    .await
                    .unwrap();
            }
        })
    };
    let mut others = Vec::new();
    for _ in 0..3 {
        let handle = handle.clone();
        others.push(tokio::spawn(async move {
            for _ in 0..10 {
                handle.session_started().await.unwrap();
                tokio::task::yield_now().await;
            }
        }));
    }

    agent.await.unwrap();
    for producer in others {
        producer.await.unwrap();
    }
    drop(handle);

    let summary = task.await.unwrap();
    assert_eq!(summary.stats.events, 70);

    let agent_states: Vec<SessionState> = summary
        .history
        .iter()
        .filter(|r| r.event == "agent_state_changed")
        .map(|r| r.to)
        .collect();
    let expected: Vec<SessionState> = (0..20)
        .flat_map(|_| [SessionState::Speaking, SessionState::Silent])
        .collect();
    assert_eq!(agent_states, expected);
    assert_eq!(summary.final_state, SessionState::Silent);
}

#[tokio::test]
async fn test_speaking_round_trip() {
    let (handle, task, speech) = start(&Settings::default());
    handle.session_started().await.unwrap();

    // Two turns: one backchannel, then a real interruption
    barge_in(&handle).await;
    handle.transcript("mm-hmm", true).await.unwrap();
    handle
        .user_state_changed(UserActivity::Speaking, UserActivity::Listening)
        .await
        .unwrap();
    handle
        .user_state_changed(UserActivity::Listening, UserActivity::Speaking)
        .await
        .unwrap();
    handle.transcript("hold on", true).await.unwrap();
    drop(handle);

    let summary = task.await.unwrap();
    assert_eq!(summary.stats.ignored, 1);
    assert_eq!(summary.stats.interrupted, 1);
    assert_eq!(summary.final_state, SessionState::Silent);
    assert_eq!(speech.interrupt_count(), 1);
}
