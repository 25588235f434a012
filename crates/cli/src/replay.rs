//! Event script replay
//!
//! A script is either a bare list of events or a mapping with an optional
//! session id:
//!
//! ```yaml
//! session_id: call-42
//! events:
//!   - type: session_started
//!   - type: agent_state_changed
//!     old: thinking
//!     new: speaking
//!   - type: user_state_changed
//!     old: listening
//!     new: speaking
//!   - type: transcript_finalized
//!     text: "okay yeah uh-huh"
//! ```

use anyhow::{bail, Context, Result};
use serde_yaml::Value;
use std::path::Path;
use std::sync::Arc;

use barge_in_config::Settings;
use barge_in_core::SessionEvent;
use barge_in_pipeline::{spawn_tracker, LoggingSession, SessionTracker, TrackerSummary};

/// Parsed event script
#[derive(Debug, Clone, Default)]
pub struct EventScript {
    pub session_id: Option<String>,
    pub events: Vec<SessionEvent>,
}

impl EventScript {
    /// Parse script text; JSON when the extension says so, YAML otherwise
    pub fn parse(content: &str, json: bool) -> Result<Self> {
        let value: Value = if json {
            let json: serde_json::Value =
                serde_json::from_str(content).context("Failed to parse JSON event script")?;
            serde_yaml::to_value(json).context("Failed to read JSON event script")?
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML event script")?
        };

        match value {
            Value::Sequence(events) => Ok(Self {
                session_id: None,
                events: parse_events(events)?,
            }),
            Value::Mapping(mut script) => {
                let session_id = match script.remove("session_id") {
                    None | Some(Value::Null) => None,
                    Some(id) => Some(
                        serde_yaml::from_value(id).context("Invalid session_id in event script")?,
                    ),
                };
                let events = match script.remove("events") {
                    Some(Value::Sequence(events)) => parse_events(events)?,
                    Some(_) => bail!("Event script `events` must be a list"),
                    None => bail!("Event script has no `events` list"),
                };
                Ok(Self { session_id, events })
            },
            _ => bail!("Event script must be a list of events or a mapping with `events`"),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event script {}", path.display()))?;
        let json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        Self::parse(&content, json)
    }
}

/// Feed a script through a tracker task and collect its summary
pub async fn replay(settings: &Settings, script: EventScript) -> Result<TrackerSummary> {
    let speech = Arc::new(LoggingSession::new("replay"));
    let mut tracker = SessionTracker::from_settings(settings, speech)
        .context("Failed to create session tracker")?;
    if let Some(id) = script.session_id {
        tracker = tracker.with_session_id(id);
    }

    let (handle, task) = spawn_tracker(tracker, settings.tracker.event_buffer);
    for event in script.events {
        handle.send(event).await?;
    }
    drop(handle);

    task.await.context("Session tracker task failed")
}

fn parse_events(values: Vec<Value>) -> Result<Vec<SessionEvent>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_yaml::from_value(value)
                .with_context(|| format!("Invalid event at index {}", index))
        })
        .collect()
}

pub async fn run(settings: &Settings, path: &Path) -> Result<()> {
    let script = EventScript::load(path)?;
    if script.events.is_empty() {
        bail!("Event script {} contains no events", path.display());
    }
    tracing::info!(path = %path.display(), events = script.events.len(), "Replaying event script");

    let summary = replay(settings, script).await?;

    println!("session     : {}", summary.session_id);
    println!("final state : {}", summary.final_state);
    println!(
        "stats       : {}",
        serde_json::to_string(&summary.stats).context("Failed to serialize stats")?
    );
    println!();
    println!("{:<22} {:<20} {:<20} {:<10} interrupted", "event", "from", "to", "decision");
    for record in &summary.history {
        println!(
            "{:<22} {:<20} {:<20} {:<10} {}",
            record.event,
            record.from.as_str(),
            record.to.as_str(),
            record.decision.map(|d| d.as_str()).unwrap_or("-"),
            record.interrupted
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barge_in_core::SessionState;

    const SCRIPT: &str = r#"
session_id: call-42
events:
  - type: session_started
  - type: agent_state_changed
    old: thinking
    new: speaking
  - type: user_state_changed
    old: listening
    new: speaking
  - type: transcript_finalized
    text: "okay yeah uh-huh"
  - type: user_state_changed
    old: listening
    new: speaking
  - type: transcript_finalized
    text: "wait, stop"
    is_final: true
"#;

    #[test]
    fn test_parse_mapping_script() {
        let script = EventScript::parse(SCRIPT, false).unwrap();
        assert_eq!(script.session_id.as_deref(), Some("call-42"));
        assert_eq!(script.events.len(), 6);
        assert_eq!(script.events[0], SessionEvent::SessionStarted);
        assert_eq!(
            script.events[3],
            SessionEvent::transcript("okay yeah uh-huh", true)
        );
    }

    #[test]
    fn test_parse_bare_json_list() {
        let json = r#"[
            {"type": "session_started"},
            {"type": "transcript_finalized", "text": "hello", "is_final": false}
        ]"#;
        let script = EventScript::parse(json, true).unwrap();
        assert!(script.session_id.is_none());
        assert_eq!(script.events[1], SessionEvent::transcript("hello", false));
    }

    #[test]
    fn test_parse_errors_name_the_event() {
        let script = "- type: session_started\n- type: dance\n";
        let message = format!("{:#}", EventScript::parse(script, false).unwrap_err());
        assert!(message.contains("index 1"), "{}", message);
        assert!(message.contains("dance"), "{}", message);

        let script = "events:\n  - type: transcript_finalized\n    text: 42\n";
        let message = format!("{:#}", EventScript::parse(script, false).unwrap_err());
        assert!(message.contains("index 0"), "{}", message);
        assert!(message.contains("invalid type"), "{}", message);

        let json = r#"{"events": [{"type": "user_state_changed", "old": "listening"}]}"#;
        let message = format!("{:#}", EventScript::parse(json, true).unwrap_err());
        assert!(message.contains("missing field `new`"), "{}", message);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(EventScript::parse("just text", false).is_err());
        assert!(EventScript::parse("session_id: x\n", false).is_err());
        assert!(EventScript::parse("events: nope\n", false).is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.json");
        std::fs::write(&path, r#"[{"type": "session_started"}]"#).unwrap();
        assert_eq!(EventScript::load(&path).unwrap().events.len(), 1);

        assert!(EventScript::load(&dir.path().join("missing.yaml")).is_err());
    }

    #[tokio::test]
    async fn test_replay_summary() {
        let script = EventScript::parse(SCRIPT, false).unwrap();
        let summary = replay(&Settings::default(), script).await.unwrap();

        assert_eq!(summary.session_id, "call-42");
        assert_eq!(summary.final_state, SessionState::Silent);
        assert_eq!(summary.stats.events, 6);
        assert_eq!(summary.stats.ignored, 1);
        assert_eq!(summary.stats.interrupts_issued, 1);
        assert!(summary.history.last().unwrap().interrupted);
    }
}
