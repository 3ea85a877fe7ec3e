//! Replays recorded speech-source activity against an in-memory document.
//!
//! A script is JSON lines, one step each:
//!
//! ```text
//! {"type":"start"}
//! {"type":"result","result_index":0,"results":[{"text":"hello comma","is_final":false}]}
//! {"type":"result","result_index":0,"results":[{"text":"hello comma world","is_final":true}]}
//! {"type":"error","reason":"no-speech"}
//! {"type":"end"}
//! {"type":"stop"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::TryRecvError};

use quill_core::config::QuillConfig;
use quill_core::error::QuillError;
use quill_core::events::DictationEvent;
use quill_core::types::{DocumentId, TranscriptEvent};
use quill_dictation::{
    Collaborators, Document, ExternalSpeech, LogPreview, SessionEngine, SessionRegistry,
    TextBuffer,
};

/// One recorded interaction with a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayStep {
    /// User toggled dictation on.
    Start,
    /// User toggled dictation off.
    Stop,
    /// Source delivered a transcript revision.
    Result(TranscriptEvent),
    /// Source reported an error.
    Error { reason: String },
    /// Source ended on its own.
    End,
}

/// Final document text and every event published during the replay.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub document: String,
    pub events: Vec<DictationEvent>,
}

/// Parse a JSON-lines script.
pub fn parse_script(script: &str) -> Result<Vec<ReplayStep>, QuillError> {
    script
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| {
                QuillError::Serialization(format!("script line {}: {}", idx + 1, e))
            })
        })
        .collect()
}

/// Apply one step to a session. Start failures are logged and skipped, the
/// same way a toggle button would leave the session idle.
pub fn apply(session: &mut SessionEngine, step: &ReplayStep) {
    match step {
        ReplayStep::Start => {
            if let Err(e) = session.start() {
                tracing::warn!(error = %e, "Replay start step failed");
            }
        }
        ReplayStep::Stop => session.stop(),
        ReplayStep::Result(event) => {
            session.on_result(event);
        }
        ReplayStep::Error { reason } => session.on_error(reason),
        ReplayStep::End => session.on_end(),
    }
}

/// Run a whole script against a fresh document holding `initial`.
pub fn replay(script: &str, initial: &str, config: &QuillConfig) -> Result<ReplayOutcome, QuillError> {
    let steps = parse_script(script)?;

    let mut registry = SessionRegistry::new(config);
    let mut rx = registry.subscribe();
    let id = DocumentId::new();

    let session = registry.activate(
        id,
        Collaborators::new(
            ExternalSpeech::new(),
            TextBuffer::with_text(initial),
            LogPreview::new(),
        ),
    );
    tracing::info!(steps = steps.len(), document = %id, "Replaying transcript script");

    // Drained after every step so a long script never outruns the channel.
    let mut events = Vec::new();
    for step in &steps {
        apply(session, step);
        drain_events(&mut rx, &mut events);
    }
    let document = session.document().content();
    registry.remove(id);
    drain_events(&mut rx, &mut events);

    Ok(ReplayOutcome { document, events })
}

fn drain_events(rx: &mut broadcast::Receiver<DictationEvent>, events: &mut Vec<DictationEvent>) {
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event channel lagged; raise dictation.event_capacity");
            }
            Err(_) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use quill_core::types::TranscriptSlot;

    use super::*;

    const SCRIPT: &str = r#"
# dictate two sentences, then the recognizer times out
{"type":"start"}
{"type":"result","result_index":0,"results":[{"text":"hello comma","is_final":false}]}
{"type":"result","result_index":0,"results":[{"text":"hello comma world full stop","is_final":true}]}
{"type":"result","result_index":1,"results":[{"text":"hello comma world full stop","is_final":true},{"text":"how are you question mark","is_final":true}]}
{"type":"error","reason":"no-speech"}
{"type":"result","result_index":2,"results":[{"text":"ignored","is_final":true}]}
"#;

    #[test]
    fn test_parse_script_steps() {
        let steps = parse_script(SCRIPT).unwrap();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], ReplayStep::Start);
        assert_eq!(
            steps[1],
            ReplayStep::Result(TranscriptEvent::new(
                0,
                vec![TranscriptSlot::interim("hello comma")]
            ))
        );
        assert_eq!(
            steps[4],
            ReplayStep::Error {
                reason: "no-speech".to_string()
            }
        );
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script("{\"type\":\"start\"}\n{\"type\":\"bogus\"}").unwrap_err();
        match err {
            QuillError::Serialization(msg) => assert!(msg.contains("script line 2")),
            other => panic!("Expected Serialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_replay_builds_document() {
        let outcome = replay(SCRIPT, "", &QuillConfig::default()).unwrap();
        assert_eq!(outcome.document, "hello, world. How are you? ");

        let names: Vec<&str> = outcome.events.iter().map(|e| e.event_name()).collect();
        assert_eq!(
            names,
            vec![
                "session_started",
                "text_committed",
                "text_committed",
                "session_stopped"
            ]
        );
    }

    #[test]
    fn test_replay_continues_initial_text() {
        let script = concat!(
            "{\"type\":\"start\"}\n",
            "{\"type\":\"result\",\"results\":[{\"text\":\"and then\",\"is_final\":true}]}\n",
            "{\"type\":\"stop\"}\n",
        );
        let outcome = replay(script, "It began.", &QuillConfig::default()).unwrap();
        assert_eq!(outcome.document, "It began. And then");
    }

    #[test]
    fn test_replay_without_start_leaves_document() {
        let script = "{\"type\":\"result\",\"results\":[{\"text\":\"x\",\"is_final\":true}]}";
        let outcome = replay(script, "Untouched", &QuillConfig::default()).unwrap();
        assert_eq!(outcome.document, "Untouched");
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_replay_keeps_every_event_past_channel_capacity() {
        let config = QuillConfig::default();
        let pairs = config.dictation.event_capacity;
        let script = "{\"type\":\"start\"}\n{\"type\":\"stop\"}\n".repeat(pairs);

        let outcome = replay(&script, "", &config).unwrap();
        assert_eq!(outcome.events.len(), pairs * 2);
        assert_eq!(outcome.events[0].event_name(), "session_started");
        assert_eq!(outcome.events[pairs * 2 - 1].event_name(), "session_stopped");
    }

    #[test]
    fn test_remove_stops_open_session() {
        let outcome = replay("{\"type\":\"start\"}", "", &QuillConfig::default()).unwrap();
        let last = outcome.events.last().unwrap();
        assert_eq!(last.event_name(), "session_stopped");
    }
}
