use serde::{Deserialize, Serialize};

use crate::types::{DocumentId, StopReason, Timestamp};

/// Domain events emitted by dictation sessions.
///
/// Published on the registry's broadcast channel and consumed by hosts for
/// status display and audit logging. Preview updates are deliberately not
/// events: they are volatile and go straight to the preview surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DictationEvent {
    /// A session entered `Listening`.
    SessionStarted {
        document: DocumentId,
        language: String,
        timestamp: Timestamp,
    },

    /// A start attempt failed; the session stayed `Idle`.
    StartFailed {
        document: DocumentId,
        reason: String,
        timestamp: Timestamp,
    },

    /// Normalized text was inserted into the document.
    TextCommitted {
        document: DocumentId,
        text: String,
        timestamp: Timestamp,
    },

    /// A session returned to `Idle`.
    SessionStopped {
        document: DocumentId,
        reason: StopReason,
        timestamp: Timestamp,
    },
}

impl DictationEvent {
    /// Returns the timestamp of the event.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            DictationEvent::SessionStarted { timestamp, .. }
            | DictationEvent::StartFailed { timestamp, .. }
            | DictationEvent::TextCommitted { timestamp, .. }
            | DictationEvent::SessionStopped { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the document the event belongs to.
    pub fn document(&self) -> DocumentId {
        match self {
            DictationEvent::SessionStarted { document, .. }
            | DictationEvent::StartFailed { document, .. }
            | DictationEvent::TextCommitted { document, .. }
            | DictationEvent::SessionStopped { document, .. } => *document,
        }
    }

    /// Returns a human-readable event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            DictationEvent::SessionStarted { .. } => "session_started",
            DictationEvent::StartFailed { .. } => "start_failed",
            DictationEvent::TextCommitted { .. } => "text_committed",
            DictationEvent::SessionStopped { .. } => "session_stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_timestamp_and_document() {
        let ts = Timestamp::now();
        let document = DocumentId::new();
        let event = DictationEvent::TextCommitted {
            document,
            text: "Hello.".into(),
            timestamp: ts,
        };
        assert_eq!(event.timestamp(), ts);
        assert_eq!(event.document(), document);
    }

    #[test]
    fn test_event_names() {
        let document = DocumentId::new();
        let timestamp = Timestamp::now();
        let cases = vec![
            (
                DictationEvent::SessionStarted {
                    document,
                    language: "en-US".into(),
                    timestamp,
                },
                "session_started",
            ),
            (
                DictationEvent::StartFailed {
                    document,
                    reason: "not-allowed".into(),
                    timestamp,
                },
                "start_failed",
            ),
            (
                DictationEvent::TextCommitted {
                    document,
                    text: "x".into(),
                    timestamp,
                },
                "text_committed",
            ),
            (
                DictationEvent::SessionStopped {
                    document,
                    reason: StopReason::Requested,
                    timestamp,
                },
                "session_stopped",
            ),
        ];

        for (event, name) in cases {
            assert_eq!(event.event_name(), name);
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = DictationEvent::SessionStopped {
            document: DocumentId::new(),
            reason: StopReason::SourceError("network".into()),
            timestamp: Timestamp(1_700_000_000),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("SessionStopped"));
        assert!(json.contains("network"));

        let back: DictationEvent = serde_json::from_str(&json).unwrap();
        match back {
            DictationEvent::SessionStopped { reason, .. } => {
                assert_eq!(reason, StopReason::SourceError("network".into()));
            }
            other => panic!("Expected SessionStopped, got {:?}", other),
        }
    }
}
