use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Why a listening session went back to idle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The user (or host UI) asked the session to stop.
    Requested,
    /// The speech source reported a runtime error, e.g. `no-speech` or `network`.
    SourceError(String),
    /// The speech source ended on its own without an error.
    SourceEnded,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Requested => write!(f, "requested"),
            StopReason::SourceError(reason) => write!(f, "source error: {}", reason),
            StopReason::SourceEnded => write!(f, "source ended"),
        }
    }
}

// =============================================================================
// Newtype Wrappers - Identity
// =============================================================================

/// Identity of a target document (one editor instance owns one of these).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Newtype Wrappers - Temporal
// =============================================================================

/// Unix timestamp in seconds since epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }
}

// =============================================================================
// Transcript Revisions
// =============================================================================

/// One result slot of a transcript revision.
///
/// Interim slots may be revised by a later event; final slots never change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSlot {
    pub text: String,
    #[serde(default)]
    pub is_final: bool,
}

impl TranscriptSlot {
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }
}

/// A transcript revision as delivered by the speech source.
///
/// Only slots at `result_index` and after changed since the previous event.
/// Sources deliver events in non-decreasing `result_index` order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEvent {
    #[serde(default)]
    pub result_index: usize,
    #[serde(default)]
    pub results: Vec<TranscriptSlot>,
}

impl TranscriptEvent {
    pub fn new(result_index: usize, results: Vec<TranscriptSlot>) -> Self {
        Self {
            result_index,
            results,
        }
    }

    /// Slots that changed in this revision. Empty when `result_index` is past the end.
    pub fn changed_slots(&self) -> &[TranscriptSlot] {
        self.results.get(self.result_index..).unwrap_or(&[])
    }
}

// =============================================================================
// Tests
// =============================================================================
