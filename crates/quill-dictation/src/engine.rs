//! Dictation session engine for one target document.
//!
//! The `SessionEngine` drives a single document's recognition session: it
//! starts and stops the speech source, turns transcript revisions into preview
//! updates and document commits, and returns to `Idle` on every way a session
//! can end.

use tokio::sync::{broadcast, watch};

use quill_core::config::{QuillConfig, SpeechConfig};
use quill_core::error::QuillError;
use quill_core::events::DictationEvent;
use quill_core::types::{DocumentId, StopReason, Timestamp, TranscriptEvent};

use crate::document::Document;
use crate::normalize::{join_to_document, normalize};
use crate::preview::PreviewSurface;
use crate::speech::SpeechSource;
use crate::state::{DictationState, StateMachine};

/// The external capabilities a session works against.
pub struct Collaborators {
    pub speech: Box<dyn SpeechSource>,
    pub document: Box<dyn Document>,
    pub preview: Box<dyn PreviewSurface>,
}

impl Collaborators {
    pub fn new(
        speech: impl SpeechSource + 'static,
        document: impl Document + 'static,
        preview: impl PreviewSurface + 'static,
    ) -> Self {
        Self {
            speech: Box::new(speech),
            document: Box::new(document),
            preview: Box::new(preview),
        }
    }
}

/// Recognition session bound to one document.
///
/// Final transcript text accumulates in `pending_final` and is committed,
/// normalized and fitted to the document's current content, within the same
/// event that delivered it. Interim text only ever reaches the preview.
pub struct SessionEngine {
    document_id: DocumentId,
    state_machine: StateMachine,
    pending_final: String,
    speech_config: SpeechConfig,
    show_preview: bool,
    speech: Box<dyn SpeechSource>,
    document: Box<dyn Document>,
    preview: Box<dyn PreviewSurface>,
    events: broadcast::Sender<DictationEvent>,
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("document_id", &self.document_id)
            .field("state_machine", &self.state_machine)
            .field("pending_final", &self.pending_final)
            .field("speech_config", &self.speech_config)
            .field("show_preview", &self.show_preview)
            .finish()
    }
}

impl SessionEngine {
    /// Create an `Idle` session that publishes its events on `events`.
    pub fn new(
        document_id: DocumentId,
        collaborators: Collaborators,
        config: &QuillConfig,
        events: broadcast::Sender<DictationEvent>,
    ) -> Self {
        Self {
            document_id,
            state_machine: StateMachine::new(),
            pending_final: String::new(),
            speech_config: config.speech.clone(),
            show_preview: config.dictation.show_preview,
            speech: collaborators.speech,
            document: collaborators.document,
            preview: collaborators.preview,
            events,
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Returns the current session state.
    pub fn state(&self) -> DictationState {
        self.state_machine.current()
    }

    pub fn is_recognizing(&self) -> bool {
        self.state().is_listening()
    }

    /// Whether the speech source exists on this platform.
    pub fn is_available(&self) -> bool {
        self.speech.is_available()
    }

    /// Final text received but not yet committed.
    pub fn pending_final(&self) -> &str {
        &self.pending_final
    }

    pub fn document(&self) -> &dyn Document {
        self.document.as_ref()
    }

    /// Subscribe to `Idle`/`Listening` changes of this session.
    pub fn watch_state(&self) -> watch::Receiver<DictationState> {
        self.state_machine.subscribe()
    }

    /// Subscribe to domain events published by this session.
    pub fn subscribe(&self) -> broadcast::Receiver<DictationEvent> {
        self.events.subscribe()
    }

    /// Start recognizing.
    ///
    /// Transitions from Idle to Listening. Fails if the session is already
    /// listening, if speech recognition is unavailable, or if the source
    /// refuses to start; in every failure case the session stays `Idle`.
    pub fn start(&mut self) -> Result<(), QuillError> {
        if self.is_recognizing() {
            return Err(QuillError::Dictation(format!(
                "Session for document {} is already listening",
                self.document_id
            )));
        }

        if !self.speech.is_available() {
            let err = QuillError::SpeechUnavailable;
            tracing::warn!(document = %self.document_id, "{}", err);
            self.emit(DictationEvent::StartFailed {
                document: self.document_id,
                reason: err.to_string(),
                timestamp: Timestamp::now(),
            });
            return Err(err);
        }

        if let Err(err) = self.speech.start(&self.speech_config) {
            tracing::warn!(
                document = %self.document_id,
                error = %err,
                "Speech recognition failed to start"
            );
            self.preview.hide();
            self.emit(DictationEvent::StartFailed {
                document: self.document_id,
                reason: err.to_string(),
                timestamp: Timestamp::now(),
            });
            return Err(err);
        }

        self.pending_final.clear();
        self.state_machine.transition(DictationState::Listening)?;
        if self.show_preview {
            self.preview.show();
        }

        tracing::info!(
            document = %self.document_id,
            language = %self.speech_config.language,
            "Dictation session started"
        );
        self.emit(DictationEvent::SessionStarted {
            document: self.document_id,
            language: self.speech_config.language.clone(),
            timestamp: Timestamp::now(),
        });
        Ok(())
    }

    /// Stop recognizing. A no-op when already `Idle`.
    ///
    /// Final text that has not been committed yet is discarded, not flushed.
    pub fn stop(&mut self) {
        if !self.is_recognizing() {
            return;
        }
        self.speech.stop();
        self.finish(StopReason::Requested);
    }

    /// Start when `Idle`, stop when `Listening`. Returns the resulting state.
    pub fn toggle(&mut self) -> Result<DictationState, QuillError> {
        match self.state() {
            DictationState::Idle => self.start()?,
            DictationState::Listening => self.stop(),
        }
        Ok(self.state())
    }

    /// Handle a transcript revision from the speech source.
    ///
    /// Interim slots are normalized onto the preview unless
    /// `speech.interim_results` is off. Final slots are normalized, adjusted
    /// against the document text before the insertion position, and
    /// committed. Returns the inserted text, if anything was committed.
    /// Events that arrive while `Idle` are ignored.
    pub fn on_result(&mut self, event: &TranscriptEvent) -> Option<String> {
        if !self.is_recognizing() {
            tracing::debug!(
                document = %self.document_id,
                "Ignoring transcript event while idle"
            );
            return None;
        }

        let mut interim = String::new();
        for slot in event.changed_slots() {
            if slot.is_final {
                self.pending_final.push_str(&slot.text);
                self.pending_final.push(' ');
            } else {
                interim.push_str(&slot.text);
            }
        }

        if !interim.is_empty() && self.show_preview && self.speech_config.interim_results {
            self.preview.update(&normalize(&interim));
        }

        if self.pending_final.is_empty() {
            return None;
        }

        let normalized = normalize(&self.pending_final);
        let committed = if normalized.is_empty() {
            tracing::debug!(document = %self.document_id, "Final text normalized to nothing");
            None
        } else {
            // Read fresh: the user or a previous commit may have changed the document.
            let preceding = self.document.text_before_cursor();
            let text = join_to_document(&preceding, &normalized);
            self.document.insert(&text);

            tracing::debug!(
                document = %self.document_id,
                text_len = text.len(),
                "Dictated text committed"
            );
            self.emit(DictationEvent::TextCommitted {
                document: self.document_id,
                text: text.clone(),
                timestamp: Timestamp::now(),
            });
            Some(text)
        };

        self.pending_final.clear();
        if self.show_preview {
            self.preview.update("");
        }
        committed
    }

    /// Handle a runtime error reported by the speech source.
    pub fn on_error(&mut self, reason: &str) {
        if !self.is_recognizing() {
            return;
        }
        let err = QuillError::Recognition(reason.to_string());
        tracing::warn!(document = %self.document_id, error = %err, "Dictation session aborted");
        self.finish(StopReason::SourceError(reason.to_string()));
    }

    /// Handle the speech source ending on its own.
    pub fn on_end(&mut self) {
        if !self.is_recognizing() {
            return;
        }
        self.finish(StopReason::SourceEnded);
    }

    fn finish(&mut self, reason: StopReason) {
        if !self.pending_final.is_empty() {
            tracing::debug!(
                document = %self.document_id,
                discarded_len = self.pending_final.len(),
                "Discarding uncommitted final text"
            );
            self.pending_final.clear();
        }
        self.preview.hide();
        self.state_machine.reset();

        tracing::info!(document = %self.document_id, reason = %reason, "Dictation session stopped");
        self.emit(DictationEvent::SessionStopped {
            document: self.document_id,
            reason,
            timestamp: Timestamp::now(),
        });
    }

    fn emit(&self, event: DictationEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

// =============================================================================
// Tests
// =============================================================================
