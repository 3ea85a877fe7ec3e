//! Per-document session registry.
//!
//! Each document gets its own `SessionEngine`, created on first activation
//! and dropped when the host removes the document. Nothing is shared between
//! sessions except the event channel.

use std::collections::HashMap;

use tokio::sync::{broadcast, watch};

use quill_core::config::QuillConfig;
use quill_core::error::QuillError;
use quill_core::events::DictationEvent;
use quill_core::types::DocumentId;

use crate::engine::{Collaborators, SessionEngine};
use crate::state::DictationState;

/// Owns every document's dictation session.
pub struct SessionRegistry {
    config: QuillConfig,
    sessions: HashMap<DocumentId, SessionEngine>,
    events: broadcast::Sender<DictationEvent>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl SessionRegistry {
    pub fn new(config: &QuillConfig) -> Self {
        let (events, _) = broadcast::channel(config.dictation.event_capacity.max(1));
        Self {
            config: config.clone(),
            sessions: HashMap::new(),
            events,
        }
    }

    /// Activate dictation for a document, creating its session on first use.
    ///
    /// Activating an already registered document returns the existing session
    /// and drops `collaborators`.
    pub fn activate(
        &mut self,
        document_id: DocumentId,
        collaborators: Collaborators,
    ) -> &mut SessionEngine {
        let config = &self.config;
        let events = &self.events;
        self.sessions.entry(document_id).or_insert_with(|| {
            let session = SessionEngine::new(document_id, collaborators, config, events.clone());
            if session.is_available() {
                tracing::info!(document = %document_id, "Dictation activated");
            } else {
                tracing::warn!(
                    document = %document_id,
                    "Dictation activated but speech recognition is not available"
                );
            }
            session
        })
    }

    pub fn session(&self, document_id: DocumentId) -> Option<&SessionEngine> {
        self.sessions.get(&document_id)
    }

    pub fn session_mut(&mut self, document_id: DocumentId) -> Option<&mut SessionEngine> {
        self.sessions.get_mut(&document_id)
    }

    /// Toggle a registered document's session. Returns the resulting state.
    pub fn toggle(&mut self, document_id: DocumentId) -> Result<DictationState, QuillError> {
        self.sessions
            .get_mut(&document_id)
            .ok_or(QuillError::UnknownDocument(document_id))?
            .toggle()
    }

    /// Watch a registered document's listening state.
    pub fn watch_state(
        &self,
        document_id: DocumentId,
    ) -> Result<watch::Receiver<DictationState>, QuillError> {
        self.sessions
            .get(&document_id)
            .map(SessionEngine::watch_state)
            .ok_or(QuillError::UnknownDocument(document_id))
    }

    /// Tear down a document's session, stopping it first if it is listening.
    ///
    /// Returns `false` if the document was not registered.
    pub fn remove(&mut self, document_id: DocumentId) -> bool {
        match self.sessions.remove(&document_id) {
            Some(mut session) => {
                session.stop();
                tracing::debug!(document = %document_id, "Dictation session removed");
                true
            }
            None => false,
        }
    }

    /// Subscribe to events from every session in this registry.
    pub fn subscribe(&self) -> broadcast::Receiver<DictationEvent> {
        self.events.subscribe()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
