//! Speech-recognition source seam.
//!
//! The source itself is external: it produces transcript revisions and
//! end/error notifications, which the host forwards to the session's
//! `on_result`, `on_error` and `on_end`. The session only ever asks it to
//! start and stop.

use std::sync::{Arc, Mutex, PoisonError};

use quill_core::config::SpeechConfig;
use quill_core::error::QuillError;

/// An external speech-recognition capability.
pub trait SpeechSource: Send {
    /// Whether the capability exists on this platform at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Begin recognizing with the given options.
    ///
    /// Fails with `QuillError::SpeechUnavailable` if the capability is absent,
    /// or `QuillError::StartFailure` if it exists but refuses to start
    /// (e.g. microphone permission denied).
    fn start(&mut self, config: &SpeechConfig) -> Result<(), QuillError>;

    /// Stop recognizing. Calling this when not started is a no-op.
    fn stop(&mut self);
}

/// Source for platforms without speech recognition.
#[derive(Debug, Default)]
pub struct UnsupportedSpeech;

impl SpeechSource for UnsupportedSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self, _config: &SpeechConfig) -> Result<(), QuillError> {
        Err(QuillError::SpeechUnavailable)
    }

    fn stop(&mut self) {}
}

/// Source whose recognizer runs outside this process.
///
/// Starting only records the requested options; the host pushes transcript
/// events into the session itself.
#[derive(Debug, Default)]
pub struct ExternalSpeech {
    active: Option<SpeechConfig>,
}

impl ExternalSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Options of the running recognition, if any.
    pub fn active_config(&self) -> Option<&SpeechConfig> {
        self.active.as_ref()
    }
}

impl SpeechSource for ExternalSpeech {
    fn start(&mut self, config: &SpeechConfig) -> Result<(), QuillError> {
        tracing::debug!(language = %config.language, "External speech source started");
        self.active = Some(config.clone());
        Ok(())
    }

    fn stop(&mut self) {
        if self.active.take().is_some() {
            tracing::debug!("External speech source stopped");
        }
    }
}

impl<S: SpeechSource> SpeechSource for Arc<Mutex<S>> {
    fn is_available(&self) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_available()
    }

    fn start(&mut self, config: &SpeechConfig) -> Result<(), QuillError> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .start(config)
    }

    fn stop(&mut self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).stop();
    }
}
