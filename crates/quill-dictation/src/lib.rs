//! Quill dictation crate - spoken-text normalization and per-document sessions.
//!
//! Turns an incrementally arriving speech transcript into written text:
//! spoken punctuation phrases become symbols, words are spaced and sentences
//! capitalized, and final results are committed into the target document.
//! Each document owns an independent session cycling Idle <-> Listening.

pub mod document;
pub mod engine;
pub mod normalize;
pub mod preview;
pub mod punctuation;
pub mod registry;
pub mod speech;
pub mod state;

pub use document::{Document, TextBuffer};
pub use engine::{Collaborators, SessionEngine};
pub use normalize::{join_to_document, normalize};
pub use preview::{LogPreview, PreviewSurface};
pub use punctuation::{resolve, PhraseMatch};
pub use registry::SessionRegistry;
pub use speech::{ExternalSpeech, SpeechSource, UnsupportedSpeech};
pub use state::DictationState;
