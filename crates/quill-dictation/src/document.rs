//! Target document seam.
//!
//! Sessions read the text before the insertion position fresh before every
//! commit and insert normalized text at that position.

use std::sync::{Arc, Mutex, PoisonError};

/// A plain-text document that dictated text is committed into.
pub trait Document: Send {
    /// Snapshot of the full committed content.
    fn content(&self) -> String;

    /// The text that precedes the insertion position.
    ///
    /// Capitalization and spacing of a commit are decided against this.
    /// Documents that only ever append can rely on the default.
    fn text_before_cursor(&self) -> String {
        self.content()
    }

    /// Insert `text` at the current position. Always succeeds.
    fn insert(&mut self, text: &str);
}

/// In-memory plain-text document with an insertion cursor.
///
/// The cursor is a byte offset that always sits on a char boundary. It starts
/// at the end of the initial text and moves past every insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `text`, with the cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamping to the text length and backing off to the
    /// nearest preceding char boundary.
    pub fn set_cursor(&mut self, offset: usize) {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        self.cursor = offset;
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl Document for TextBuffer {
    fn content(&self) -> String {
        self.text.clone()
    }

    fn text_before_cursor(&self) -> String {
        self.text[..self.cursor].to_string()
    }

    fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.text.insert_str(self.cursor, text);
        self.cursor += text.len();
        tracing::debug!(text_len = text.len(), cursor = self.cursor, "Text inserted");
    }
}

/// Lets a host keep a handle on a document it shares with a session.
impl<D: Document> Document for Arc<Mutex<D>> {
    fn content(&self) -> String {
        self.lock().unwrap_or_else(PoisonError::into_inner).content()
    }

    fn text_before_cursor(&self) -> String {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .text_before_cursor()
    }

    fn insert(&mut self, text: &str) {
        self.lock().unwrap_or_else(PoisonError::into_inner).insert(text);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
