//! Live preview surface for interim text.
//!
//! Interim text shown here is volatile: it is overwritten by the next
//! transcript event and never committed to the document.

use std::sync::{Arc, Mutex, PoisonError};

/// A surface that displays the interim transcript while listening.
pub trait PreviewSurface: Send {
    fn show(&mut self);
    fn hide(&mut self);
    fn update(&mut self, text: &str);
}

/// Headless preview that tracks its state and traces each call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPreview {
    visible: bool,
    text: String,
}

impl LogPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl PreviewSurface for LogPreview {
    fn show(&mut self) {
        self.visible = true;
        tracing::debug!("Preview shown");
    }

    fn hide(&mut self) {
        self.visible = false;
        self.text.clear();
        tracing::debug!("Preview hidden");
    }

    fn update(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        tracing::debug!(preview = %text, "Preview updated");
    }
}

impl<P: PreviewSurface> PreviewSurface for Arc<Mutex<P>> {
    fn show(&mut self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).show();
    }

    fn hide(&mut self) {
        self.lock().unwrap_or_else(PoisonError::into_inner).hide();
    }

    fn update(&mut self, text: &str) {
        self.lock().unwrap_or_else(PoisonError::into_inner).update(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_preview_lifecycle() {
        let mut preview = LogPreview::new();
        assert!(!preview.is_visible());

        preview.show();
        preview.update("hello");
        assert!(preview.is_visible());
        assert_eq!(preview.text(), "hello");

        preview.update("hello world");
        assert_eq!(preview.text(), "hello world");

        preview.hide();
        assert!(!preview.is_visible());
        assert_eq!(preview.text(), "");
    }
}
