//! Dictation state machine with change notification.
//!
//! A session cycles between two states for its whole lifetime:
//! - Idle -> Listening (speech source started)
//! - Listening -> Idle (stopped, source error, or source ended)
//!
//! Every change is published on a `tokio::sync::watch` channel so UI can
//! reflect the listening state without polling.

use std::fmt;

use tokio::sync::watch;

use quill_core::error::QuillError;

/// Operational state of a dictation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DictationState {
    /// Not recognizing. Ready to start.
    #[default]
    Idle,
    /// The speech source is running and transcript events are accepted.
    Listening,
}

impl fmt::Display for DictationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DictationState::Idle => write!(f, "Idle"),
            DictationState::Listening => write!(f, "Listening"),
        }
    }
}

impl DictationState {
    /// Check whether transitioning from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &DictationState) -> bool {
        matches!(
            (self, target),
            (DictationState::Idle, DictationState::Listening)
                | (DictationState::Listening, DictationState::Idle)
        )
    }

    pub fn is_listening(&self) -> bool {
        matches!(self, DictationState::Listening)
    }
}

/// State holder for one session.
///
/// Owned by its session and mutated only through `&mut self`, so no locking is
/// involved. Observers hold `watch::Receiver`s and only ever read.
#[derive(Debug)]
pub struct StateMachine {
    state: DictationState,
    notifier: watch::Sender<DictationState>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        let (notifier, _) = watch::channel(DictationState::Idle);
        Self {
            state: DictationState::Idle,
            notifier,
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> DictationState {
        self.state
    }

    /// Subscribe to state changes. The receiver starts at the current state.
    pub fn subscribe(&self) -> watch::Receiver<DictationState> {
        self.notifier.subscribe()
    }

    /// Attempt to transition to the target state.
    ///
    /// Returns a `QuillError::Dictation` if the transition is not allowed from
    /// the current state.
    pub fn transition(&mut self, target: DictationState) -> Result<(), QuillError> {
        if !self.state.can_transition_to(&target) {
            return Err(QuillError::Dictation(format!(
                "Invalid state transition: {} -> {}",
                self.state, target
            )));
        }
        tracing::debug!("Dictation state: {} -> {}", self.state, target);
        self.set(target);
        Ok(())
    }

    /// Force the state machine back to Idle. Returns `false` if it already was.
    pub fn reset(&mut self) -> bool {
        if self.state == DictationState::Idle {
            return false;
        }
        tracing::debug!("Dictation state: {} -> Idle (reset)", self.state);
        self.set(DictationState::Idle);
        true
    }

    fn set(&mut self, state: DictationState) {
        self.state = state;
        // Keeps the value current even with no receivers alive.
        self.notifier.send_replace(state);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(DictationState::Idle.to_string(), "Idle");
        assert_eq!(DictationState::Listening.to_string(), "Listening");
    }

    #[test]
    fn test_valid_transitions() {
        assert!(DictationState::Idle.can_transition_to(&DictationState::Listening));
        assert!(DictationState::Listening.can_transition_to(&DictationState::Idle));
    }

    #[test]
    fn test_self_transitions_are_invalid() {
        assert!(!DictationState::Idle.can_transition_to(&DictationState::Idle));
        assert!(!DictationState::Listening.can_transition_to(&DictationState::Listening));
    }

    #[test]
    fn test_state_machine_cycle() {
        let mut sm = StateMachine::new();
        assert_eq!(sm.current(), DictationState::Idle);

        sm.transition(DictationState::Listening).unwrap();
        assert_eq!(sm.current(), DictationState::Listening);

        sm.transition(DictationState::Idle).unwrap();
        assert_eq!(sm.current(), DictationState::Idle);

        sm.transition(DictationState::Listening).unwrap();
        assert!(sm.current().is_listening());
    }

    #[test]
    fn test_state_machine_invalid_transition() {
        let mut sm = StateMachine::new();
        let result = sm.transition(DictationState::Idle);
        match result {
            Err(QuillError::Dictation(msg)) => {
                assert!(msg.contains("Idle -> Idle"));
            }
            other => panic!("Expected Dictation error, got {:?}", other),
        }
        assert_eq!(sm.current(), DictationState::Idle);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut sm = StateMachine::new();
        assert!(!sm.reset());

        sm.transition(DictationState::Listening).unwrap();
        assert!(sm.reset());
        assert_eq!(sm.current(), DictationState::Idle);
        assert!(!sm.reset());
    }

    #[test]
    fn test_subscribers_see_every_change() {
        let mut sm = StateMachine::new();
        let mut rx = sm.subscribe();
        assert_eq!(*rx.borrow(), DictationState::Idle);
        assert!(!rx.has_changed().unwrap());

        sm.transition(DictationState::Listening).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), DictationState::Listening);

        sm.reset();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), DictationState::Idle);
    }

    #[test]
    fn test_late_subscriber_sees_current_state() {
        let mut sm = StateMachine::new();
        sm.transition(DictationState::Listening).unwrap();
        let rx = sm.subscribe();
        assert_eq!(*rx.borrow(), DictationState::Listening);
    }
}
