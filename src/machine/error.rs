//! Runtime transition errors.

use thiserror::Error;

/// Errors returned by [`StateMachine::transition`](super::StateMachine::transition)
/// and [`StateMachine::set_current`](super::StateMachine::set_current).
///
/// The machine is left unchanged whenever one of these is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("illegal transition: <{}> -x-> <{next}>", display_state(.current))]
    IllegalTransition { current: String, next: String },
}

impl TransitionError {
    pub(crate) fn illegal(current: &str, next: &str) -> Self {
        Self::IllegalTransition {
            current: current.to_string(),
            next: next.to_string(),
        }
    }
}

fn display_state(state: &str) -> &str {
    if state.is_empty() {
        "<nil>"
    } else {
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_both_states() {
        let err = TransitionError::illegal("Ready", "Ready");

        assert_eq!(err.to_string(), "illegal transition: <Ready> -x-> <Ready>");
    }

    #[test]
    fn empty_current_renders_as_nil() {
        let err = TransitionError::illegal("", "Ready");

        assert_eq!(err.to_string(), "illegal transition: <<nil>> -x-> <Ready>");
    }
}
