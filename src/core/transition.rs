//! Transition definitions supplied at construction time.

use super::callback::Callback;

/// A permitted move from one state to another, with an optional callback.
///
/// # Example
///
/// ```rust
/// use tablefsm::core::{Callback, Transition};
///
/// let plain = Transition::new("Ready", "Installing");
/// let hooked = Transition::new("Installing", "Running")
///     .with_callback(Callback::new("started", |_, _, _| None));
///
/// assert!(!plain.callback.has_handler());
/// assert_eq!(hooked.callback.id(), "started");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub callback: Callback,
}

impl Transition {
    /// Create a transition without a callback.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            callback: Callback::default(),
        }
    }

    /// Attach a callback to this transition.
    pub fn with_callback(mut self, callback: Callback) -> Self {
        self.callback = callback;
        self
    }
}
