//! Identified transition callbacks.
//!
//! A callback is a pair of an identifier and an optional function. The
//! identifier is what gets compared and persisted; the function is what runs
//! when the machine takes the edge.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Function invoked when a transition is taken.
///
/// Receives the source state, the requested target state and the caller's
/// payload. Returning `Some(state)` with a non-empty state redirects the
/// machine to `state` instead of the requested target.
pub type HandleTransition =
    Arc<dyn Fn(&str, &str, Option<&dyn Any>) -> Option<String> + Send + Sync>;

/// Identified callback attached to a transition edge.
///
/// Equality only looks at [`Callback::id`]; two callbacks with the same id
/// are equal even when their functions differ.
///
/// # Example
///
/// ```rust
/// use tablefsm::core::Callback;
///
/// let audit = Callback::new("audit", |from, to, _payload| {
///     println!("{from} -> {to}");
///     None
/// });
///
/// assert_eq!(audit.id(), "audit");
/// assert_eq!(audit, Callback::id_only("audit"));
/// ```
#[derive(Clone, Default)]
pub struct Callback {
    id: String,
    handler: Option<HandleTransition>,
}

impl Callback {
    /// Create a callback with an identifier and a function.
    pub fn new<F>(id: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&str, &str, Option<&dyn Any>) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            handler: Some(Arc::new(handler)),
        }
    }

    /// Create a callback that carries an identifier but no function.
    pub fn id_only(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handler: None,
        }
    }

    /// Create a callback without an identifier.
    ///
    /// Anonymous callbacks run normally but are never registered, so they
    /// cannot be restored from a snapshot.
    pub fn anonymous<F>(handler: F) -> Self
    where
        F: Fn(&str, &str, Option<&dyn Any>) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(String::new(), handler)
    }

    /// Create a callback under a freshly generated v4 UUID identifier.
    pub fn generated<F>(handler: F) -> Self
    where
        F: Fn(&str, &str, Option<&dyn Any>) -> Option<String> + Send + Sync + 'static,
    {
        Self::new(uuid::Uuid::new_v4().to_string(), handler)
    }

    /// Attach (or replace) the function, keeping the identifier.
    pub fn with_handler(mut self, handler: HandleTransition) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the callback has an identifier and is therefore registrable.
    pub fn is_identified(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn handler(&self) -> Option<&HandleTransition> {
        self.handler.as_ref()
    }

    /// Run the function, if any.
    ///
    /// Returns the override state. An empty string returned by the function
    /// counts as "no override".
    pub fn invoke(&self, from: &str, to: &str, payload: Option<&dyn Any>) -> Option<String> {
        let handler = self.handler.as_ref()?;
        handler(from, to, payload).filter(|state| !state.is_empty())
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("id", &self.id)
            .field("handler", &self.handler.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
