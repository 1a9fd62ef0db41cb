//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{Callback, Transition};
use crate::machine::StateMachine;
use crate::registry::CallbackRegistry;

/// Builder for constructing state machines with a fluent API.
///
/// Callbacks are registered in the registry given to
/// [`StateMachineBuilder::registry`], or in [`CallbackRegistry::global`]
/// when none is given.
pub struct StateMachineBuilder {
    name: String,
    initial: Option<String>,
    transitions: Vec<Transition>,
    registry: Option<CallbackRegistry>,
}

impl StateMachineBuilder {
    /// Create a builder for a machine called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: None,
            transitions: Vec::new(),
            registry: None,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = Some(state.into());
        self
    }

    /// Add a transition without a callback.
    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.transitions.push(Transition::new(from, to));
        self
    }

    /// Add a transition with a callback.
    pub fn edge_with(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        callback: Callback,
    ) -> Self {
        self.transitions
            .push(Transition::new(from, to).with_callback(callback));
        self
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Register callbacks in `registry` instead of the global one.
    pub fn registry(mut self, registry: &CallbackRegistry) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing or the table is invalid.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let registry = self
            .registry
            .unwrap_or_else(|| CallbackRegistry::global().clone());

        StateMachine::try_new(self.name, self.transitions, initial, &registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_required_fields() {
        let result = StateMachineBuilder::new("missing-initial")
            .edge("a", "b")
            .build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_transitions() {
        let result = StateMachineBuilder::new("no-transitions")
            .initial("a")
            .registry(&CallbackRegistry::new())
            .build();

        let err = result.unwrap_err();
        assert!(err.contains(&BuildError::NoTransitions));
        assert!(err.contains(&BuildError::InvalidInitialState {
            state: "a".to_string()
        }));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let registry = CallbackRegistry::new();
        let machine = StateMachineBuilder::new("fluent")
            .initial("Initial")
            .edge("Initial", "Processing")
            .edge_with(
                "Processing",
                "Complete",
                Callback::new("finish", |_, _, _| None),
            )
            .add_transition(Transition::new("Processing", "Failed"))
            .registry(&registry)
            .build()
            .unwrap();

        assert_eq!(machine.current(), "Initial");
        assert_eq!(machine.table().edge_count(), 3);
        assert!(registry.contains("fluent", "finish"));
    }

    #[test]
    fn add_multiple_transitions() {
        let machine = StateMachineBuilder::new("multiple")
            .initial("a")
            .transitions(vec![Transition::new("a", "b"), Transition::new("b", "c")])
            .registry(&CallbackRegistry::new())
            .build();

        assert!(machine.is_ok());
    }

    #[test]
    fn defaults_to_global_registry() {
        StateMachineBuilder::new("builder-global-registry")
            .initial("a")
            .edge_with("a", "b", Callback::id_only("global-cb"))
            .build()
            .unwrap();

        assert!(CallbackRegistry::global().contains("builder-global-registry", "global-cb"));
    }
}
