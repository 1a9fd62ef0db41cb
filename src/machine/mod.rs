//! The transition-table state machine.
//!
//! A [`StateMachine`] holds a name, a [`TransitionTable`] and the current
//! state. It moves only through [`StateMachine::transition`] and
//! [`StateMachine::set_current`]; every other method is a pure query.
//!
//! # Example
//!
//! ```rust
//! use tablefsm::core::Transition;
//! use tablefsm::machine::StateMachine;
//! use tablefsm::registry::CallbackRegistry;
//!
//! let registry = CallbackRegistry::new();
//! let mut machine = StateMachine::new(
//!     "door",
//!     vec![
//!         Transition::new("Closed", "Open"),
//!         Transition::new("Open", "Closed"),
//!         Transition::new("Closed", "Broken"),
//!     ],
//!     "Closed",
//!     &registry,
//! );
//!
//! assert_eq!(machine.transitions(), vec!["Broken", "Open"]);
//! machine.transition("Open", None).unwrap();
//! assert_eq!(machine.current(), "Open");
//! assert!(machine.transition("Broken", None).is_err());
//! ```

mod error;

pub use error::TransitionError;

use crate::builder::error::BuildError;
use crate::builder::validation;
use crate::core::{Callback, Transition, TransitionTable};
use crate::registry::CallbackRegistry;
use std::any::Any;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Finite state machine driven by a static transition table.
///
/// Equality compares the name, the current state and the table (callbacks
/// by identifier). Cloning copies the table; callback functions are shared,
/// never re-registered.
#[derive(Clone, Debug)]
pub struct StateMachine {
    name: String,
    current: String,
    table: TransitionTable,
    terminal: BTreeSet<String>,
}

impl StateMachine {
    /// Create a machine, panicking if the definition is invalid.
    ///
    /// An empty transition list or an initial state without outgoing
    /// transitions is a programming error. Use [`StateMachine::try_new`] to
    /// handle it as a value instead.
    ///
    /// # Panics
    ///
    /// Panics when [`StateMachine::try_new`] would return an error.
    pub fn new<I>(
        name: impl Into<String>,
        transitions: I,
        initial: impl Into<String>,
        registry: &CallbackRegistry,
    ) -> Self
    where
        I: IntoIterator<Item = Transition>,
    {
        Self::try_new(name, transitions, initial, registry)
            .unwrap_or_else(|err| panic!("invalid state machine definition: {err}"))
    }

    /// Create a machine.
    ///
    /// Builds the table (later duplicates of an edge win), registers every
    /// identified callback under this machine's name in the order given,
    /// computes the terminal states and enters `initial`. Nothing is
    /// registered when validation fails.
    pub fn try_new<I>(
        name: impl Into<String>,
        transitions: I,
        initial: impl Into<String>,
        registry: &CallbackRegistry,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = Transition>,
    {
        let name: String = name.into();
        let initial: String = initial.into();
        let transitions: Vec<Transition> = transitions.into_iter().collect();
        let mut checks = vec![validation::has_transitions(transitions.len())];

        // Registration follows definition order, so the last definition of a
        // shared id wins.
        let identified: Vec<Callback> = transitions
            .iter()
            .map(|transition| transition.callback.clone())
            .filter(Callback::is_identified)
            .collect();

        let table = TransitionTable::from_transitions(transitions);
        checks.push(validation::initial_is_source(&table, &initial));
        validation::collect(checks)?;

        for callback in identified {
            registry.register(&name, callback);
        }

        let machine = Self::from_parts(name, initial, table);
        debug!(
            machine = %machine.name,
            initial = %machine.current,
            edges = machine.table.edge_count(),
            terminal = machine.terminal.len(),
            "state machine created"
        );
        Ok(machine)
    }

    /// Assemble a machine without validation or registration.
    pub(crate) fn from_parts(name: String, current: String, table: TransitionTable) -> Self {
        let terminal = table.terminal_states();
        Self {
            name,
            current,
            table,
            terminal,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Force the current state.
    ///
    /// Only states with at least one outgoing transition are accepted, so a
    /// terminal state can be reached through [`StateMachine::transition`]
    /// but never set directly.
    pub fn set_current(&mut self, state: &str) -> Result<(), TransitionError> {
        if !self.table.has_source(state) {
            return Err(TransitionError::illegal(&self.current, state));
        }
        self.current = state.to_string();
        Ok(())
    }

    /// Move to `next`, running the edge's callback.
    ///
    /// If the callback returns a non-empty state, the machine moves there
    /// instead of `next`. Override targets are not checked against the
    /// table: the machine can end up in a state with no outgoing edges that
    /// is not one of [`StateMachine::terminate_states`], since terminal
    /// states are computed once from the static table.
    pub fn transition(
        &mut self,
        next: &str,
        payload: Option<&dyn Any>,
    ) -> Result<(), TransitionError> {
        let callback = self
            .table
            .callback(&self.current, next)
            .ok_or_else(|| TransitionError::illegal(&self.current, next))?
            .clone();

        let target = match callback.invoke(&self.current, next, payload) {
            Some(redirect) => {
                debug!(
                    machine = %self.name,
                    requested = next,
                    redirect = %redirect,
                    callback_id = callback.id(),
                    "callback redirected transition"
                );
                redirect
            }
            None => next.to_string(),
        };

        if !self.table.has_source(&target) && !self.terminal.contains(&target) {
            warn!(
                machine = %self.name,
                state = %target,
                "entered a state with no outgoing transitions that is not terminal"
            );
        }

        debug!(machine = %self.name, from = %self.current, to = %target, "transition");
        self.current = target;
        Ok(())
    }

    /// Whether an edge `(current, next)` exists.
    pub fn can_transition(&self, next: &str) -> bool {
        self.table.contains_edge(&self.current, next)
    }

    /// Sorted states reachable from the current state in one step.
    pub fn transitions(&self) -> Vec<String> {
        self.table.targets(&self.current)
    }

    /// States that appear as a target but have no outgoing transitions.
    pub fn terminate_states(&self) -> &BTreeSet<String> {
        &self.terminal
    }

    pub fn is_terminated(&self) -> bool {
        self.terminal.contains(&self.current)
    }
}

impl PartialEq for StateMachine {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.current == other.current && self.table == other.table
    }
}

impl Eq for StateMachine {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn foo_bar_baz(registry: &CallbackRegistry) -> StateMachine {
        StateMachine::new(
            "foo-bar-baz",
            vec![
                Transition::new("foo", "bar"),
                Transition::new("foo", "bax"),
                Transition::new("bar", "baz"),
            ],
            "foo",
            registry,
        )
    }

    #[test]
    fn new_machine_starts_in_initial_state() {
        let machine = foo_bar_baz(&CallbackRegistry::new());

        assert_eq!(machine.name(), "foo-bar-baz");
        assert_eq!(machine.current(), "foo");
        assert!(!machine.is_terminated());
    }

    #[test]
    fn empty_transitions_fail() {
        let result = StateMachine::try_new(
            "empty",
            Vec::<Transition>::new(),
            "foo",
            &CallbackRegistry::new(),
        );

        let err = result.unwrap_err();
        assert!(err.contains(&BuildError::NoTransitions));
    }

    #[test]
    #[should_panic(expected = "invalid state machine definition")]
    fn new_panics_on_empty_transitions() {
        StateMachine::new(
            "empty",
            Vec::<Transition>::new(),
            "foo",
            &CallbackRegistry::new(),
        );
    }

    #[test]
    fn terminal_initial_state_fails() {
        let result = StateMachine::try_new(
            "terminal-initial",
            vec![Transition::new("foo", "bar")],
            "bar",
            &CallbackRegistry::new(),
        );

        assert_eq!(
            result.unwrap_err(),
            BuildError::InvalidInitialState {
                state: "bar".to_string()
            }
        );
    }

    #[test]
    fn failed_construction_registers_nothing() {
        let registry = CallbackRegistry::new();
        let result = StateMachine::try_new(
            "rejected",
            vec![Transition::new("foo", "bar").with_callback(Callback::id_only("cb"))],
            "missing",
            &registry,
        );

        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn construction_registers_identified_callbacks() {
        let registry = CallbackRegistry::new();
        StateMachine::new(
            "registering",
            vec![
                Transition::new("foo", "bar").with_callback(Callback::id_only("named")),
                Transition::new("bar", "baz").with_callback(Callback::anonymous(|_, _, _| None)),
            ],
            "foo",
            &registry,
        );

        assert!(registry.contains("registering", "named"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn shared_callback_id_registers_last_definition() {
        let registry = CallbackRegistry::new();
        StateMachine::new(
            "shared-id",
            vec![
                Transition::new("b", "c")
                    .with_callback(Callback::new("x", |_, _, _| Some("first".to_string()))),
                Transition::new("a", "b")
                    .with_callback(Callback::new("x", |_, _, _| Some("second".to_string()))),
            ],
            "a",
            &registry,
        );

        let registered = registry.lookup("shared-id", "x").unwrap();
        assert_eq!(registered.invoke("b", "c", None), Some("second".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn transition_moves_current() {
        let mut machine = foo_bar_baz(&CallbackRegistry::new());

        machine.transition("bar", None).unwrap();
        assert_eq!(machine.current(), "bar");

        machine.transition("baz", None).unwrap();
        assert_eq!(machine.current(), "baz");
        assert!(machine.is_terminated());
    }

    #[test]
    fn illegal_transition_leaves_state_unchanged() {
        let mut machine = foo_bar_baz(&CallbackRegistry::new());

        let err = machine.transition("baz", None).unwrap_err();

        assert_eq!(err, TransitionError::illegal("foo", "baz"));
        assert_eq!(machine.current(), "foo");
    }

    #[test]
    fn callback_receives_states_and_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let mut machine = StateMachine::new(
            "payload",
            vec![Transition::new("foo", "bar").with_callback(Callback::anonymous(
                move |from, to, payload| {
                    let value = payload.and_then(|p| p.downcast_ref::<&str>()).copied();
                    log.lock()
                        .unwrap()
                        .push(format!("{from}->{to}:{}", value.unwrap_or("none")));
                    None
                },
            ))],
            "foo",
            &CallbackRegistry::new(),
        );

        machine.transition("bar", Some(&"hello" as &dyn Any)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["foo->bar:hello".to_string()]);
    }

    #[test]
    fn callback_override_redirects() {
        let mut machine = StateMachine::new(
            "override",
            vec![
                Transition::new("foo", "bar"),
                Transition::new("foo", "bax")
                    .with_callback(Callback::anonymous(|_, _, _| Some("foo".to_string()))),
                Transition::new("bar", "baz"),
            ],
            "foo",
            &CallbackRegistry::new(),
        );

        machine.transition("bax", None).unwrap();

        assert_eq!(machine.current(), "foo");
    }

    #[test]
    fn override_to_unknown_state_is_stuck_but_not_terminal() {
        let mut machine = StateMachine::new(
            "stuck",
            vec![
                Transition::new("A", "B")
                    .with_callback(Callback::anonymous(|_, _, _| Some("C".to_string()))),
                Transition::new("B", "A"),
            ],
            "A",
            &CallbackRegistry::new(),
        );

        machine.transition("B", None).unwrap();

        assert_eq!(machine.current(), "C");
        assert!(machine.transitions().is_empty());
        assert!(!machine.terminate_states().contains("C"));
        assert!(!machine.is_terminated());
        assert!(machine.set_current("C").is_err());
    }

    #[test]
    fn callback_runs_once_per_transition() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut machine = StateMachine::new(
            "counting",
            vec![
                Transition::new("a", "b").with_callback(Callback::anonymous(move |_, _, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    None
                })),
                Transition::new("b", "a"),
            ],
            "a",
            &CallbackRegistry::new(),
        );

        machine.transition("b", None).unwrap();
        machine.transition("a", None).unwrap();
        machine.transition("b", None).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn can_transition_matches_table() {
        let mut machine = foo_bar_baz(&CallbackRegistry::new());

        assert!(machine.can_transition("bar"));
        assert!(machine.can_transition("bax"));
        assert!(!machine.can_transition("baz"));

        machine.transition("bar", None).unwrap();

        assert!(!machine.can_transition("bax"));
        assert!(machine.can_transition("baz"));
    }

    #[test]
    fn transitions_are_sorted_copies() {
        let machine = foo_bar_baz(&CallbackRegistry::new());

        let mut targets = machine.transitions();
        assert_eq!(targets, vec!["bar", "bax"]);

        targets.push("mutated".to_string());
        assert_eq!(machine.transitions(), vec!["bar", "bax"]);
    }

    #[test]
    fn set_current_requires_outgoing_edges() {
        let mut machine = foo_bar_baz(&CallbackRegistry::new());

        machine.set_current("bar").unwrap();
        assert_eq!(machine.current(), "bar");

        let err = machine.set_current("baz").unwrap_err();
        assert_eq!(err, TransitionError::illegal("bar", "baz"));
        assert_eq!(machine.current(), "bar");
    }

    #[test]
    fn terminate_states_are_precomputed() {
        let machine = foo_bar_baz(&CallbackRegistry::new());
        let terminal: Vec<&str> = machine
            .terminate_states()
            .iter()
            .map(String::as_str)
            .collect();

        assert_eq!(terminal, vec!["bax", "baz"]);
    }

    #[test]
    fn clone_is_independent() {
        let original = foo_bar_baz(&CallbackRegistry::new());
        let mut clone = original.clone();

        assert_eq!(clone, original);

        clone.transition("bar", None).unwrap();

        assert_eq!(original.current(), "foo");
        assert_ne!(clone, original);
    }

    #[test]
    fn clone_does_not_touch_registry() {
        let registry = CallbackRegistry::new();
        let machine = StateMachine::new(
            "clone-registry",
            vec![Transition::new("a", "b").with_callback(Callback::id_only("cb"))],
            "a",
            &registry,
        );

        let _clone = machine.clone();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn equality_checks_name_current_and_callback_ids() {
        let registry = CallbackRegistry::new();
        let build = |name: &str, id: &str| {
            StateMachine::new(
                name,
                vec![
                    Transition::new("a", "b").with_callback(Callback::id_only(id)),
                    Transition::new("b", "a"),
                ],
                "a",
                &registry,
            )
        };

        assert_eq!(build("m", "x"), build("m", "x"));
        assert_ne!(build("m", "x"), build("n", "x"));
        assert_ne!(build("m", "x"), build("m", "y"));

        let mut moved = build("m", "x");
        moved.set_current("b").unwrap();
        assert_ne!(moved, build("m", "x"));
    }

    #[test]
    fn equality_ignores_callback_functions() {
        let registry = CallbackRegistry::new();
        let with_fn = StateMachine::new(
            "fn-eq",
            vec![Transition::new("a", "b").with_callback(Callback::new("cb", |_, _, _| None))],
            "a",
            &registry,
        );
        let without_fn = StateMachine::new(
            "fn-eq",
            vec![Transition::new("a", "b").with_callback(Callback::id_only("cb"))],
            "a",
            &CallbackRegistry::new(),
        );

        assert_eq!(with_fn, without_fn);
    }

    #[test]
    fn absent_machines_compare_equal() {
        let none: Option<StateMachine> = None;
        let some = Some(foo_bar_baz(&CallbackRegistry::new()));

        assert_eq!(none, None);
        assert_ne!(none, some);
    }
}
