//! Two-level transition table: `from -> (to -> callback)`.

use super::callback::Callback;
use super::transition::Transition;
use std::collections::{BTreeMap, BTreeSet};

/// Directed graph of states keyed by source state.
///
/// Both levels are ordered maps, so iteration over sources and targets is
/// always lexicographic. Equality is plain mapping equality; callbacks
/// compare by identifier only.
///
/// # Example
///
/// ```rust
/// use tablefsm::core::{Transition, TransitionTable};
///
/// let table = TransitionTable::from_transitions(vec![
///     Transition::new("Ready", "Installing"),
///     Transition::new("Ready", "Damaged"),
///     Transition::new("Installing", "Running"),
/// ]);
///
/// assert_eq!(table.targets("Ready"), vec!["Damaged", "Installing"]);
/// assert!(table.terminal_states().contains("Damaged"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionTable {
    edges: BTreeMap<String, BTreeMap<String, Callback>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from transitions, later duplicates overwriting earlier ones.
    pub fn from_transitions<I>(transitions: I) -> Self
    where
        I: IntoIterator<Item = Transition>,
    {
        let mut table = Self::new();
        for transition in transitions {
            table.insert(transition.from, transition.to, transition.callback);
        }
        table
    }

    /// Insert or overwrite the edge `(from, to)`.
    ///
    /// Returns the callback previously stored for that edge, if any.
    pub fn insert(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        callback: Callback,
    ) -> Option<Callback> {
        self.edges
            .entry(from.into())
            .or_default()
            .insert(to.into(), callback)
    }

    /// Callback stored for the edge `(from, to)`.
    pub fn callback(&self, from: &str, to: &str) -> Option<&Callback> {
        self.edges.get(from)?.get(to)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.callback(from, to).is_some()
    }

    /// Whether `state` has at least one outgoing edge.
    pub fn has_source(&self, state: &str) -> bool {
        self.edges.contains_key(state)
    }

    /// Sorted targets reachable from `from` in one step.
    pub fn targets(&self, from: &str) -> Vec<String> {
        self.edges
            .get(from)
            .map(|tos| tos.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// States referenced as a target that have no outgoing edges.
    pub fn terminal_states(&self) -> BTreeSet<String> {
        self.edges
            .values()
            .flat_map(|tos| tos.keys())
            .filter(|to| !self.edges.contains_key(to.as_str()))
            .cloned()
            .collect()
    }

    /// Iterate over every edge as `(from, to, callback)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &Callback)> {
        self.edges.iter().flat_map(|(from, tos)| {
            tos.iter()
                .map(move |(to, callback)| (from.as_str(), to.as_str(), callback))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Project the table onto callback identifiers.
    pub fn callback_ids(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.edges
            .iter()
            .map(|(from, tos)| {
                let ids = tos
                    .iter()
                    .map(|(to, callback)| (to.clone(), callback.id().to_string()))
                    .collect();
                (from.clone(), ids)
            })
            .collect()
    }
}
