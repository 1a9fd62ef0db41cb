//! Callback registry used to re-attach functions when restoring machines.
//!
//! Callback functions cannot be serialized, so snapshots only carry callback
//! identifiers. The registry maps `(machine name, callback id)` to the live
//! [`Callback`] so that a decoder can find the function again.
//!
//! Registries are explicit values: create one per process (or per test) and
//! pass it to construction and decoding. Cloning a registry yields another
//! handle to the same store. [`CallbackRegistry::global`] provides a lazily
//! created process-wide instance for callers that want one.
//!
//! Entries are never pruned; re-registering the same key replaces the entry.

use crate::core::Callback;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::trace;

type Handlers = HashMap<String, HashMap<String, Callback>>;

/// Thread-safe store of identified callbacks, namespaced by machine name.
///
/// Reads and writes go through a read/write lock, so any number of machines
/// can be built or restored concurrently against the same registry.
///
/// # Example
///
/// ```rust
/// use tablefsm::core::Callback;
/// use tablefsm::registry::CallbackRegistry;
///
/// let registry = CallbackRegistry::new();
/// registry.register("installer", Callback::new("log", |_, _, _| None));
///
/// let found = registry.lookup("installer", "log");
/// assert!(found.is_some_and(|callback| callback.has_handler()));
/// assert!(registry.lookup("other-machine", "log").is_none());
/// ```
#[derive(Clone, Default)]
pub struct CallbackRegistry {
    handlers: Arc<RwLock<Handlers>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use.
    pub fn global() -> &'static CallbackRegistry {
        static GLOBAL: OnceLock<CallbackRegistry> = OnceLock::new();
        GLOBAL.get_or_init(CallbackRegistry::new)
    }

    /// Register `callback` under `(machine, callback.id())`.
    ///
    /// Callbacks without an identifier are ignored and `false` is returned.
    pub fn register(&self, machine: &str, callback: Callback) -> bool {
        if !callback.is_identified() {
            return false;
        }

        trace!(machine, callback_id = callback.id(), "registering callback");
        let mut handlers = self.handlers.write();
        handlers
            .entry(machine.to_string())
            .or_default()
            .insert(callback.id().to_string(), callback);
        true
    }

    /// Look up the callback registered under `(machine, id)`.
    pub fn lookup(&self, machine: &str, id: &str) -> Option<Callback> {
        let handlers = self.handlers.read();
        let found = handlers.get(machine)?.get(id).cloned();
        trace!(machine, callback_id = id, found = found.is_some(), "callback lookup");
        found
    }

    /// Resolve `id` for `machine`, degrading to the empty callback.
    ///
    /// An empty id, or an id that was never registered, resolves to
    /// [`Callback::default`]: no id and no function. The second element of
    /// the result is `false` only for a non-empty id with no entry.
    pub fn resolve(&self, machine: &str, id: &str) -> (Callback, bool) {
        if id.is_empty() {
            return (Callback::default(), true);
        }
        match self.lookup(machine, id) {
            Some(callback) => (callback, true),
            None => (Callback::default(), false),
        }
    }

    pub fn contains(&self, machine: &str, id: &str) -> bool {
        self.handlers
            .read()
            .get(machine)
            .is_some_and(|ids| ids.contains_key(id))
    }

    /// Number of registered callbacks across all machines.
    pub fn len(&self) -> usize {
        self.handlers.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.read();
        let mut machines: Vec<&String> = handlers.keys().collect();
        machines.sort();
        f.debug_struct("CallbackRegistry")
            .field("machines", &machines)
            .field("callbacks", &handlers.values().map(HashMap::len).sum::<usize>())
            .finish()
    }
}
