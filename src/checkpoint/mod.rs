//! Snapshot and restore for state machines.
//!
//! A snapshot carries the machine name, the current state and the table
//! projected onto callback identifiers:
//!
//! ```json
//! {"Name": "installer", "Current": "Ready", "Transitions": {"Ready": {"Installing": "log"}}}
//! ```
//!
//! Callback functions are never serialized. Restoring looks every
//! `(name, id)` pair up in a [`CallbackRegistry`]; a pair that was never
//! registered restores as the empty callback, so the id is lost and a
//! re-encoded snapshot carries `""` for that edge.
//!
//! # Example
//!
//! ```rust
//! use tablefsm::checkpoint;
//! use tablefsm::core::{Callback, Transition};
//! use tablefsm::machine::StateMachine;
//! use tablefsm::registry::CallbackRegistry;
//!
//! let registry = CallbackRegistry::new();
//! let machine = StateMachine::new(
//!     "installer",
//!     vec![Transition::new("Ready", "Installing")
//!         .with_callback(Callback::new("log", |_, _, _| None))],
//!     "Ready",
//!     &registry,
//! );
//!
//! let json = checkpoint::to_json(&machine).unwrap();
//! let restored = checkpoint::from_json(&json, &registry).unwrap();
//!
//! assert_eq!(restored, machine);
//! assert!(restored.table().callback("Ready", "Installing").unwrap().has_handler());
//! ```

use crate::core::TransitionTable;
use crate::machine::StateMachine;
use crate::registry::CallbackRegistry;
use serde::de::DeserializeSeed;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub mod error;

pub use error::CheckpointError;

/// Serializable form of a [`StateMachine`].
/// Does NOT include callback functions (not serializable).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    /// Machine name, also the registry namespace
    pub name: String,

    /// Current state
    pub current: String,

    /// `from -> to -> callback id`, with `""` for edges without a callback
    #[serde(default)]
    pub transitions: BTreeMap<String, BTreeMap<String, String>>,
}

impl From<&StateMachine> for Snapshot {
    fn from(machine: &StateMachine) -> Self {
        Self {
            name: machine.name().to_string(),
            current: machine.current().to_string(),
            transitions: machine.table().callback_ids(),
        }
    }
}

impl Snapshot {
    /// Rebuild a machine, re-attaching callbacks from `registry`.
    ///
    /// The current state is taken as-is and the terminal states are
    /// recomputed from the restored table.
    pub fn restore(self, registry: &CallbackRegistry) -> StateMachine {
        let mut table = TransitionTable::new();
        let mut unresolved = 0usize;

        for (from, tos) in self.transitions {
            for (to, id) in tos {
                let (callback, found) = registry.resolve(&self.name, &id);
                if !found {
                    unresolved += 1;
                    warn!(
                        machine = %self.name,
                        from = %from,
                        to = %to,
                        callback_id = %id,
                        "callback not registered, restoring edge without a callback"
                    );
                }
                table.insert(from.clone(), to, callback);
            }
        }

        debug!(
            machine = %self.name,
            current = %self.current,
            edges = table.edge_count(),
            unresolved,
            "state machine restored"
        );
        StateMachine::from_parts(self.name, self.current, table)
    }
}

impl StateMachine {
    /// Capture this machine as a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }

    /// Rebuild a machine from a snapshot; see [`Snapshot::restore`].
    pub fn restore(snapshot: Snapshot, registry: &CallbackRegistry) -> Self {
        snapshot.restore(registry)
    }
}

impl Serialize for StateMachine {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Snapshot::from(self).serialize(serializer)
    }
}

/// Deserializes a [`StateMachine`] against a callback registry.
///
/// A machine cannot implement `Deserialize` on its own because callback
/// functions live in the registry; this seed supplies it.
///
/// ```rust
/// use serde::de::DeserializeSeed;
/// use tablefsm::checkpoint::RegistrySeed;
/// use tablefsm::registry::CallbackRegistry;
///
/// let registry = CallbackRegistry::new();
/// let json = r#"{"Name":"m","Current":"a","Transitions":{"a":{"b":""}}}"#;
///
/// let mut de = serde_json::Deserializer::from_str(json);
/// let machine = RegistrySeed::new(&registry).deserialize(&mut de).unwrap();
/// assert_eq!(machine.transitions(), vec!["b"]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RegistrySeed<'a> {
    registry: &'a CallbackRegistry,
}

impl<'a> RegistrySeed<'a> {
    pub fn new(registry: &'a CallbackRegistry) -> Self {
        Self { registry }
    }
}

impl<'de> DeserializeSeed<'de> for RegistrySeed<'_> {
    type Value = StateMachine;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Snapshot::deserialize(deserializer).map(|snapshot| snapshot.restore(self.registry))
    }
}

/// Encode a machine as compact JSON.
pub fn to_json(machine: &StateMachine) -> Result<String, CheckpointError> {
    serde_json::to_string(machine).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
}

/// Encode a machine as indented JSON.
pub fn to_json_pretty(machine: &StateMachine) -> Result<String, CheckpointError> {
    serde_json::to_string_pretty(machine)
        .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
}

/// Decode a machine from JSON, resolving callbacks through `registry`.
pub fn from_json(json: &str, registry: &CallbackRegistry) -> Result<StateMachine, CheckpointError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let machine = RegistrySeed::new(registry)
        .deserialize(&mut deserializer)
        .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
    deserializer
        .end()
        .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
    Ok(machine)
}

/// Encode a machine in the compact binary format.
pub fn to_bytes(machine: &StateMachine) -> Result<Vec<u8>, CheckpointError> {
    bincode::serialize(&machine.snapshot())
        .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
}

/// Decode a machine from the binary format, resolving callbacks through `registry`.
pub fn from_bytes(bytes: &[u8], registry: &CallbackRegistry) -> Result<StateMachine, CheckpointError> {
    let snapshot: Snapshot = bincode::deserialize(bytes)
        .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
    Ok(snapshot.restore(registry))
}
