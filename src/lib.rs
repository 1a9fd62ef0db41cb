//! Tablefsm: a finite state machine driven by a transition table
//!
//! A machine occupies exactly one named state at a time. The legal moves are
//! the edges of a static table, each of which may carry an identified
//! callback. Machines can be cloned, compared and snapshotted; restoring a
//! snapshot re-attaches callback functions through a [`CallbackRegistry`].
//!
//! # Core Concepts
//!
//! - **Transition table**: `from -> to -> callback`, built once at construction
//! - **Callbacks**: an identifier plus an optional function that may redirect
//!   the destination of a transition
//! - **Terminal states**: targets with no outgoing edges, computed from the table
//! - **Registry**: `(machine name, callback id) -> callback`, consulted on restore
//!
//! # Example
//!
//! ```rust
//! use tablefsm::{checkpoint, transitions, CallbackRegistry, StateMachine};
//!
//! let registry = CallbackRegistry::new();
//! let mut machine = StateMachine::new(
//!     "installer",
//!     transitions![
//!         ("Unchecked", "Ready"),
//!         ("Ready", "Installing"),
//!         ("Ready", "Damaged"),
//!         ("Installing", "Running"),
//!         ("Installing", "Failed"),
//!         ("Running", "Ready"),
//!         ("Failed", "Damaged"),
//!         ("Failed", "Ready"),
//!     ],
//!     "Unchecked",
//!     &registry,
//! );
//!
//! machine.transition("Ready", None).unwrap();
//! assert_eq!(machine.transitions(), vec!["Damaged", "Installing"]);
//! assert!(machine.transition("Ready", None).is_err());
//!
//! let json = checkpoint::to_json(&machine).unwrap();
//! assert_eq!(checkpoint::from_json(&json, &registry).unwrap(), machine);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;
pub mod registry;

// Re-export commonly used types
pub use crate::builder::{BuildError, StateMachineBuilder};
pub use crate::checkpoint::{CheckpointError, RegistrySeed, Snapshot};
pub use crate::core::{Callback, HandleTransition, Transition, TransitionTable};
pub use crate::machine::{StateMachine, TransitionError};
pub use crate::registry::CallbackRegistry;
