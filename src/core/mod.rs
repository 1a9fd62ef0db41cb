//! Core transition-table types.
//!
//! This module contains the plain data the machine is built from:
//! - Identified callbacks attached to edges
//! - Transition definitions
//! - The two-level transition table with terminal-state detection
//!
//! Nothing in this module performs I/O or touches the callback registry.

mod callback;
mod table;
mod transition;

pub use callback::{Callback, HandleTransition};
pub use table::TransitionTable;
pub use transition::Transition;
