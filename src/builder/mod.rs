//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder, construction errors, and the
//! validation rules applied to every new machine.

pub mod error;
pub mod machine;
pub mod macros;
pub mod validation;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
