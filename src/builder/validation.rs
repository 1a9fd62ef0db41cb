//! Construction checks, accumulated with `Validation`.
//!
//! Every check runs, and all failures are reported together instead of
//! stopping at the first one.

use crate::builder::error::BuildError;
use crate::core::TransitionTable;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of a single construction check.
pub type DefinitionCheck = Validation<(), NonEmptyVec<BuildError>>;

/// The transition list must not be empty.
pub fn has_transitions(count: usize) -> DefinitionCheck {
    if count == 0 {
        Validation::fail(BuildError::NoTransitions)
    } else {
        Validation::success(())
    }
}

/// The initial state must have at least one outgoing transition.
pub fn initial_is_source(table: &TransitionTable, initial: &str) -> DefinitionCheck {
    if table.has_source(initial) {
        Validation::success(())
    } else {
        Validation::fail(BuildError::InvalidInitialState {
            state: initial.to_string(),
        })
    }
}

/// Combine checks into a single result.
///
/// One failure is returned as-is; several are wrapped in
/// [`BuildError::Multiple`].
pub fn collect(checks: Vec<DefinitionCheck>) -> Result<(), BuildError> {
    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => {
            let mut errors: Vec<BuildError> = errors.iter().cloned().collect();
            if errors.len() == 1 {
                Err(errors.remove(0))
            } else {
                Err(BuildError::Multiple(errors))
            }
        }
    }
}
