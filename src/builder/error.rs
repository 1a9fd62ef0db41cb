//! Build errors for state machine construction.

use thiserror::Error;

/// Errors that can occur when constructing a state machine.
///
/// Construction validates every rule before failing, so a single build can
/// report several problems at once through [`BuildError::Multiple`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Initial state <{state}> has no outgoing transitions")]
    InvalidInitialState { state: String },

    #[error("{}", render_all(.0))]
    Multiple(Vec<BuildError>),
}

impl BuildError {
    /// Every individual violation carried by this error.
    pub fn violations(&self) -> Vec<&BuildError> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(BuildError::violations).collect(),
            other => vec![other],
        }
    }

    /// Whether this error is, or contains, `violation`.
    pub fn contains(&self, violation: &BuildError) -> bool {
        self.violations().into_iter().any(|error| error == violation)
    }
}

fn render_all(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_joins_messages() {
        let err = BuildError::Multiple(vec![
            BuildError::NoTransitions,
            BuildError::InvalidInitialState {
                state: "foo".to_string(),
            },
        ]);

        assert_eq!(
            err.to_string(),
            "No transitions defined. Add at least one transition; \
             Initial state <foo> has no outgoing transitions"
        );
    }

    #[test]
    fn violations_flattens_nested_errors() {
        let err = BuildError::Multiple(vec![
            BuildError::NoTransitions,
            BuildError::Multiple(vec![BuildError::MissingInitialState]),
        ]);

        assert_eq!(
            err.violations(),
            vec![&BuildError::NoTransitions, &BuildError::MissingInitialState]
        );
        assert!(err.contains(&BuildError::MissingInitialState));
    }

    #[test]
    fn single_error_is_its_own_violation() {
        let err = BuildError::NoTransitions;

        assert_eq!(err.violations(), vec![&BuildError::NoTransitions]);
    }
}
