//! Macros for ergonomic transition lists.

/// Build a `Vec<Transition>` from `(from, to)` and `(from, to, callback)` tuples.
///
/// # Example
///
/// ```
/// use tablefsm::core::Callback;
/// use tablefsm::transitions;
///
/// let transitions = transitions![
///     ("Unchecked", "Ready"),
///     ("Ready", "Installing", Callback::id_only("install")),
/// ];
///
/// assert_eq!(transitions.len(), 2);
/// assert_eq!(transitions[1].callback.id(), "install");
/// ```
#[macro_export]
macro_rules! transitions {
    ($(($from:expr, $to:expr $(, $callback:expr)?)),* $(,)?) => {
        vec![
            $(
                $crate::core::Transition::new($from, $to)
                    $(.with_callback($callback))?
            ),*
        ]
    };
}
