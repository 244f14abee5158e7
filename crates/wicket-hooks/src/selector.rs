//! Selector bridge: reactive projections of the session's snapshot.

use wicket_core::machine::{ActionCategory, AuthError};
use wicket_core::{AuthSnapshot, Derived};

use crate::provider::use_auth_interpreter;

/// Derive a reactive value from the session's machine snapshot.
///
/// The projection runs synchronously against the current snapshot and then
/// on every emission; redundant values (under `PartialEq`) are suppressed.
/// Dropping the returned [`Derived`] unsubscribes it.
///
/// # Panics
///
/// Panics outside a live [`AuthProvider`](crate::provider::AuthProvider).
pub fn use_selector<T, F>(project: F) -> Derived<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(&AuthSnapshot) -> T + Send + Sync + 'static,
{
    let interpreter = use_auth_interpreter();
    interpreter.state().derive(project)
}

/// [`use_selector`] with a custom equality comparator.
pub fn use_selector_eq<T, F, E>(project: F, eq: E) -> Derived<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&AuthSnapshot) -> T + Send + Sync + 'static,
    E: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    let interpreter = use_auth_interpreter();
    interpreter.state().derive_eq(project, eq)
}

/// The last error recorded for an action category.
///
/// One shared lookup keyed by category; every composite hook reads its own
/// slot through this selector instead of recomputing error state.
pub fn use_error(category: ActionCategory) -> Derived<Option<AuthError>> {
    use_selector(move |snapshot| snapshot.context.errors.get(category).cloned())
}
