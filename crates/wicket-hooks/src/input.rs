//! Plain-or-reactive action inputs.
//!
//! Dispatchers accept either a plain value or a live [`Dynamic`] reference
//! and read the current value at call time only; passing a reactive
//! reference never subscribes the dispatcher to its future changes.

use wicket_core::Dynamic;

/// An action input supplied either as a plain value or as a reactive
/// reference.
#[derive(Clone, Debug)]
pub enum Input<T: Clone + Send + Sync + 'static> {
    /// A plain value, used as-is.
    Value(T),
    /// A reactive reference, read at call time.
    Ref(Dynamic<T>),
}

impl<T: Clone + Send + Sync + 'static> Input<T> {
    /// The current value: the plain value itself, or the reference's value
    /// at this instant.
    pub fn get(&self) -> T {
        match self {
            Self::Value(value) => value.clone(),
            Self::Ref(dynamic) => dynamic.get(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> From<T> for Input<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Clone + Send + Sync + 'static> From<Dynamic<T>> for Input<T> {
    fn from(dynamic: Dynamic<T>) -> Self {
        Self::Ref(dynamic)
    }
}

impl<T: Clone + Send + Sync + 'static> From<&Dynamic<T>> for Input<T> {
    fn from(dynamic: &Dynamic<T>) -> Self {
        Self::Ref(dynamic.clone())
    }
}

impl From<&str> for Input<String> {
    fn from(value: &str) -> Self {
        Self::Value(value.to_owned())
    }
}
