//! `Derived<T>` - an equality-gated projection of a [`Dynamic`] source.
//!
//! A `Derived` is built from a source `Dynamic<S>`, a pure projection
//! `Fn(&S) -> T`, and an equality comparator. It initializes synchronously
//! from the source's current value and re-derives on every source emission,
//! publishing only when the projected value differs under the comparator.
//!
//! Because source watchers run synchronously and in emission order, a
//! `Derived` always settles on the projection of the latest emission; no
//! stale intermediate remains observable once the source has settled.
//!
//! Dropping the last handle to a `Derived` unregisters its source watcher.

use super::dynamic::{Dynamic, Subscription, WatchGuard};
use std::sync::Arc;

/// A reactive value derived from a [`Dynamic`] source through a pure
/// projection, with redundant updates suppressed by an equality comparator.
///
/// Cloning shares the underlying value and the source watcher; the watcher
/// is torn down when every clone is dropped.
#[derive(Clone)]
pub struct Derived<T> {
    value: Dynamic<T>,
    _watch: Arc<WatchGuard>,
}

impl<T: Clone + Send + Sync + 'static> Derived<T> {
    /// Get the current derived value.
    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Version of the derived value; bumps only on published changes.
    pub fn version(&self) -> u64 {
        self.value.version()
    }

    /// Poll-based subscription to published changes.
    pub fn subscribe(&self) -> Subscription<T> {
        self.value.subscribe()
    }

    /// Push watcher over published changes.
    pub fn watch<F>(&self, watcher: F) -> WatchGuard
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.value.watch(watcher)
    }
}

impl<T: Clone + Send + Sync + std::fmt::Debug + 'static> std::fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derived").field("value", &self.get()).finish()
    }
}

impl<S: Clone + Send + Sync + 'static> Dynamic<S> {
    /// Derive a reactive projection using `PartialEq` to suppress redundant
    /// updates.
    pub fn derive<T, F>(&self, project: F) -> Derived<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        self.derive_eq(project, |a: &T, b: &T| a == b)
    }

    /// Derive a reactive projection with a custom equality comparator.
    ///
    /// The comparator receives `(current, candidate)` and should return
    /// `true` when the two are to be considered equal, in which case the
    /// candidate is discarded and downstream observers are not notified.
    pub fn derive_eq<T, F, E>(&self, project: F, eq: E) -> Derived<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        // Initialize synchronously from the source's current value.
        let value = Dynamic::new(project(&self.get()));

        let target = value.clone();
        let watch = self.watch(move |source| {
            let candidate = project(source);
            let current = target.get();
            if !eq(&current, &candidate) {
                target.set(candidate);
            }
        });

        Derived {
            value,
            _watch: Arc::new(watch),
        }
    }
}
