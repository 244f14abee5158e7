//! `Dynamic<T>` - A reactive value with change notifications
//!
//! `Dynamic<T>` wraps a value and provides change notification through two
//! complementary mechanisms:
//!
//! - [`Subscription`]: poll-based, version-tracked. Polling always observes
//!   the latest value; intermediate values between polls are coalesced away.
//! - Watchers: push-based callbacks registered with [`Dynamic::watch`],
//!   invoked synchronously and in emission order on every `set`. A watcher
//!   lives until its [`WatchGuard`] is dropped.
//!
//! # Runtime Agnostic Design
//!
//! This module uses only std primitives (RwLock, Mutex, AtomicU64) so it can
//! be driven from any async runtime or from sync-only code.

// Allow expect on lock access - lock poisoning from panics is
// unrecoverable, so expect() is the appropriate handling pattern.
#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

type WatcherFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Inner state of a Dynamic value.
struct DynamicInner<T> {
    /// The current value, protected by RwLock for sync access.
    value: RwLock<T>,
    /// Version counter incremented on each update.
    version: AtomicU64,
    /// Registered push watchers, keyed for removal.
    watchers: Mutex<Vec<(u64, WatcherFn<T>)>>,
    /// Next watcher key.
    next_watcher: AtomicU64,
}

impl<T> DynamicInner<T> {
    fn remove_watcher(&self, id: u64) {
        let mut watchers = self.watchers.lock().expect("Dynamic watcher lock poisoned");
        watchers.retain(|(watcher_id, _)| *watcher_id != id);
    }
}

/// A reactive value that can be observed for changes.
///
/// Cloning a `Dynamic` produces another handle to the same underlying value;
/// all clones observe the same state and version counter.
///
/// # Example
///
/// ```rust,ignore
/// use wicket_core::reactive::Dynamic;
///
/// let counter = Dynamic::new(0);
/// let mut sub = counter.subscribe();
///
/// counter.set(1);
/// assert_eq!(counter.get(), 1);
/// assert_eq!(sub.poll(), Some(1));
/// ```
#[derive(Clone)]
pub struct Dynamic<T> {
    inner: Arc<DynamicInner<T>>,
}

impl<T: Clone + Send + Sync + 'static> Dynamic<T> {
    /// Create a new Dynamic with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(DynamicInner {
                value: RwLock::new(value),
                version: AtomicU64::new(0),
                watchers: Mutex::new(Vec::new()),
                next_watcher: AtomicU64::new(0),
            }),
        }
    }

    /// Get the current value.
    ///
    /// This is a synchronous operation that clones the value.
    pub fn get(&self) -> T {
        self.inner
            .value
            .read()
            .expect("Dynamic lock poisoned")
            .clone()
    }

    /// Get the current version number.
    ///
    /// The version is incremented each time `set()` is called.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    /// Set a new value, increment the version, and notify watchers.
    ///
    /// Watchers run synchronously on the calling thread, in registration
    /// order, after the value and version are visible. Poll subscriptions
    /// will see the new value on their next `poll()` call.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.inner.value.write().expect("Dynamic lock poisoned");
            *guard = value.clone();
        }
        self.inner.version.fetch_add(1, Ordering::Release);

        // Snapshot the watcher list before invoking so a watcher may
        // register or unregister without deadlocking.
        let watchers: Vec<WatcherFn<T>> = {
            let guard = self.inner.watchers.lock().expect("Dynamic watcher lock poisoned");
            guard.iter().map(|(_, w)| Arc::clone(w)).collect()
        };
        for watcher in &watchers {
            watcher(&value);
        }
    }

    /// Update the value using a function.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(T) -> T,
    {
        let new_value = f(self.get());
        self.set(new_value);
    }

    /// Subscribe to value changes.
    ///
    /// Returns a `Subscription` that can poll for changes. The subscription
    /// tracks the version it last saw and returns new values when the
    /// Dynamic has been updated.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            source: Arc::clone(&self.inner),
            last_version: self.inner.version.load(Ordering::Acquire),
        }
    }

    /// Register a push watcher invoked on every subsequent `set`.
    ///
    /// The watcher does not observe the current value; only emissions made
    /// after registration. It is removed when the returned [`WatchGuard`]
    /// is dropped, which ties the subscription's lifetime to the consuming
    /// scope.
    pub fn watch<F>(&self, watcher: F) -> WatchGuard
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_watcher.fetch_add(1, Ordering::Relaxed);
        {
            let mut watchers = self
                .inner
                .watchers
                .lock()
                .expect("Dynamic watcher lock poisoned");
            watchers.push((id, Arc::new(watcher)));
        }

        let source: Weak<DynamicInner<T>> = Arc::downgrade(&self.inner);
        WatchGuard {
            unregister: Some(Box::new(move || {
                if let Some(inner) = source.upgrade() {
                    inner.remove_watcher(id);
                }
            })),
        }
    }

    /// Number of live watchers. Exposed for teardown assertions.
    pub fn watcher_count(&self) -> usize {
        self.inner
            .watchers
            .lock()
            .expect("Dynamic watcher lock poisoned")
            .len()
    }
}

impl<T: Clone + Send + Sync + Default + 'static> Default for Dynamic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + std::fmt::Debug + 'static> std::fmt::Debug for Dynamic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dynamic")
            .field("value", &self.get())
            .field("version", &self.version())
            .finish()
    }
}

/// A poll-based subscription to a [`Dynamic`] value.
///
/// `Subscription` tracks the version it last observed. Polling after several
/// rapid updates yields only the latest value; intermediate values are
/// coalesced.
pub struct Subscription<T> {
    source: Arc<DynamicInner<T>>,
    last_version: u64,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    /// Check if the source has changed since the last poll.
    pub fn has_changed(&self) -> bool {
        self.source.version.load(Ordering::Acquire) > self.last_version
    }

    /// Poll for a new value.
    ///
    /// Returns `Some(value)` if the source has been updated since the last
    /// poll, updating the subscription's tracked version. Returns `None` if
    /// no change.
    pub fn poll(&mut self) -> Option<T> {
        let current_version = self.source.version.load(Ordering::Acquire);
        if current_version > self.last_version {
            self.last_version = current_version;
            Some(
                self.source
                    .value
                    .read()
                    .expect("Dynamic lock poisoned")
                    .clone(),
            )
        } else {
            None
        }
    }

    /// Get the current value regardless of whether it changed.
    pub fn get(&self) -> T {
        self.source
            .value
            .read()
            .expect("Dynamic lock poisoned")
            .clone()
    }
}

/// Removes a registered watcher when dropped.
///
/// Holding the guard keeps the watcher alive; dropping it (or the source
/// `Dynamic`) releases the subscription. There is no way to leak a watcher
/// past the scope that owns the guard.
pub struct WatchGuard {
    unregister: Option<Box<dyn FnOnce() + Send>>,
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl std::fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn new_and_get() {
        let d = Dynamic::new(42);
        assert_eq!(d.get(), 42);
    }

    #[test]
    fn set_and_version() {
        let d = Dynamic::new(0);
        assert_eq!(d.version(), 0);

        d.set(100);
        assert_eq!(d.get(), 100);
        assert_eq!(d.version(), 1);
    }

    #[test]
    fn update_applies_function() {
        let d = Dynamic::new(10);
        d.update(|x| x * 2);
        assert_eq!(d.get(), 20);
    }

    #[test]
    fn clone_shares_state() {
        let d1 = Dynamic::new(0);
        let d2 = d1.clone();

        d1.set(42);
        assert_eq!(d2.get(), 42);
    }

    #[test]
    fn subscription_polls_latest() {
        let d = Dynamic::new(0);
        let mut sub = d.subscribe();

        // Subscription starts at the current version.
        assert_eq!(sub.poll(), None);

        d.set(1);
        assert_eq!(sub.poll(), Some(1));
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn subscription_coalesces_updates() {
        let d = Dynamic::new(0);
        let mut sub = d.subscribe();

        d.set(1);
        d.set(2);
        d.set(3);

        // Version-based, not queue-based: only the latest is observable.
        assert_eq!(sub.poll(), Some(3));
        assert_eq!(sub.poll(), None);
    }

    #[test]
    fn subscription_has_changed() {
        let d = Dynamic::new(0);
        let mut sub = d.subscribe();

        assert!(!sub.has_changed());
        d.set(1);
        assert!(sub.has_changed());

        let _ = sub.poll();
        assert!(!sub.has_changed());
    }

    #[test]
    fn watcher_sees_each_emission_in_order() {
        let d = Dynamic::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let _guard = d.watch(move |v| seen_clone.lock().unwrap().push(*v));

        d.set(1);
        d.set(2);
        d.set(3);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn watcher_does_not_observe_current_value() {
        let d = Dynamic::new(7);
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        let _guard = d.watch(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        d.set(8);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_guard_removes_watcher() {
        let d = Dynamic::new(0);
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = Arc::clone(&calls);
        let guard = d.watch(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(d.watcher_count(), 1);

        d.set(1);
        drop(guard);
        assert_eq!(d.watcher_count(), 0);

        d.set(2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn multiple_watchers_all_notified() {
        let d = Dynamic::new(0);
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));

        let a_clone = Arc::clone(&a);
        let b_clone = Arc::clone(&b);
        let _g1 = d.watch(move |_| {
            a_clone.fetch_add(1, Ordering::SeqCst);
        });
        let _g2 = d.watch(move |_| {
            b_clone.fetch_add(1, Ordering::SeqCst);
        });

        d.set(5);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }
}
