//! # Reactive Primitives
//!
//! Core reactive types the binding layer is built on:
//!
//! - [`Dynamic<T>`]: a shared observable value with a version counter,
//!   poll-based [`Subscription`]s, and synchronous push watchers.
//! - [`Derived<T>`]: an equality-gated projection of a `Dynamic`, created
//!   with [`Dynamic::derive`] or [`Dynamic::derive_eq`].
//!
//! ## Design Principles
//!
//! 1. **Runtime-agnostic**: only std types (RwLock, Mutex, AtomicU64);
//!    works with any async runtime or in sync-only code.
//!
//! 2. **Emission order**: watchers run synchronously on `set`, in order,
//!    so a derivation chain settles on the latest emission before control
//!    returns to the emitter.
//!
//! 3. **Scoped teardown**: every subscription mechanism is tied to a value
//!    whose drop releases it ([`WatchGuard`], [`Derived`]).

mod derived;
mod dynamic;

pub use derived::Derived;
pub use dynamic::{Dynamic, Subscription, WatchGuard};
