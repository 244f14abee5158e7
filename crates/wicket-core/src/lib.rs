//! # wicket-core
//!
//! The authentication client's machine interface and the reactive
//! primitives the binding layer projects it through.
//!
//! This crate does not implement authentication: transitions, network I/O,
//! and token storage live behind the [`interpreter::AuthBackend`] trait.
//! What lives here is the contract both sides share:
//!
//! - [`machine`]: the configuration space ([`machine::AuthSnapshot`] and
//!   its exhaustive predicates), context bag, and commands.
//! - [`reactive`]: [`reactive::Dynamic`] observable values and
//!   [`reactive::Derived`] equality-gated projections.
//! - [`interpreter`]: the per-session [`interpreter::AuthInterpreter`]
//!   handle with its FIFO command queue.
//! - [`actions`]: one-shot futures that send a command and resolve on the
//!   machine's terminal configuration for it.
//!
//! The UI-facing hooks live in the `wicket-hooks` crate.

pub mod actions;
pub mod errors;
pub mod interpreter;
pub mod machine;
pub mod reactive;

pub use errors::CommandError;
pub use interpreter::{AuthBackend, AuthInterpreter};
pub use machine::{AuthSnapshot, SessionContext, User};
pub use reactive::{Derived, Dynamic};
