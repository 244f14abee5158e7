//! Test backends and fixtures shared by the wicket crates.
//!
//! The centerpiece is [`ScriptedBackend`], an in-process stand-in for the
//! real authentication core: it walks each command through a loading
//! emission, yields to the runtime, then settles on a scripted terminal
//! configuration. Tests script failure branches up front and read back what
//! the backend was asked to do.
//!
//! Add it to a crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! wicket-testkit = { path = "../wicket-testkit" }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod backend;
pub mod factories;

pub use backend::ScriptedBackend;
pub use factories::{init_test_tracing, test_access_token, test_user};
