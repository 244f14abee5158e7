//! # Machine Interface
//!
//! The vocabulary shared with the external authentication core: the
//! configuration space of its state machine, the extended-state context,
//! and the commands it accepts. The transition logic itself lives behind
//! [`AuthBackend`](crate::interpreter::AuthBackend); this module only fixes
//! the shapes both sides agree on.

mod command;
mod context;
mod state;

pub use command::{AuthCommand, PasswordlessOptions, SignUpOptions};
pub use context::{ActionCategory, AuthError, AuthErrorCode, ErrorSlots, SessionContext, User};
pub use state::{AuthMethod, AuthSnapshot, AuthenticationState, EmailState, SignedOutState};
