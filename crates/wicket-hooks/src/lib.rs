//! # wicket-hooks
//!
//! Reactive authentication hooks over a session's machine interpreter.
//!
//! The session owner installs an [`AuthProvider`] once; every hook then
//! resolves the same interpreter and exposes slices of its snapshot as
//! [`Derived`](wicket_core::Derived) values plus one-shot action methods.
//! Hooks are thin: all flow semantics (queueing, settlement, error slots)
//! live in `wicket-core`, and every boolean a hook exposes is a projection
//! of the machine's current configuration, never tracked locally.
//!
//! - [`provider`]: session installation and the interpreter accessor.
//! - [`selector`]: generic snapshot projections and the shared error
//!   lookup.
//! - [`input`]: plain-or-reactive action arguments, read at call time.
//! - [`status`]: read-only session hooks (status, token, user, locale).
//! - [`sign_in`], [`sign_up`], [`sign_out`]: composite flow hooks.

pub mod input;
pub mod provider;
pub mod selector;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod status;

pub use input::Input;
pub use provider::{use_auth_interpreter, AuthProvider};
pub use selector::{use_error, use_selector, use_selector_eq};
pub use sign_in::{
    use_sign_in_email_password, use_sign_in_email_passwordless, SignInEmailPassword,
    SignInEmailPasswordless,
};
pub use sign_out::{use_sign_out, SignOut};
pub use sign_up::{use_sign_up_email_password, SignUpEmailPassword};
pub use status::{
    use_access_token, use_authentication_status, use_user_data, use_user_locale,
    AuthenticationStatus,
};
