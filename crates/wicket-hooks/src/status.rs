//! Session-wide read-only hooks: status, token, user, locale.

use wicket_core::machine::User;
use wicket_core::Derived;

use crate::selector::{use_selector, use_selector_eq};

/// Reactive view of whether a session is established or being established.
pub struct AuthenticationStatus {
    /// The machine is in its terminal authenticated configuration.
    pub is_authenticated: Derived<bool>,
    /// Some authentication flow is in flight, regardless of variant.
    pub is_loading: Derived<bool>,
}

/// Coarse authentication status for gating whole views.
///
/// # Panics
///
/// Panics outside a live [`AuthProvider`](crate::provider::AuthProvider),
/// as do all hooks below.
pub fn use_authentication_status() -> AuthenticationStatus {
    AuthenticationStatus {
        is_authenticated: use_selector(|s| s.is_signed_in()),
        is_loading: use_selector(|s| s.is_authenticating_any()),
    }
}

/// The current access token (JWT), if signed in.
pub fn use_access_token() -> Derived<Option<String>> {
    use_selector(|s| s.context.access_token.clone())
}

/// The current user, if signed in.
pub fn use_user_data() -> Derived<Option<User>> {
    use_selector(|s| s.context.user.clone())
}

/// The current user's locale.
///
/// Uses an explicit equality comparator so snapshots that change other user
/// fields do not re-notify locale observers.
pub fn use_user_locale() -> Derived<Option<String>> {
    use_selector_eq(
        |s| s.context.user.as_ref().map(|u| u.locale.clone()),
        |a, b| a == b,
    )
}
