//! Sign-in hooks: email + password, and passwordless email.

use std::sync::Arc;

use wicket_core::actions::{self, ActionResult, SignInResult};
use wicket_core::machine::{
    ActionCategory, AuthError, AuthMethod, PasswordlessOptions, SignedOutState, User,
};
use wicket_core::{AuthInterpreter, CommandError, Derived};

use crate::input::Input;
use crate::provider::use_auth_interpreter;
use crate::selector::use_error;

/// Reactive fields and action for email + password sign-in.
pub struct SignInEmailPassword {
    /// The password flow is in flight.
    pub is_loading: Derived<bool>,
    /// Signed in.
    pub is_success: Derived<bool>,
    /// The last sign-in failed.
    pub is_error: Derived<bool>,
    /// Error from the shared `authentication` slot.
    pub error: Derived<Option<AuthError>>,
    /// The flow settled pending email verification.
    pub needs_email_verification: Derived<bool>,
    /// Current user.
    pub user: Derived<Option<User>>,
    /// Current access token.
    pub access_token: Derived<Option<String>>,
    interpreter: Arc<AuthInterpreter>,
}

/// Email and password sign-in.
///
/// # Panics
///
/// Panics outside a live [`AuthProvider`](crate::provider::AuthProvider).
pub fn use_sign_in_email_password() -> SignInEmailPassword {
    let interpreter = use_auth_interpreter();
    let state = interpreter.state();

    SignInEmailPassword {
        is_loading: state.derive(|s| s.is_authenticating(AuthMethod::Password)),
        is_success: state.derive(|s| s.is_signed_in()),
        is_error: state.derive(|s| s.is_signed_out(SignedOutState::Failed)),
        error: use_error(ActionCategory::Authentication),
        needs_email_verification: state.derive(|s| s.settled_awaiting_verification()),
        user: state.derive(|s| s.context.user.clone()),
        access_token: state.derive(|s| s.context.access_token.clone()),
        interpreter,
    }
}

impl SignInEmailPassword {
    /// Sign in with the given credentials.
    ///
    /// Inputs may be plain values or reactive references; their current
    /// values are read once, at call time. Resolves on the machine's
    /// terminal configuration for this command; expected failures resolve
    /// with `error` populated.
    pub async fn sign_in(
        &self,
        email: impl Into<Input<String>>,
        password: impl Into<Input<String>>,
    ) -> Result<SignInResult, CommandError> {
        actions::sign_in_email_password(
            &self.interpreter,
            &email.into().get(),
            &password.into().get(),
        )
        .await
    }
}

/// Reactive fields and action for passwordless (magic link) sign-in.
pub struct SignInEmailPasswordless {
    /// The passwordless flow is in flight.
    pub is_loading: Derived<bool>,
    /// A magic link was sent and is awaiting verification.
    pub is_success: Derived<bool>,
    /// The last sign-in failed.
    pub is_error: Derived<bool>,
    /// Error from the shared `authentication` slot.
    pub error: Derived<Option<AuthError>>,
    options: Input<PasswordlessOptions>,
    interpreter: Arc<AuthInterpreter>,
}

/// Passwordless email authentication.
///
/// `options` may be a plain value or a reactive reference; it is read at
/// each `sign_in` call, not at hook creation.
///
/// # Panics
///
/// Panics outside a live [`AuthProvider`](crate::provider::AuthProvider).
pub fn use_sign_in_email_passwordless(
    options: impl Into<Input<PasswordlessOptions>>,
) -> SignInEmailPasswordless {
    let interpreter = use_auth_interpreter();
    let state = interpreter.state();

    SignInEmailPasswordless {
        is_loading: state.derive(|s| s.is_authenticating(AuthMethod::PasswordlessEmail)),
        is_success: state.derive(|s| s.settled_awaiting_verification()),
        is_error: state.derive(|s| s.is_signed_out(SignedOutState::Failed)),
        error: use_error(ActionCategory::Authentication),
        options: options.into(),
        interpreter,
    }
}

impl SignInEmailPasswordless {
    /// Send a magic link to the given email.
    pub async fn sign_in(
        &self,
        email: impl Into<Input<String>>,
    ) -> Result<ActionResult, CommandError> {
        actions::sign_in_email_passwordless(
            &self.interpreter,
            &email.into().get(),
            self.options.get(),
        )
        .await
    }
}
