//! Email + password sign-up hook.

use std::sync::Arc;

use wicket_core::actions::{self, SignUpResult};
use wicket_core::machine::{
    ActionCategory, AuthError, AuthMethod, SignUpOptions, SignedOutState, User,
};
use wicket_core::{AuthInterpreter, CommandError, Derived};

use crate::input::Input;
use crate::provider::use_auth_interpreter;
use crate::selector::use_error;

/// Reactive fields and action for email + password sign-up.
pub struct SignUpEmailPassword {
    /// The registration flow is in flight and has not yet succeeded.
    pub is_loading: Derived<bool>,
    /// Signed in directly (no verification required).
    pub is_success: Derived<bool>,
    /// The last sign-up failed.
    pub is_error: Derived<bool>,
    /// Error from the shared `registration` slot.
    pub error: Derived<Option<AuthError>>,
    /// A verification email was sent; the account is not yet usable.
    pub needs_email_verification: Derived<bool>,
    /// Current user.
    pub user: Derived<Option<User>>,
    /// Current access token.
    pub access_token: Derived<Option<String>>,
    options: Input<SignUpOptions>,
    interpreter: Arc<AuthInterpreter>,
}

/// Email and password sign-up.
///
/// # Panics
///
/// Panics outside a live [`AuthProvider`](crate::provider::AuthProvider).
pub fn use_sign_up_email_password(
    options: impl Into<Input<SignUpOptions>>,
) -> SignUpEmailPassword {
    let interpreter = use_auth_interpreter();
    let state = interpreter.state();

    SignUpEmailPassword {
        // Loading composed with success: once signed in the hook must not
        // report loading even if a trailing registration emission arrives.
        is_loading: state
            .derive(|s| s.is_authenticating(AuthMethod::Registration) && !s.is_signed_in()),
        is_success: state.derive(|s| s.is_signed_in()),
        is_error: state.derive(|s| s.is_signed_out(SignedOutState::Failed)),
        error: use_error(ActionCategory::Registration),
        needs_email_verification: state.derive(|s| s.settled_awaiting_verification()),
        user: state.derive(|s| s.context.user.clone()),
        access_token: state.derive(|s| s.context.access_token.clone()),
        options: options.into(),
        interpreter,
    }
}

impl SignUpEmailPassword {
    /// Register a new account.
    ///
    /// Resolves when the machine settles: signed in, pending email
    /// verification (`needs_email_verification` set on the result), or
    /// failed with the `registration` error populated.
    pub async fn sign_up(
        &self,
        email: impl Into<Input<String>>,
        password: impl Into<Input<String>>,
    ) -> Result<SignUpResult, CommandError> {
        actions::sign_up_email_password(
            &self.interpreter,
            &email.into().get(),
            &password.into().get(),
            self.options.get(),
        )
        .await
    }
}
