//! Sign-out hook.

use std::sync::Arc;

use wicket_core::actions::{self, SignOutResult};
use wicket_core::machine::{ActionCategory, AuthError, SignedOutState};
use wicket_core::{AuthInterpreter, CommandError, Derived};

use crate::input::Input;
use crate::provider::use_auth_interpreter;
use crate::selector::use_error;

/// Reactive fields and action for signing out.
pub struct SignOut {
    /// The session was signed out by an explicit sign-out.
    pub is_success: Derived<bool>,
    /// The last sign-out failed.
    pub is_error: Derived<bool>,
    /// Error from the `signout` slot.
    pub error: Derived<Option<AuthError>>,
    interpreter: Arc<AuthInterpreter>,
}

/// Sign out of the current session.
///
/// # Panics
///
/// Panics outside a live [`AuthProvider`](crate::provider::AuthProvider).
pub fn use_sign_out() -> SignOut {
    let interpreter = use_auth_interpreter();
    let state = interpreter.state();

    SignOut {
        is_success: state.derive(|s| s.is_signed_out(SignedOutState::Success)),
        is_error: state.derive(|s| s.is_signed_out(SignedOutState::Failed)),
        error: use_error(ActionCategory::SignOut),
        interpreter,
    }
}

impl SignOut {
    /// Sign out the current session, or every device's session when `all`
    /// reads `true` at call time. Omitting `all` signs out this session
    /// only.
    pub async fn sign_out(
        &self,
        all: Option<Input<bool>>,
    ) -> Result<SignOutResult, CommandError> {
        let all_devices = all.map(|input| input.get()).unwrap_or(false);
        actions::sign_out(&self.interpreter, all_devices).await
    }
}
