//! One-shot actions over the interpreter.
//!
//! Each action sends exactly one command and returns a future that resolves
//! once the machine reaches a terminal configuration for that command, with
//! a plain snapshot of the relevant context fields taken at that moment.
//!
//! Settlement is push-driven, not polled: a watcher armed with the action's
//! terminal predicates fires on the first matching emission and is
//! unregistered immediately after. Expected authentication failures resolve
//! (`Ok`) with the error field populated; the future rejects only when the
//! interpreter cannot accept the command. There is no timeout and no
//! cancellation.

// Lock poisoning from panics is unrecoverable; expect() is the
// appropriate handling pattern for the one-shot slot.
#![allow(clippy::expect_used)]

use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::errors::CommandError;
use crate::interpreter::AuthInterpreter;
use crate::machine::{
    ActionCategory, AuthCommand, AuthError, AuthSnapshot, PasswordlessOptions, SignUpOptions,
    SignedOutState, User,
};

/// Result of an action whose outcome is fully described by success/failure.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionResult {
    /// The machine reached the success configuration for this action.
    pub is_success: bool,
    /// The machine reached the failure configuration.
    pub is_error: bool,
    /// The error recorded for this action's category, if any.
    pub error: Option<AuthError>,
}

/// Result of an email + password sign-in.
#[derive(Clone, Debug, PartialEq)]
pub struct SignInResult {
    /// Signed in.
    pub is_success: bool,
    /// The sign-in failed.
    pub is_error: bool,
    /// Error from the `authentication` slot, if any.
    pub error: Option<AuthError>,
    /// The flow settled pending email verification.
    pub needs_email_verification: bool,
    /// User at settlement time.
    pub user: Option<User>,
    /// Access token at settlement time.
    pub access_token: Option<String>,
}

/// Result of an email + password sign-up.
#[derive(Clone, Debug, PartialEq)]
pub struct SignUpResult {
    /// Signed in directly (no verification required).
    pub is_success: bool,
    /// The sign-up failed.
    pub is_error: bool,
    /// Error from the `registration` slot, if any.
    pub error: Option<AuthError>,
    /// A verification email was sent; the account is not yet usable.
    pub needs_email_verification: bool,
    /// User at settlement time.
    pub user: Option<User>,
    /// Access token at settlement time.
    pub access_token: Option<String>,
}

/// Result of a sign-out.
#[derive(Clone, Debug, PartialEq)]
pub struct SignOutResult {
    /// The session was signed out.
    pub is_success: bool,
    /// The sign-out failed.
    pub is_error: bool,
    /// Error from the `signout` slot, if any.
    pub error: Option<AuthError>,
}

/// Send a command and resolve on the first subsequent emission matching the
/// terminal predicate.
///
/// The watcher is armed before the command is sent so a synchronously
/// settling backend cannot race past it, and unregistered as soon as the
/// future resolves.
async fn settle<T>(
    interpreter: &AuthInterpreter,
    command: AuthCommand,
    terminal: impl Fn(&AuthSnapshot) -> bool + Send + Sync + 'static,
    build: impl FnOnce(AuthSnapshot) -> T,
) -> Result<T, CommandError> {
    let (tx, rx) = oneshot::channel::<AuthSnapshot>();
    let slot = Mutex::new(Some(tx));

    let guard = interpreter.state().watch(move |snapshot| {
        if terminal(snapshot) {
            if let Some(tx) = slot.lock().expect("settle slot poisoned").take() {
                let _ = tx.send(snapshot.clone());
            }
        }
    });

    interpreter.send(command)?;

    let snapshot = rx.await.map_err(|_| CommandError::InterpreterStopped)?;
    drop(guard);
    Ok(build(snapshot))
}

/// Sign in with email and password.
pub async fn sign_in_email_password(
    interpreter: &AuthInterpreter,
    email: &str,
    password: &str,
) -> Result<SignInResult, CommandError> {
    tracing::debug!(email, "dispatching email+password sign-in");
    let command = AuthCommand::SignInEmailPassword {
        email: email.to_owned(),
        password: password.to_owned(),
    };
    settle(
        interpreter,
        command,
        |s| {
            s.is_signed_in()
                || s.is_signed_out(SignedOutState::Failed)
                || s.settled_awaiting_verification()
        },
        |s| {
            let is_success = s.is_signed_in();
            let is_error = s.is_signed_out(SignedOutState::Failed);
            let needs_email_verification = s.settled_awaiting_verification();
            SignInResult {
                is_success,
                is_error,
                error: s.context.errors.get(ActionCategory::Authentication).cloned(),
                needs_email_verification,
                user: s.context.user,
                access_token: s.context.access_token,
            }
        },
    )
    .await
}

/// Send a magic link to the given email.
///
/// Success is the machine settling at `signedOut: noErrors` with the email
/// branch awaiting verification; actually signing in happens later, out of
/// band, when the link is followed.
pub async fn sign_in_email_passwordless(
    interpreter: &AuthInterpreter,
    email: &str,
    options: PasswordlessOptions,
) -> Result<ActionResult, CommandError> {
    tracing::debug!(email, "dispatching passwordless email sign-in");
    let command = AuthCommand::SignInEmailPasswordless {
        email: email.to_owned(),
        options,
    };
    settle(
        interpreter,
        command,
        |s| s.settled_awaiting_verification() || s.is_signed_out(SignedOutState::Failed),
        |s| ActionResult {
            is_success: s.settled_awaiting_verification(),
            is_error: s.is_signed_out(SignedOutState::Failed),
            error: s.context.errors.get(ActionCategory::Authentication).cloned(),
        },
    )
    .await
}

/// Sign up with email and password.
pub async fn sign_up_email_password(
    interpreter: &AuthInterpreter,
    email: &str,
    password: &str,
    options: SignUpOptions,
) -> Result<SignUpResult, CommandError> {
    tracing::debug!(email, "dispatching email+password sign-up");
    let command = AuthCommand::SignUpEmailPassword {
        email: email.to_owned(),
        password: password.to_owned(),
        options,
    };
    settle(
        interpreter,
        command,
        |s| {
            s.is_signed_in()
                || s.settled_awaiting_verification()
                || s.is_signed_out(SignedOutState::Failed)
        },
        |s| {
            let is_success = s.is_signed_in();
            let is_error = s.is_signed_out(SignedOutState::Failed);
            let needs_email_verification = s.settled_awaiting_verification();
            SignUpResult {
                is_success,
                is_error,
                error: s.context.errors.get(ActionCategory::Registration).cloned(),
                needs_email_verification,
                user: s.context.user,
                access_token: s.context.access_token,
            }
        },
    )
    .await
}

/// Sign out the current session, or every session when `all_devices`.
pub async fn sign_out(
    interpreter: &AuthInterpreter,
    all_devices: bool,
) -> Result<SignOutResult, CommandError> {
    tracing::debug!(all_devices, "dispatching sign-out");
    let command = AuthCommand::SignOut { all_devices };
    settle(
        interpreter,
        command,
        |s| {
            s.is_signed_out(SignedOutState::Success) || s.is_signed_out(SignedOutState::Failed)
        },
        |s| SignOutResult {
            is_success: s.is_signed_out(SignedOutState::Success),
            is_error: s.is_signed_out(SignedOutState::Failed),
            error: s.context.errors.get(ActionCategory::SignOut).cloned(),
        },
    )
    .await
}
