//! A scriptable authentication backend for driving interpreters in tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wicket_core::interpreter::AuthBackend;
use wicket_core::machine::{
    ActionCategory, AuthCommand, AuthError, AuthMethod, AuthSnapshot, AuthenticationState,
    EmailState, SignUpOptions, SignedOutState,
};
use wicket_core::reactive::Dynamic;

use crate::factories::{test_access_token, test_user};

/// Which branch each flow should settle on.
#[derive(Clone, Copy, Debug, Default)]
struct Script {
    fail_sign_in: bool,
    fail_passwordless: bool,
    fail_sign_up: bool,
    fail_sign_out: bool,
    sign_in_requires_verification: bool,
    sign_up_requires_verification: bool,
}

/// What the backend was asked to do, readable after the fact.
#[derive(Debug, Default)]
struct Recorded {
    commands: Mutex<Vec<AuthCommand>>,
    sign_out_all_devices: Mutex<Vec<bool>>,
}

/// Backend whose outcomes are scripted up front.
///
/// Every command is processed as: loading emission, one yield to the
/// runtime (so watchers observe the in-flight configuration), terminal
/// emission. Failure branches populate the command's error slot the way
/// the real core does; success branches clear it.
///
/// Clones share the recording, so a test can keep one handle and hand the
/// other to [`AuthInterpreter::spawn`](wicket_core::AuthInterpreter::spawn).
#[derive(Clone, Debug, Default)]
pub struct ScriptedBackend {
    script: Script,
    recorded: Arc<Recorded>,
}

impl ScriptedBackend {
    /// Backend where every flow succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Password sign-in settles failed with an invalid-credentials error.
    pub fn fail_sign_in(mut self) -> Self {
        self.script.fail_sign_in = true;
        self
    }

    /// Passwordless sign-in settles failed with a network error.
    pub fn fail_passwordless(mut self) -> Self {
        self.script.fail_passwordless = true;
        self
    }

    /// Sign-up settles failed with an email-already-in-use error.
    pub fn fail_sign_up(mut self) -> Self {
        self.script.fail_sign_up = true;
        self
    }

    /// Sign-out settles failed with an internal error.
    pub fn fail_sign_out(mut self) -> Self {
        self.script.fail_sign_out = true;
        self
    }

    /// Password sign-in settles pending email verification instead of
    /// signing in.
    pub fn sign_in_requires_verification(mut self) -> Self {
        self.script.sign_in_requires_verification = true;
        self
    }

    /// Sign-up settles pending email verification instead of signing in.
    pub fn sign_up_requires_verification(mut self) -> Self {
        self.script.sign_up_requires_verification = true;
        self
    }

    /// Every command processed so far, in delivery order.
    pub fn commands(&self) -> Vec<AuthCommand> {
        self.recorded.commands.lock().unwrap().clone()
    }

    /// The `all_devices` flag of every sign-out processed so far.
    pub fn sign_out_flags(&self) -> Vec<bool> {
        self.recorded.sign_out_all_devices.lock().unwrap().clone()
    }

    fn emit(state: &Dynamic<AuthSnapshot>, mutate: impl FnOnce(&mut AuthSnapshot)) {
        let mut snapshot = state.get();
        mutate(&mut snapshot);
        state.set(snapshot);
    }

    async fn run_sign_in(&self, email: &str, state: &Dynamic<AuthSnapshot>) {
        Self::emit(state, |s| {
            s.authentication = AuthenticationState::Authenticating(AuthMethod::Password);
        });
        tokio::task::yield_now().await;

        if self.script.fail_sign_in {
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedOut(SignedOutState::Failed);
                s.context
                    .errors
                    .set(ActionCategory::Authentication, AuthError::invalid_credentials());
            });
        } else if self.script.sign_in_requires_verification {
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedOut(SignedOutState::NoErrors);
                s.email = EmailState::AwaitingVerification;
                s.context.errors.clear(ActionCategory::Authentication);
            });
        } else {
            let user = test_user(email);
            let token = test_access_token(email);
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedIn;
                s.email = EmailState::Idle;
                s.context.user = Some(user);
                s.context.access_token = Some(token);
                s.context.errors.clear(ActionCategory::Authentication);
            });
        }
    }

    async fn run_passwordless(&self, state: &Dynamic<AuthSnapshot>) {
        Self::emit(state, |s| {
            s.authentication = AuthenticationState::Authenticating(AuthMethod::PasswordlessEmail);
        });
        tokio::task::yield_now().await;

        if self.script.fail_passwordless {
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedOut(SignedOutState::Failed);
                s.context.errors.set(
                    ActionCategory::Authentication,
                    AuthError::network("could not reach authentication service"),
                );
            });
        } else {
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedOut(SignedOutState::NoErrors);
                s.email = EmailState::AwaitingVerification;
                s.context.errors.clear(ActionCategory::Authentication);
            });
        }
    }

    async fn run_sign_up(
        &self,
        email: &str,
        options: SignUpOptions,
        state: &Dynamic<AuthSnapshot>,
    ) {
        Self::emit(state, |s| {
            s.authentication = AuthenticationState::Authenticating(AuthMethod::Registration);
        });
        tokio::task::yield_now().await;

        if self.script.fail_sign_up {
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedOut(SignedOutState::Failed);
                s.context
                    .errors
                    .set(ActionCategory::Registration, AuthError::email_already_in_use());
            });
        } else if self.script.sign_up_requires_verification {
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedOut(SignedOutState::NoErrors);
                s.email = EmailState::AwaitingVerification;
                s.context.errors.clear(ActionCategory::Registration);
            });
        } else {
            let mut user = test_user(email);
            if let Some(display_name) = options.display_name {
                user.display_name = display_name;
            }
            if let Some(locale) = options.locale {
                user.locale = locale;
            }
            if let Some(metadata) = options.metadata {
                user.metadata = metadata;
            }
            let token = test_access_token(email);
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedIn;
                s.email = EmailState::Idle;
                s.context.user = Some(user);
                s.context.access_token = Some(token);
                s.context.errors.clear(ActionCategory::Registration);
            });
        }
    }

    async fn run_sign_out(&self, all_devices: bool, state: &Dynamic<AuthSnapshot>) {
        self.recorded
            .sign_out_all_devices
            .lock()
            .unwrap()
            .push(all_devices);
        tokio::task::yield_now().await;

        if self.script.fail_sign_out {
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedOut(SignedOutState::Failed);
                s.context.errors.set(
                    ActionCategory::SignOut,
                    AuthError::internal("session revocation failed"),
                );
            });
        } else {
            Self::emit(state, |s| {
                s.authentication = AuthenticationState::SignedOut(SignedOutState::Success);
                s.email = EmailState::Idle;
                s.context.user = None;
                s.context.access_token = None;
                s.context.errors.clear(ActionCategory::SignOut);
            });
        }
    }
}

#[async_trait]
impl AuthBackend for ScriptedBackend {
    fn initial_snapshot(&self) -> AuthSnapshot {
        AuthSnapshot::default()
    }

    async fn process(&self, command: AuthCommand, state: &Dynamic<AuthSnapshot>) {
        self.recorded.commands.lock().unwrap().push(command.clone());
        match command {
            AuthCommand::SignInEmailPassword { email, .. } => {
                self.run_sign_in(&email, state).await;
            }
            AuthCommand::SignInEmailPasswordless { .. } => {
                self.run_passwordless(state).await;
            }
            AuthCommand::SignUpEmailPassword { email, options, .. } => {
                self.run_sign_up(&email, options, state).await;
            }
            AuthCommand::SignOut { all_devices } => {
                self.run_sign_out(all_devices, state).await;
            }
        }
    }
}
