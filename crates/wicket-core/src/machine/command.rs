//! Commands accepted by the authentication interpreter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A command sent to the interpreter. Each dispatcher invocation produces
/// exactly one command; queuing, acceptance, and transition rules belong to
/// the machine behind the interpreter, never to this layer.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum AuthCommand {
    /// Email + password sign-in.
    SignInEmailPassword {
        /// Account email.
        email: String,
        /// Account password, forwarded without validation.
        password: String,
    },
    /// Magic-link (passwordless) email sign-in.
    SignInEmailPasswordless {
        /// Destination email for the magic link.
        email: String,
        /// Flow options.
        options: PasswordlessOptions,
    },
    /// Email + password sign-up.
    SignUpEmailPassword {
        /// New account email.
        email: String,
        /// New account password, forwarded without validation.
        password: String,
        /// Flow options.
        options: SignUpOptions,
    },
    /// Sign the current session out.
    SignOut {
        /// When true, invalidate every session of the user, not just this
        /// device's.
        all_devices: bool,
    },
}

// Manual Debug: passwords must never reach logs.
impl fmt::Debug for AuthCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignInEmailPassword { email, .. } => f
                .debug_struct("SignInEmailPassword")
                .field("email", email)
                .field("password", &"<redacted>")
                .finish(),
            Self::SignInEmailPasswordless { email, options } => f
                .debug_struct("SignInEmailPasswordless")
                .field("email", email)
                .field("options", options)
                .finish(),
            Self::SignUpEmailPassword { email, options, .. } => f
                .debug_struct("SignUpEmailPassword")
                .field("email", email)
                .field("password", &"<redacted>")
                .field("options", options)
                .finish(),
            Self::SignOut { all_devices } => f
                .debug_struct("SignOut")
                .field("all_devices", all_devices)
                .finish(),
        }
    }
}

/// Options for the passwordless email flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordlessOptions {
    /// URL the magic link redirects to after verification.
    pub redirect_to: Option<String>,
}

/// Options for the sign-up flow.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignUpOptions {
    /// URL the verification email redirects to.
    pub redirect_to: Option<String>,
    /// Initial display name for the new user.
    pub display_name: Option<String>,
    /// Initial locale for the new user.
    pub locale: Option<String>,
    /// Opaque application-defined metadata stored on the user.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}
