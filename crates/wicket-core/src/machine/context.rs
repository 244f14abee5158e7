//! Extended-state context: user, access token, and categorized errors.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The machine's context bag, carried on every [`AuthSnapshot`].
///
/// [`AuthSnapshot`]: super::state::AuthSnapshot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// The authenticated user, when signed in.
    pub user: Option<User>,
    /// Current access token (JWT), when signed in.
    pub access_token: Option<String>,
    /// Last error per action category. Errors are data, not exceptions:
    /// expected authentication failures land here and are surfaced through
    /// selectors and resolved action results.
    pub errors: ErrorSlots,
}

/// User information exposed by the authentication client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable user id.
    pub id: Uuid,
    /// Primary email address.
    pub email: Option<String>,
    /// Display name.
    pub display_name: String,
    /// Avatar URL, if set.
    pub avatar_url: Option<String>,
    /// BCP 47 locale tag, e.g. `en` or `fr`.
    pub locale: String,
    /// Whether the primary email has been verified.
    pub email_verified: bool,
    /// Opaque application-defined metadata, passed through verbatim.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Action categories used to key the shared error lookup.
///
/// Each composite hook reads the slot for its own category; the lookup is
/// shared rather than recomputed per hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCategory {
    /// Sign-in flows (password and passwordless).
    Authentication,
    /// Sign-up flows.
    Registration,
    /// Sign-out flows.
    SignOut,
}

impl ActionCategory {
    /// Short label for logs and display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Registration => "registration",
            Self::SignOut => "signout",
        }
    }
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One error slot per action category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorSlots {
    authentication: Option<AuthError>,
    registration: Option<AuthError>,
    sign_out: Option<AuthError>,
}

impl ErrorSlots {
    /// Read the error recorded for a category, if any.
    pub fn get(&self, category: ActionCategory) -> Option<&AuthError> {
        match category {
            ActionCategory::Authentication => self.authentication.as_ref(),
            ActionCategory::Registration => self.registration.as_ref(),
            ActionCategory::SignOut => self.sign_out.as_ref(),
        }
    }

    /// Record an error for a category, replacing any previous one.
    pub fn set(&mut self, category: ActionCategory, error: AuthError) {
        *self.slot(category) = Some(error);
    }

    /// Clear the error for a category.
    pub fn clear(&mut self, category: ActionCategory) {
        *self.slot(category) = None;
    }

    fn slot(&mut self, category: ActionCategory) -> &mut Option<AuthError> {
        match category {
            ActionCategory::Authentication => &mut self.authentication,
            ActionCategory::Registration => &mut self.registration,
            ActionCategory::SignOut => &mut self.sign_out,
        }
    }
}

/// Reason codes for expected authentication failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthErrorCode {
    /// Wrong email/password combination.
    InvalidCredentials,
    /// The account exists but its email is not verified.
    EmailNotVerified,
    /// Sign-up with an email that is already registered.
    EmailAlreadyInUse,
    /// The backend could not be reached.
    Network,
    /// Internal backend failure, passed through verbatim.
    Internal,
}

impl AuthErrorCode {
    /// Short stable identifier, matching the wire codes the backend uses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid-credentials",
            Self::EmailNotVerified => "unverified-user",
            Self::EmailAlreadyInUse => "email-already-in-use",
            Self::Network => "network-error",
            Self::Internal => "internal-error",
        }
    }
}

/// An expected authentication failure, carried in the context's error
/// slots. This is data surfaced to the UI, not a control-flow error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{}: {message}", code.as_str())]
pub struct AuthError {
    /// Machine-readable reason.
    pub code: AuthErrorCode,
    /// Human-readable message from the backend, verbatim.
    pub message: String,
}

impl AuthError {
    /// Wrong email/password combination.
    pub fn invalid_credentials() -> Self {
        Self {
            code: AuthErrorCode::InvalidCredentials,
            message: "Incorrect email or password".into(),
        }
    }

    /// The account's email has not been verified yet.
    pub fn email_not_verified() -> Self {
        Self {
            code: AuthErrorCode::EmailNotVerified,
            message: "Email needs verification".into(),
        }
    }

    /// Sign-up against an already-registered email.
    pub fn email_already_in_use() -> Self {
        Self {
            code: AuthErrorCode::EmailAlreadyInUse,
            message: "Email already in use".into(),
        }
    }

    /// Backend unreachable.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            code: AuthErrorCode::Network,
            message: message.into(),
        }
    }

    /// Opaque backend failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: AuthErrorCode::Internal,
            message: message.into(),
        }
    }
}
