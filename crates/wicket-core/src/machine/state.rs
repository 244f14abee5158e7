//! Machine configuration space and snapshot predicates.
//!
//! The authentication machine's current configuration is modeled as explicit
//! tagged unions rather than path strings, so every predicate below is an
//! exhaustive `match` and a new machine variant is a compile error instead
//! of a silently stale predicate.

use serde::{Deserialize, Serialize};

use super::context::SessionContext;

/// Top-level branch of the authentication region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationState {
    /// Machine created, no command processed yet.
    Idle,
    /// A command is in flight; the variant names which flow is running.
    Authenticating(AuthMethod),
    /// Terminal signed-out configuration with its reason.
    SignedOut(SignedOutState),
    /// Terminal authenticated configuration.
    SignedIn,
}

/// Which authentication flow is currently in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    /// Email + password sign-in.
    Password,
    /// Magic-link (passwordless) email sign-in.
    PasswordlessEmail,
    /// Email + password sign-up.
    Registration,
}

/// Leaf of the signed-out branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignedOutState {
    /// Signed out without a recorded failure (also the resting state after
    /// a flow that ends pending email verification).
    NoErrors,
    /// The last command reached its failure branch.
    Failed,
    /// A sign-out command completed.
    Success,
}

/// Parallel email-verification branch, settable independently of the
/// authentication branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailState {
    /// No verification flow pending.
    #[default]
    Idle,
    /// A verification email has been sent and not yet acted on.
    AwaitingVerification,
}

/// An immutable point-in-time view of the machine: the hierarchical
/// configuration plus the extended-state context bag.
///
/// Snapshots are emitted by the interpreter and never mutated in place;
/// projections read them without coordination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    /// Authentication branch configuration.
    pub authentication: AuthenticationState,
    /// Parallel email-verification branch.
    pub email: EmailState,
    /// Extended state: user, token, categorized errors.
    pub context: SessionContext,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            authentication: AuthenticationState::Idle,
            email: EmailState::default(),
            context: SessionContext::default(),
        }
    }
}

impl AuthSnapshot {
    /// Exact match: the machine is in the terminal authenticated state.
    pub fn is_signed_in(&self) -> bool {
        match self.authentication {
            AuthenticationState::SignedIn => true,
            AuthenticationState::Idle
            | AuthenticationState::Authenticating(_)
            | AuthenticationState::SignedOut(_) => false,
        }
    }

    /// Exact match: the given flow is in flight.
    pub fn is_authenticating(&self, method: AuthMethod) -> bool {
        match self.authentication {
            AuthenticationState::Authenticating(current) => current == method,
            AuthenticationState::Idle
            | AuthenticationState::SignedOut(_)
            | AuthenticationState::SignedIn => false,
        }
    }

    /// Any flow is in flight, regardless of variant.
    pub fn is_authenticating_any(&self) -> bool {
        match self.authentication {
            AuthenticationState::Authenticating(_) => true,
            AuthenticationState::Idle
            | AuthenticationState::SignedOut(_)
            | AuthenticationState::SignedIn => false,
        }
    }

    /// Exact match: signed out with the given leaf state.
    pub fn is_signed_out(&self, leaf: SignedOutState) -> bool {
        match self.authentication {
            AuthenticationState::SignedOut(current) => current == leaf,
            AuthenticationState::Idle
            | AuthenticationState::Authenticating(_)
            | AuthenticationState::SignedIn => false,
        }
    }

    /// The email branch is awaiting verification.
    pub fn awaiting_email_verification(&self) -> bool {
        match self.email {
            EmailState::AwaitingVerification => true,
            EmailState::Idle => false,
        }
    }

    /// Composite: a flow settled without errors and left a verification
    /// email pending (`signedOut: noErrors` + `email: awaitingVerification`).
    pub fn settled_awaiting_verification(&self) -> bool {
        self.is_signed_out(SignedOutState::NoErrors) && self.awaiting_email_verification()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(authentication: AuthenticationState, email: EmailState) -> AuthSnapshot {
        AuthSnapshot {
            authentication,
            email,
            context: SessionContext::default(),
        }
    }

    #[test]
    fn authenticating_predicate_is_variant_exact() {
        let s = snapshot(
            AuthenticationState::Authenticating(AuthMethod::PasswordlessEmail),
            EmailState::Idle,
        );
        assert!(s.is_authenticating(AuthMethod::PasswordlessEmail));
        assert!(!s.is_authenticating(AuthMethod::Password));
        assert!(!s.is_authenticating(AuthMethod::Registration));
        assert!(s.is_authenticating_any());
    }

    #[test]
    fn signed_out_predicate_is_leaf_exact() {
        let s = snapshot(
            AuthenticationState::SignedOut(SignedOutState::Failed),
            EmailState::Idle,
        );
        assert!(s.is_signed_out(SignedOutState::Failed));
        assert!(!s.is_signed_out(SignedOutState::NoErrors));
        assert!(!s.is_signed_in());
    }

    #[test]
    fn settled_awaiting_verification_requires_both_branches() {
        let pending = snapshot(
            AuthenticationState::SignedOut(SignedOutState::NoErrors),
            EmailState::AwaitingVerification,
        );
        assert!(pending.settled_awaiting_verification());

        let no_email = snapshot(
            AuthenticationState::SignedOut(SignedOutState::NoErrors),
            EmailState::Idle,
        );
        assert!(!no_email.settled_awaiting_verification());

        let failed = snapshot(
            AuthenticationState::SignedOut(SignedOutState::Failed),
            EmailState::AwaitingVerification,
        );
        assert!(!failed.settled_awaiting_verification());
    }

    #[test]
    fn default_snapshot_is_idle() {
        let s = AuthSnapshot::default();
        assert!(!s.is_signed_in());
        assert!(!s.is_authenticating_any());
        assert!(!s.awaiting_email_verification());
    }
}
