//! Factories for test users, tokens, and tracing setup.

use std::sync::Once;

use uuid::Uuid;
use wicket_core::machine::User;

/// A verified user whose display name is the local part of `email`.
pub fn test_user(email: &str) -> User {
    let display_name = email.split('@').next().unwrap_or(email).to_owned();
    User {
        id: Uuid::new_v4(),
        email: Some(email.to_owned()),
        display_name,
        avatar_url: None,
        locale: "en".to_owned(),
        email_verified: true,
        metadata: serde_json::Value::Null,
    }
}

/// An opaque stand-in access token tied to `email`.
pub fn test_access_token(email: &str) -> String {
    format!("test-token-{email}")
}

static TRACING: Once = Once::new();

/// Install a fmt subscriber honoring `RUST_LOG`, once per process.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
