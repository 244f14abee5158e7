//! End-to-end hook flows over a scripted backend.
//!
//! Hooks resolve their interpreter through a process-global provider slot,
//! so every test here runs serially and installs its own provider for the
//! duration of the test body.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use serial_test::serial;
use wicket_core::machine::{ActionCategory, AuthErrorCode, PasswordlessOptions, SignUpOptions};
use wicket_core::AuthInterpreter;
use wicket_hooks::{
    use_access_token, use_auth_interpreter, use_error, use_sign_in_email_password,
    use_sign_in_email_passwordless, use_sign_out, use_sign_up_email_password, use_user_locale,
    AuthProvider, Input,
};
use wicket_testkit::{init_test_tracing, ScriptedBackend};

fn session(backend: ScriptedBackend) -> AuthProvider {
    init_test_tracing();
    AuthProvider::install(AuthInterpreter::spawn(backend))
}

#[test]
#[serial]
#[should_panic(expected = "no auth session provider")]
fn accessor_panics_without_provider() {
    let _ = use_auth_interpreter();
}

#[tokio::test]
#[serial]
async fn accessor_returns_the_same_interpreter_every_call() {
    let provider = session(ScriptedBackend::new());

    let first = use_auth_interpreter();
    let second = use_auth_interpreter();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, provider.interpreter()));
}

#[tokio::test]
#[serial]
async fn dropping_the_provider_tears_the_session_down() {
    let interpreter = {
        let provider = session(ScriptedBackend::new());
        Arc::clone(provider.interpreter())
    };
    assert!(!interpreter.is_open());
}

#[tokio::test]
#[serial]
async fn password_sign_in_success_updates_hook_fields() {
    let _provider = session(ScriptedBackend::new());
    let hook = use_sign_in_email_password();

    assert!(!hook.is_loading.get());
    assert!(!hook.is_success.get());

    let result = hook.sign_in("ada@example.com", "hunter2").await.unwrap();

    assert!(result.is_success);
    assert!(!result.is_error);
    assert_eq!(
        result.user.as_ref().and_then(|u| u.email.as_deref()),
        Some("ada@example.com")
    );
    assert!(result.access_token.is_some());

    assert!(hook.is_success.get());
    assert!(!hook.is_loading.get());
    assert!(hook.error.get().is_none());
    assert_eq!(hook.access_token.get(), result.access_token);
}

#[tokio::test]
#[serial]
async fn failed_sign_in_resolves_with_error_data() {
    let _provider = session(ScriptedBackend::new().fail_sign_in());
    let hook = use_sign_in_email_password();

    let result = hook.sign_in("ada@example.com", "wrong").await.unwrap();

    assert!(!result.is_success);
    assert!(result.is_error);
    assert_eq!(
        result.error.map(|e| e.code),
        Some(AuthErrorCode::InvalidCredentials)
    );
    assert!(hook.is_error.get());
    assert!(hook.error.get().is_some());
    assert!(hook.user.get().is_none());
}

#[tokio::test]
#[serial]
async fn unverified_sign_in_settles_pending_verification() {
    let _provider = session(ScriptedBackend::new().sign_in_requires_verification());
    let hook = use_sign_in_email_password();

    let result = hook.sign_in("ada@example.com", "hunter2").await.unwrap();

    assert!(!result.is_success);
    assert!(!result.is_error);
    assert!(result.needs_email_verification);
    assert!(hook.needs_email_verification.get());
}

#[tokio::test]
#[serial]
async fn passwordless_success_is_awaiting_verification() {
    let _provider = session(ScriptedBackend::new());
    let hook = use_sign_in_email_passwordless(PasswordlessOptions::default());

    let result = hook.sign_in("ada@example.com").await.unwrap();

    assert!(result.is_success);
    assert!(!result.is_error);
    assert!(hook.is_success.get());
    assert!(!hook.is_loading.get());
}

#[tokio::test]
#[serial]
async fn passwordless_failure_populates_authentication_slot() {
    let _provider = session(ScriptedBackend::new().fail_passwordless());
    let hook = use_sign_in_email_passwordless(PasswordlessOptions::default());

    let result = hook.sign_in("ada@example.com").await.unwrap();

    assert!(result.is_error);
    assert_eq!(result.error.map(|e| e.code), Some(AuthErrorCode::Network));
    assert!(hook.is_error.get());
}

#[tokio::test]
#[serial]
async fn sign_up_loading_and_success_are_never_simultaneous() {
    let _provider = session(ScriptedBackend::new());
    let hook = use_sign_up_email_password(SignUpOptions::default());

    // Record the hook's projections for every machine emission; the pair
    // must be mutually exclusive throughout the flow, including the
    // emissions between loading and settlement.
    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    let interpreter = use_auth_interpreter();
    let _guard = interpreter.state().watch(move |s| {
        let loading = s.is_authenticating(wicket_core::machine::AuthMethod::Registration)
            && !s.is_signed_in();
        sink.lock().unwrap().push((loading, s.is_signed_in()));
    });

    let result = hook.sign_up("ada@example.com", "hunter2").await.unwrap();
    assert!(result.is_success);

    let observed = observed.lock().unwrap();
    assert!(!observed.is_empty());
    assert!(observed.iter().all(|&(loading, success)| !(loading && success)));
    assert!(!hook.is_loading.get());
    assert!(hook.is_success.get());
}

#[tokio::test]
#[serial]
async fn sign_up_applies_options_to_the_new_user() {
    let _provider = session(ScriptedBackend::new());
    let hook = use_sign_up_email_password(SignUpOptions {
        display_name: Some("Ada Lovelace".into()),
        locale: Some("fr".into()),
        ..SignUpOptions::default()
    });

    let result = hook.sign_up("ada@example.com", "hunter2").await.unwrap();

    let user = result.user.expect("signed up user");
    assert_eq!(user.display_name, "Ada Lovelace");
    assert_eq!(user.locale, "fr");
}

#[tokio::test]
#[serial]
async fn sign_up_pending_verification_is_not_success() {
    let _provider = session(ScriptedBackend::new().sign_up_requires_verification());
    let hook = use_sign_up_email_password(SignUpOptions::default());

    let result = hook.sign_up("ada@example.com", "hunter2").await.unwrap();

    assert!(!result.is_success);
    assert!(!result.is_error);
    assert!(result.needs_email_verification);
    assert!(hook.needs_email_verification.get());
    assert!(!hook.is_success.get());
}

#[tokio::test]
#[serial]
async fn sign_out_defaults_to_this_device_only() {
    let backend = ScriptedBackend::new();
    let _provider = session(backend.clone());

    let sign_in = use_sign_in_email_password();
    sign_in.sign_in("ada@example.com", "hunter2").await.unwrap();

    let hook = use_sign_out();
    let result = hook.sign_out(None).await.unwrap();
    assert!(result.is_success);
    assert!(hook.is_success.get());

    hook.sign_out(Some(Input::Value(true))).await.unwrap();

    assert_eq!(backend.sign_out_flags(), vec![false, true]);
}

#[tokio::test]
#[serial]
async fn sign_out_clears_session_fields() {
    let _provider = session(ScriptedBackend::new());

    let sign_in = use_sign_in_email_password();
    sign_in.sign_in("ada@example.com", "hunter2").await.unwrap();
    assert!(use_access_token().get().is_some());

    use_sign_out().sign_out(None).await.unwrap();

    assert!(use_access_token().get().is_none());
    assert!(sign_in.user.get().is_none());
}

#[tokio::test]
#[serial]
async fn selectors_of_the_same_field_always_agree() {
    let _provider = session(ScriptedBackend::new());
    let left = use_access_token();
    let right = use_access_token();

    assert_eq!(left.get(), right.get());

    use_sign_in_email_password()
        .sign_in("ada@example.com", "hunter2")
        .await
        .unwrap();

    assert!(left.get().is_some());
    assert_eq!(left.get(), right.get());
}

#[tokio::test]
#[serial]
async fn locale_observers_skip_snapshots_that_keep_the_locale() {
    let _provider = session(ScriptedBackend::new());
    let locale = use_user_locale();

    let published = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&published);
    let _guard = locale.watch(move |value| sink.lock().unwrap().push(value.clone()));

    let hook = use_sign_in_email_password();
    hook.sign_in("ada@example.com", "hunter2").await.unwrap();
    // A different user with the same locale; the user selector changes but
    // the locale projection must stay silent.
    hook.sign_in("grace@example.com", "hunter2").await.unwrap();

    assert_eq!(locale.get().as_deref(), Some("en"));
    assert_eq!(*published.lock().unwrap(), vec![Some("en".to_owned())]);
}

#[tokio::test]
#[serial]
async fn error_slots_are_read_per_category() {
    let _provider = session(ScriptedBackend::new().fail_sign_up());

    let hook = use_sign_up_email_password(SignUpOptions::default());
    let result = hook.sign_up("ada@example.com", "hunter2").await.unwrap();
    assert!(result.is_error);

    assert_eq!(
        use_error(ActionCategory::Registration).get().map(|e| e.code),
        Some(AuthErrorCode::EmailAlreadyInUse)
    );
    assert!(use_error(ActionCategory::Authentication).get().is_none());
    assert!(use_error(ActionCategory::SignOut).get().is_none());
}

#[tokio::test]
#[serial]
async fn reactive_inputs_are_read_at_call_time() {
    let backend = ScriptedBackend::new();
    let _provider = session(backend.clone());

    let email = wicket_core::Dynamic::new(String::from("old@example.com"));
    let hook = use_sign_in_email_password();

    email.set(String::from("ada@example.com"));
    hook.sign_in(&email, "hunter2").await.unwrap();

    let commands = backend.commands();
    assert_matches!(
        commands.first(),
        Some(wicket_core::machine::AuthCommand::SignInEmailPassword { email, .. })
            if email == "ada@example.com"
    );
}
