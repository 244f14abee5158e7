//! Session provider and interpreter accessor.
//!
//! One [`AuthInterpreter`] exists per application session. The session
//! owner creates it, wraps it in an [`AuthProvider`] for the session's
//! lifetime, and drops the provider at session end. Hooks resolve the
//! interpreter through [`use_auth_interpreter`]; calling a hook with no
//! live provider is a wiring mistake, not a runtime condition, and panics
//! immediately.

// The accessor's missing-provider panic is the documented contract for a
// usage error; expect() is the appropriate pattern here.
#![allow(clippy::expect_used)]

use std::sync::{Arc, RwLock};

use wicket_core::AuthInterpreter;

static SESSION: RwLock<Option<Arc<AuthInterpreter>>> = RwLock::new(None);

/// Guard that installs the session's interpreter for hook access and tears
/// it down on drop.
///
/// Dropping the provider removes the interpreter from hook reach and closes
/// its command queue; already-derived projections keep their last values.
pub struct AuthProvider {
    interpreter: Arc<AuthInterpreter>,
}

impl AuthProvider {
    /// Install `interpreter` as the session's machine instance.
    ///
    /// A second install replaces the first (e.g. tests cycling sessions);
    /// the replaced interpreter is left running and a warning is logged,
    /// since overlapping providers indicate a wiring mistake upstream.
    pub fn install(interpreter: Arc<AuthInterpreter>) -> Self {
        let mut slot = SESSION.write().expect("auth session lock poisoned");
        if slot.is_some() {
            tracing::warn!("replacing a live auth session provider");
        }
        *slot = Some(Arc::clone(&interpreter));
        tracing::debug!("auth session provider installed");
        Self { interpreter }
    }

    /// The interpreter this provider installed.
    pub fn interpreter(&self) -> &Arc<AuthInterpreter> {
        &self.interpreter
    }
}

impl Drop for AuthProvider {
    fn drop(&mut self) {
        {
            let mut slot = SESSION.write().expect("auth session lock poisoned");
            // Only clear the slot if it still points at our interpreter; a
            // newer provider may have replaced it.
            if slot
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, &self.interpreter))
            {
                *slot = None;
            }
        }
        self.interpreter.close();
        tracing::debug!("auth session provider torn down");
    }
}

/// Resolve the session's interpreter.
///
/// Returns the same instance for every call within one session; the
/// machine is never re-created by accessors.
///
/// # Panics
///
/// Panics when called outside a live [`AuthProvider`]. This is a
/// configuration error in the embedding application, not a recoverable
/// condition.
pub fn use_auth_interpreter() -> Arc<AuthInterpreter> {
    SESSION
        .read()
        .expect("auth session lock poisoned")
        .clone()
        .expect(
            "no auth session provider found. Install an AuthProvider at session start \
             before calling auth hooks",
        )
}
