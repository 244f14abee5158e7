//! The authentication interpreter: one running machine instance per session.
//!
//! The interpreter owns the reactive snapshot and a FIFO command queue
//! drained by a spawned driver task. Each command is handed to the
//! [`AuthBackend`] collaborator, which performs the actual transitions
//! (network calls, token handling) and emits snapshots through the shared
//! [`Dynamic`]. All mutation flows through commands; readers only project
//! snapshots.

// Lock poisoning from panics is unrecoverable; expect() is the
// appropriate handling pattern for the sender slot.
#![allow(clippy::expect_used)]

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::errors::CommandError;
use crate::machine::{AuthCommand, AuthSnapshot};
use crate::reactive::Dynamic;

/// The external authentication core, seen from this layer.
///
/// Implementations own transition logic, I/O, and token storage. They
/// receive commands one at a time, in send order, and emit every
/// intermediate and terminal snapshot through `state`.
#[async_trait]
pub trait AuthBackend: Send + Sync + 'static {
    /// The machine configuration before any command is processed.
    fn initial_snapshot(&self) -> AuthSnapshot;

    /// Process one command to a terminal configuration for that command.
    ///
    /// Expected failures are emitted as terminal snapshots (error slots
    /// populated), not returned; the backend has no error channel back to
    /// this layer by design.
    async fn process(&self, command: AuthCommand, state: &Dynamic<AuthSnapshot>);
}

/// Handle to the running authentication machine.
///
/// Exactly one interpreter exists per application session; it is installed
/// by the session provider and shared by every hook. Cloning the `Arc`
/// handle never re-creates the machine.
pub struct AuthInterpreter {
    state: Dynamic<AuthSnapshot>,
    commands: RwLock<Option<mpsc::UnboundedSender<AuthCommand>>>,
}

impl AuthInterpreter {
    /// Start an interpreter over the given backend.
    ///
    /// Spawns the driver task on the current tokio runtime; must be called
    /// within one.
    pub fn spawn<B: AuthBackend>(backend: B) -> Arc<Self> {
        let state = Dynamic::new(backend.initial_snapshot());
        let (tx, mut rx) = mpsc::unbounded_channel::<AuthCommand>();

        let driver_state = state.clone();
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                tracing::debug!(?command, "processing auth command");
                backend.process(command, &driver_state).await;
            }
            tracing::debug!("auth interpreter driver stopped");
        });

        Arc::new(Self {
            state,
            commands: RwLock::new(Some(tx)),
        })
    }

    /// The reactive snapshot stream. Projections derive from this.
    pub fn state(&self) -> &Dynamic<AuthSnapshot> {
        &self.state
    }

    /// Current snapshot (convenience for non-reactive reads).
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.get()
    }

    /// Enqueue exactly one command for the machine.
    ///
    /// Commands are delivered FIFO; a command sent while another is in
    /// flight waits in the queue and reaches the backend only after the
    /// previous one settles. Fails only when the interpreter has been
    /// closed.
    pub fn send(&self, command: AuthCommand) -> Result<(), CommandError> {
        let guard = self.commands.read().expect("command sender lock poisoned");
        match guard.as_ref() {
            Some(tx) => tx
                .send(command)
                .map_err(|_| CommandError::InterpreterStopped),
            None => Err(CommandError::InterpreterStopped),
        }
    }

    /// Stop accepting commands and let the driver task drain and exit.
    ///
    /// Called by the session provider at teardown. Snapshots already
    /// emitted remain readable; in-flight commands still run to their
    /// terminal state.
    pub fn close(&self) {
        let mut guard = self.commands.write().expect("command sender lock poisoned");
        if guard.take().is_some() {
            tracing::debug!("auth interpreter closed");
        }
    }

    /// Whether the interpreter still accepts commands.
    pub fn is_open(&self) -> bool {
        self.commands
            .read()
            .expect("command sender lock poisoned")
            .is_some()
    }
}

impl std::fmt::Debug for AuthInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterpreter")
            .field("open", &self.is_open())
            .field("snapshot", &self.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{AuthMethod, AuthenticationState, SignedOutState};
    use std::sync::Mutex;

    /// Backend that records delivery order and settles immediately.
    struct RecordingBackend {
        seen: Arc<Mutex<Vec<AuthCommand>>>,
    }

    #[async_trait]
    impl AuthBackend for RecordingBackend {
        fn initial_snapshot(&self) -> AuthSnapshot {
            AuthSnapshot::default()
        }

        async fn process(&self, command: AuthCommand, state: &Dynamic<AuthSnapshot>) {
            self.seen.lock().unwrap().push(command);
            let mut snapshot = state.get();
            snapshot.authentication = AuthenticationState::SignedOut(SignedOutState::NoErrors);
            state.set(snapshot);
        }
    }

    fn sign_out(all_devices: bool) -> AuthCommand {
        AuthCommand::SignOut { all_devices }
    }

    #[tokio::test]
    async fn commands_reach_backend_in_send_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let interpreter = AuthInterpreter::spawn(RecordingBackend {
            seen: Arc::clone(&seen),
        });

        interpreter.send(sign_out(false)).unwrap();
        interpreter.send(sign_out(true)).unwrap();

        // Let the driver drain the queue.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![sign_out(false), sign_out(true)]);
    }

    #[tokio::test]
    async fn send_after_close_is_rejected() {
        let interpreter = AuthInterpreter::spawn(RecordingBackend {
            seen: Arc::new(Mutex::new(Vec::new())),
        });

        assert!(interpreter.is_open());
        interpreter.close();
        assert!(!interpreter.is_open());

        assert_eq!(
            interpreter.send(sign_out(false)),
            Err(CommandError::InterpreterStopped)
        );
    }

    #[tokio::test]
    async fn initial_snapshot_comes_from_backend() {
        struct SignedInBackend;

        #[async_trait]
        impl AuthBackend for SignedInBackend {
            fn initial_snapshot(&self) -> AuthSnapshot {
                AuthSnapshot {
                    authentication: AuthenticationState::SignedIn,
                    ..AuthSnapshot::default()
                }
            }

            async fn process(&self, _command: AuthCommand, _state: &Dynamic<AuthSnapshot>) {}
        }

        let interpreter = AuthInterpreter::spawn(SignedInBackend);
        assert!(interpreter.snapshot().is_signed_in());
        assert!(!interpreter
            .snapshot()
            .is_authenticating(AuthMethod::Password));
    }
}
