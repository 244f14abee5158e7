//! Library error types.
//!
//! Only interpreter availability is an `Err` here. Expected authentication
//! failures (wrong password, unverified email, ...) are terminal machine
//! states carried as [`AuthError`](crate::machine::AuthError) values in the
//! snapshot context, and action futures resolve with them rather than
//! rejecting.

/// Failure to hand a command to the interpreter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The interpreter's driver task has stopped (session torn down); the
    /// command was not delivered.
    #[error("auth interpreter is stopped; command not delivered")]
    InterpreterStopped,
}
