use thiserror::Error;

/// Failure of the boot-time "who am I" check.
///
/// Transport failures, rejected sessions and malformed payloads are one kind:
/// the session gate treats all of them as "no session".
#[derive(Debug, Error)]
pub enum SessionResolutionError {
    #[error("identity check failed: {0}")]
    Failed(String),
}

/// Errors from the sign-in, sign-up and sign-out mutations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account already exists: {0}")]
    Conflict(String),

    #[error("auth service rejected the request with status {0}")]
    Rejected(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Errors from the chat history service.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    NotFound,

    #[error("chat service rejected the request with status {0}")]
    Rejected(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// A session state change the state machine does not allow.
#[derive(Debug, Error)]
pub enum SessionTransitionError {
    #[error("a settled session cannot return to unresolved")]
    BackToUnresolved,
}
