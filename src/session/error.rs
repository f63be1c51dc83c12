//! Error types for the session guard and credential storage.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// No credential is held; the operator has to log in first.
    #[error("Not logged in")]
    LoginRequired,

    /// The stored token cannot be used as a header value.
    #[error("Credential token is not a valid header value")]
    InvalidToken,

    /// Reading or writing the persisted credential failed.
    #[error("Credential storage error: {0}")]
    Storage(String),
}
