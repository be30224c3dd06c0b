//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::{PasswordError, SessionTokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Bearer token is malformed, unknown, expired or revoked.
    #[error("invalid session token")]
    InvalidToken,

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email address is already registered")]
    EmailTaken,

    #[error("invalid {0}")]
    InvalidData(&'static str),

    #[error("session not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[source] SessionTokenError),

    #[error("password processing error")]
    Password(#[from] PasswordError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<SessionTokenError> for AuthServiceError {
    fn from(error: SessionTokenError) -> Self {
        Self::Token(error)
    }
}
