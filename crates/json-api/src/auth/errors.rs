//! Auth Errors

use salvo::http::StatusError;
use tracing::error;

use bella_app::auth::AuthServiceError;

pub(crate) fn into_status_error(error: AuthServiceError) -> StatusError {
    match error {
        AuthServiceError::InvalidCredentials => {
            StatusError::unauthorized().brief("Invalid email or password")
        }
        AuthServiceError::InvalidToken => {
            StatusError::forbidden().brief("Invalid or expired session token")
        }
        AuthServiceError::EmailTaken => {
            StatusError::conflict().brief("Email address is already registered")
        }
        AuthServiceError::InvalidData(field) => {
            StatusError::bad_request().brief(format!("Invalid {field}"))
        }
        AuthServiceError::NotFound => StatusError::not_found().brief("Session not found"),
        AuthServiceError::Sql(source) => {
            error!("auth query failed: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to process session token: {source}");

            StatusError::internal_server_error()
        }
        AuthServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error()
        }
    }
}
