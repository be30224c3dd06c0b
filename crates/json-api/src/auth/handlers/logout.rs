//! Logout Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{auth::errors::into_status_error, extensions::*, state::State};

/// Logout Handler
///
/// Revokes the session the request was made with.
#[endpoint(
    tags("auth"),
    summary = "Logout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Session revoked"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing credential"),
        (status_code = StatusCode::FORBIDDEN, description = "Invalid credential"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.authenticated_or_401()?.session;

    // A concurrent logout may already have revoked it; either way it is gone.
    state
        .app
        .auth
        .revoke_session(session)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
