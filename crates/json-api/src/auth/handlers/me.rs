//! Current User Handler

use salvo::prelude::*;

use crate::{auth::UserResponse, extensions::*};

/// Current User Handler
#[endpoint(
    tags("auth"),
    summary = "Current User",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let user = depot.authenticated_or_401()?.user.clone();

    Ok(Json(user.into()))
}
