//! Auth Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bella_app::{auth::IssuedSession, domain::users::records::UserRecord};

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod me;
pub(crate) mod register;

/// User Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub uuid: Uuid,
    pub email: String,
    pub name: String,

    /// The date and time the user registered
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            uuid: user.uuid.into(),
            email: user.email,
            name: user.name,
            created_at: user.created_at.to_string(),
        }
    }
}

/// Session Response
///
/// `token` is only ever returned here; send it back as
/// `Authorization: Bearer <token>`.
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    pub token: String,

    /// The date and time the token stops working
    pub expires_at: String,

    pub user: UserResponse,
}

impl std::fmt::Debug for SessionResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionResponse")
            .field("token", &"**redacted**")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

impl From<IssuedSession> for SessionResponse {
    fn from(issued: IssuedSession) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.session.expires_at.to_string(),
            user: issued.user.into(),
        }
    }
}
