//! User Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// User Record
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub uuid: UserUuid,

    /// Normalised (trimmed, lowercase) email address.
    pub email: String,

    /// Display name.
    pub name: String,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// User row including the stored password hash. Never leaves the crate.
#[derive(Clone)]
pub(crate) struct UserCredentialsRecord {
    pub user: UserRecord,
    pub password_hash: String,
}

impl std::fmt::Debug for UserCredentialsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentialsRecord")
            .field("user", &self.user)
            .field("password_hash", &"**redacted**")
            .finish()
    }
}
