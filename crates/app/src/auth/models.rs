//! Auth data models.

use std::fmt;

use jiff::Timestamp;
use zeroize::Zeroizing;

use crate::{
    auth::SessionTokenVersion,
    domain::users::records::{UserRecord, UserUuid},
    uuids::TypedUuid,
};

/// Default session lifetime: seven days.
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Session UUID
pub type SessionUuid = TypedUuid<SessionRecord>;

/// Session metadata persisted in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// Session data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveSession {
    pub uuid: SessionUuid,

    /// User that owns this session.
    pub user_uuid: UserUuid,

    /// Token format/hash version.
    pub version: SessionTokenVersion,

    /// SHA-256 verifier for the token secret material.
    pub token_hash: String,
}

/// New session persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewSession {
    pub uuid: SessionUuid,
    pub user_uuid: UserUuid,
    pub version: SessionTokenVersion,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Session issuance result carrying the one-time raw token.
#[derive(Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: SessionRecord,
    pub user: UserRecord,
}

impl fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedSession")
            .field("token", &"**redacted**")
            .field("session", &self.session)
            .field("user", &self.user)
            .finish()
    }
}

/// The caller behind a verified bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct Authenticated {
    pub user: UserRecord,
    pub session: SessionUuid,
}

/// Sign-up request.
#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub name: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Login request.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Tunables for session issuance and password hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSettings {
    pub session_ttl_seconds: u64,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_use_seven_day_sessions() {
        let settings = AuthSettings::default();

        assert_eq!(settings.session_ttl_seconds, 604_800);
        assert_eq!(settings.bcrypt_cost, 12);
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials {
            email: "ada@example.com".to_string(),
            password: Zeroizing::new("hunter22".to_string()),
        };

        let debug = format!("{credentials:?}");

        assert!(debug.contains("ada@example.com"));
        assert!(!debug.contains("hunter22"), "password leaked: {debug}");
    }
}
