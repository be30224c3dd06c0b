//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use sqlx::{
    Postgres, Transaction,
    error::{DatabaseError, ErrorKind},
};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::{
    auth::{
        AuthServiceError, Authenticated, AuthSettings, Credentials, IssuedSession, Registration,
        SessionTokenVersion, build_verifier_input, format_session_token, generate_session_secret,
        hash_verifier, parse_session_token,
        models::{NewSession, SessionRecord, SessionUuid},
        password::{MIN_PASSWORD_CHARS, PasswordError, hash_password, verify_password},
        repository::PgSessionsRepository,
        verifiers_match,
    },
    database::Db,
    domain::users::{
        data::{NewUser, normalise_email},
        records::{UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    users: PgUsersRepository,
    sessions: PgSessionsRepository,
    settings: AuthSettings,
    unknown_user_hash: Arc<OnceCell<String>>,
}

/// Stand-in password hashed for logins with an unknown email.
const UNKNOWN_USER_PASSWORD: &str = "bella-unknown-user";

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, settings: AuthSettings) -> Self {
        Self {
            sessions: PgSessionsRepository::new(db.pool().clone()),
            users: PgUsersRepository::new(),
            db,
            settings,
            unknown_user_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Hash at the configured cost, checked when the email is unknown so both
    /// failed-login paths pay for one bcrypt verify.
    async fn unknown_user_hash(&self) -> Result<&str, PasswordError> {
        let hash = self
            .unknown_user_hash
            .get_or_try_init(|| {
                hash_password(
                    Zeroizing::new(UNKNOWN_USER_PASSWORD.to_string()),
                    self.settings.bcrypt_cost,
                )
            })
            .await?;

        Ok(hash)
    }

    fn session_expiry(&self) -> Result<Timestamp, AuthServiceError> {
        let ttl = i64::try_from(self.settings.session_ttl_seconds)
            .map_err(|_err| AuthServiceError::InvalidData("session ttl"))?;

        Timestamp::now()
            .checked_add(SignedDuration::from_secs(ttl))
            .map_err(|_err| AuthServiceError::InvalidData("session ttl"))
    }

    /// Mint a token for the user and persist its verifier.
    async fn issue_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<(String, SessionRecord), AuthServiceError> {
        let session_uuid = SessionUuid::new();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, version, &secret);

        let token_hash = hash_verifier(&build_verifier_input(session_uuid, version, user, &secret));

        let session = self
            .sessions
            .create_session(
                tx,
                &NewSession {
                    uuid: session_uuid,
                    user_uuid: user,
                    version,
                    token_hash,
                    expires_at: self.session_expiry()?,
                },
            )
            .await?;

        Ok((token, session))
    }
}

/// Check sign-up fields, returning the normalised email and trimmed name.
///
/// # Errors
///
/// Returns [`AuthServiceError::InvalidData`] naming the first offending field.
pub fn validate_registration(
    registration: &Registration,
) -> Result<(String, String), AuthServiceError> {
    let email = normalise_email(&registration.email);

    if !email.contains('@') {
        return Err(AuthServiceError::InvalidData("email"));
    }

    let name = registration.name.trim();

    if name.is_empty() {
        return Err(AuthServiceError::InvalidData("name"));
    }

    if registration.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthServiceError::InvalidData("password"));
    }

    Ok((email, name.to_string()))
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(DatabaseError::kind)
        .is_some_and(|kind| matches!(kind, ErrorKind::UniqueViolation))
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(
        name = "auth.service.register",
        skip(self, registration),
        fields(user_uuid = tracing::field::Empty),
        err
    )]
    async fn register(&self, registration: Registration) -> Result<IssuedSession, AuthServiceError> {
        let (email, name) = validate_registration(&registration)?;

        let password_hash = hash_password(registration.password, self.settings.bcrypt_cost).await?;

        let mut tx = self.db.begin().await?;

        let new_user = NewUser {
            uuid: UserUuid::new(),
            email,
            name,
            password_hash,
        };

        let user = match self.users.create_user(&mut tx, new_user).await {
            Ok(user) => user,
            Err(error) if is_unique_violation(&error) => return Err(AuthServiceError::EmailTaken),
            Err(error) => return Err(error.into()),
        };

        let (token, session) = self.issue_session(&mut tx, user.uuid).await?;

        tx.commit().await?;

        tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

        info!(session_uuid = %session.uuid, "registered user");

        Ok(IssuedSession {
            token,
            session,
            user,
        })
    }

    #[tracing::instrument(
        name = "auth.service.login",
        skip(self, credentials),
        fields(user_uuid = tracing::field::Empty),
        err
    )]
    async fn login(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError> {
        let email = normalise_email(&credentials.email);

        let mut tx = self.db.begin().await?;

        let found = self.users.find_credentials_by_email(&mut tx, &email).await?;

        tx.commit().await?;

        let Some(found) = found else {
            let hash = self.unknown_user_hash().await?.to_string();

            verify_password(credentials.password, hash).await?;

            return Err(AuthServiceError::InvalidCredentials);
        };

        if !verify_password(credentials.password, found.password_hash).await? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let user: UserRecord = found.user;

        let mut tx = self.db.begin().await?;

        let (token, session) = self.issue_session(&mut tx, user.uuid).await?;

        tx.commit().await?;

        tracing::Span::current().record("user_uuid", tracing::field::display(user.uuid));

        debug!(session_uuid = %session.uuid, "issued session");

        Ok(IssuedSession {
            token,
            session,
            user,
        })
    }

    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<Authenticated, AuthServiceError> {
        let parsed_token =
            parse_session_token(bearer_token).map_err(|_err| AuthServiceError::InvalidToken)?;

        let session = self
            .sessions
            .find_active_session(parsed_token.session_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        let verifier_input = build_verifier_input(
            parsed_token.session_uuid,
            parsed_token.version,
            session.user_uuid,
            &parsed_token.secret,
        );

        if !verifiers_match(&session.token_hash, &hash_verifier(&verifier_input)) {
            return Err(AuthServiceError::InvalidToken);
        }

        let mut tx = self.db.begin().await?;

        let user = self.users.get_user(&mut tx, session.user_uuid).await?;

        tx.commit().await?;

        // Best-effort metadata update; auth success should not depend on this write.
        if let Err(error) = self.sessions.touch_session(session.uuid).await {
            warn!(session_uuid = %session.uuid, %error, "failed to record session use");
        }

        Ok(Authenticated {
            user,
            session: session.uuid,
        })
    }

    #[tracing::instrument(name = "auth.service.revoke_session", skip(self), err)]
    async fn revoke_session(&self, session: SessionUuid) -> Result<bool, AuthServiceError> {
        let revoked = self.sessions.revoke_session(session).await?;

        Ok(revoked.is_some())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user and sign them in.
    async fn register(&self, registration: Registration) -> Result<IssuedSession, AuthServiceError>;

    /// Exchange an email and password for a new session.
    async fn login(&self, credentials: Credentials) -> Result<IssuedSession, AuthServiceError>;

    /// Resolve a raw bearer token to its user and session.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<Authenticated, AuthServiceError>;

    /// Revoke a session. Returns `true` if the session was active.
    async fn revoke_session(&self, session: SessionUuid) -> Result<bool, AuthServiceError>;
}
