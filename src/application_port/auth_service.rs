use crate::domain_model::{CsrfToken, SessionToken, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Title shown with every login failure.
pub const LOGIN_ERROR_TITLE: &str = "Error";
/// Description shown for any credential failure; never names the wrong field.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect username or password.";
/// Description shown when the failure is ours rather than the user's.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Faults of the session machinery. Credential mismatches are not errors,
/// they come back as [`AuthResult::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("session invalid or expired")]
    InvalidSession,
    #[error("csrf token does not match session")]
    CsrfMismatch,
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// Store and internal faults; these must never be presented as a rejection.
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::Store(_) | AuthError::InternalError(_))
    }
}

pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum RejectReason {
    Invalid,
}

impl RejectReason {
    pub fn title(&self) -> &'static str {
        LOGIN_ERROR_TITLE
    }

    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::Invalid => INVALID_CREDENTIALS_MESSAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_token: SessionToken,
    pub csrf_token: CsrfToken,
    pub user_id: UserId,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum AuthResult {
    Authenticated(IssuedSession),
    Rejected { reason: RejectReason },
}

impl AuthResult {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthResult::Authenticated(_))
    }
}

/// A resolved session, handed explicitly to whatever acts on the user's behalf.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SessionInfo {
    pub user_id: UserId,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Check a username/password pair and open a session on success.
    async fn validate(&self, credentials: Credentials) -> Result<AuthResult, AuthError>;
    /// Look up a live session.
    async fn resolve_session(&self, session: &SessionToken) -> Result<SessionInfo, AuthError>;
    /// Resolve a session and check that `csrf` is the token bound to it.
    async fn authorize(
        &self,
        session: &SessionToken,
        csrf: &CsrfToken,
    ) -> Result<SessionInfo, AuthError>;
    async fn logout(&self, session: &SessionToken, csrf: &CsrfToken) -> Result<(), AuthError>;
}
