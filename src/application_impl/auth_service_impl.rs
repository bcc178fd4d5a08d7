use crate::application_impl::HmacCsrfBinder;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

pub struct RealAuthService {
    auth_repo: Arc<dyn AuthRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    session_store: Arc<dyn AuthSessionStore>,
    csrf_binder: HmacCsrfBinder,
    session_ttl: Duration,
    // Verified against when the username is unknown, so both rejection paths pay for a hash.
    dummy_hash: OnceCell<String>,
}

impl RealAuthService {
    pub fn new(
        auth_repo: Arc<dyn AuthRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        session_store: Arc<dyn AuthSessionStore>,
        csrf_binder: HmacCsrfBinder,
        session_ttl: Duration,
    ) -> Self {
        Self {
            auth_repo,
            credential_hasher,
            session_store,
            csrf_binder,
            session_ttl,
            dummy_hash: OnceCell::new(),
        }
    }

    #[inline]
    fn rejected() -> AuthResult {
        AuthResult::Rejected {
            reason: RejectReason::Invalid,
        }
    }

    fn ttl_secs(&self) -> u64 {
        self.session_ttl.as_secs().max(1)
    }

    async fn burn_verification(&self, password: &str) -> Result<(), AuthError> {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| async {
                let filler = SessionToken::generate();
                self.credential_hasher.hash_password(filler.as_str()).await
            })
            .await?;
        let _ = self.credential_hasher.verify_password(password, dummy).await?;
        Ok(())
    }

    async fn issue_session(&self, rec: &CredentialRecord) -> Result<IssuedSession, AuthError> {
        let session_token = SessionToken::generate();
        let csrf_token = self.csrf_binder.bind(&session_token)?;

        let created_at = Utc::now();
        let expires_at = TimeDelta::from_std(self.session_ttl)
            .ok()
            .filter(|ttl| *ttl > TimeDelta::zero())
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                AuthError::InternalError(format!("unusable session ttl: {:?}", self.session_ttl))
            })?;
        let record = SessionRecord {
            user_id: rec.user_id,
            username: rec.username.clone(),
            created_at,
            expires_at,
        };
        self.session_store
            .save_session(&session_token, &record, self.ttl_secs())
            .await?;

        Ok(IssuedSession {
            session_token,
            csrf_token,
            user_id: rec.user_id,
            username: rec.username.clone(),
            expires_at,
        })
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn validate(&self, credentials: Credentials) -> Result<AuthResult, AuthError> {
        let Credentials { username, password } = credentials;

        let Some(rec) = self.auth_repo.get_by_username(&username).await? else {
            self.burn_verification(&password).await?;
            debug!("login rejected: unknown username");
            return Ok(Self::rejected());
        };

        let ok = self
            .credential_hasher
            .verify_password(&password, &rec.password_hash)
            .await?;
        if !ok || !rec.is_active {
            debug!(user_id = %rec.user_id, active = rec.is_active, "login rejected");
            return Ok(Self::rejected());
        }

        let issued = self.issue_session(&rec).await?;
        info!(user_id = %rec.user_id, expires_at = %issued.expires_at, "session issued");
        Ok(AuthResult::Authenticated(issued))
    }

    async fn resolve_session(&self, session: &SessionToken) -> Result<SessionInfo, AuthError> {
        let record = self
            .session_store
            .get_session(session)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        if record.is_expired_at(Utc::now()) {
            self.session_store.revoke_session(session).await?;
            return Err(AuthError::InvalidSession);
        }

        Ok(SessionInfo {
            user_id: record.user_id,
            username: record.username,
            expires_at: record.expires_at,
        })
    }

    async fn authorize(
        &self,
        session: &SessionToken,
        csrf: &CsrfToken,
    ) -> Result<SessionInfo, AuthError> {
        let info = self.resolve_session(session).await?;
        if !self.csrf_binder.verify(session, csrf)? {
            warn!(user_id = %info.user_id, "csrf token mismatch");
            return Err(AuthError::CsrfMismatch);
        }
        Ok(info)
    }

    async fn logout(&self, session: &SessionToken, csrf: &CsrfToken) -> Result<(), AuthError> {
        let info = self.authorize(session, csrf).await?;
        self.session_store.revoke_session(session).await?;
        info!(user_id = %info.user_id, "session revoked");
        Ok(())
    }
}
