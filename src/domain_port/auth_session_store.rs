use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait AuthSessionStore: Send + Sync {
    /// Save a session under its token, live for `ttl_secs`.
    async fn save_session(
        &self,
        token: &SessionToken,
        record: &SessionRecord,
        ttl_secs: u64,
    ) -> Result<(), AuthError>;
    /// Fetch a session. Expired sessions may still be returned; callers check `expires_at`.
    async fn get_session(&self, token: &SessionToken) -> Result<Option<SessionRecord>, AuthError>;
    /// Remove a session. Returns whether it existed.
    async fn revoke_session(&self, token: &SessionToken) -> Result<bool, AuthError>;
    /// Drop expired sessions. Stores with native expiry return 0.
    async fn purge_expired(&self) -> Result<usize, AuthError>;
}
