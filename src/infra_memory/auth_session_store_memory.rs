use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::DashMap;

/// Session store kept in process memory. Expiry is enforced by callers and
/// by periodic [`AuthSessionStore::purge_expired`] sweeps.
pub struct MemoryAuthSessionStore {
    sessions: DashMap<SessionToken, SessionRecord>,
}

impl MemoryAuthSessionStore {
    pub fn new() -> Self {
        MemoryAuthSessionStore {
            sessions: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for MemoryAuthSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuthSessionStore for MemoryAuthSessionStore {
    async fn save_session(
        &self,
        token: &SessionToken,
        record: &SessionRecord,
        _ttl_secs: u64,
    ) -> Result<(), AuthError> {
        self.sessions.insert(token.clone(), record.clone());
        Ok(())
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Option<SessionRecord>, AuthError> {
        Ok(self.sessions.get(token).map(|entry| entry.value().clone()))
    }

    async fn revoke_session(&self, token: &SessionToken) -> Result<bool, AuthError> {
        Ok(self.sessions.remove(token).is_some())
    }

    async fn purge_expired(&self) -> Result<usize, AuthError> {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, record| !record.is_expired_at(now));
        Ok(before.saturating_sub(self.sessions.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_in: Duration) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            user_id: UserId::new_random(),
            username: "TEST_USER".to_string(),
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[tokio::test]
    async fn save_get_revoke() {
        let store = MemoryAuthSessionStore::new();
        let token = SessionToken::generate();
        let rec = record(Duration::hours(1));

        store.save_session(&token, &rec, 3600).await.unwrap();
        assert_eq!(store.get_session(&token).await.unwrap(), Some(rec));

        assert!(store.revoke_session(&token).await.unwrap());
        assert!(!store.revoke_session(&token).await.unwrap());
        assert!(store.get_session(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn purge_drops_only_expired() {
        let store = MemoryAuthSessionStore::new();
        let live = SessionToken::generate();
        let dead = SessionToken::generate();
        store
            .save_session(&live, &record(Duration::hours(1)), 3600)
            .await
            .unwrap();
        store
            .save_session(&dead, &record(Duration::seconds(-1)), 1)
            .await
            .unwrap();

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get_session(&live).await.unwrap().is_some());
    }
}
