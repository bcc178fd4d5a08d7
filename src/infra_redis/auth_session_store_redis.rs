use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// Sessions as JSON strings under `{prefix}:{token}`; Redis key TTLs do the expiring.
pub struct RedisAuthSessionStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisAuthSessionStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        RedisAuthSessionStore {
            conn,
            prefix: prefix.into(),
        }
    }

    fn key(&self, token: &SessionToken) -> String {
        format!("{}:{}", self.prefix, token.as_str())
    }
}

#[async_trait::async_trait]
impl AuthSessionStore for RedisAuthSessionStore {
    async fn save_session(
        &self,
        token: &SessionToken,
        record: &SessionRecord,
        ttl_secs: u64,
    ) -> Result<(), AuthError> {
        let key = self.key(token);
        let value =
            serde_json::to_string(record).map_err(|e| AuthError::InternalError(e.to_string()))?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(&key, value, ttl_secs)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(())
    }

    async fn get_session(&self, token: &SessionToken) -> Result<Option<SessionRecord>, AuthError> {
        let key = self.key(token);
        let mut conn = self.conn.clone();
        let val: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        val.map(|s| {
            serde_json::from_str::<SessionRecord>(&s)
                .map_err(|e| AuthError::InternalError(format!("corrupt session: {}", e)))
        })
        .transpose()
    }

    async fn revoke_session(&self, token: &SessionToken) -> Result<bool, AuthError> {
        let key = self.key(token);
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(&key)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;
        Ok(removed > 0)
    }

    async fn purge_expired(&self) -> Result<usize, AuthError> {
        Ok(0)
    }
}
