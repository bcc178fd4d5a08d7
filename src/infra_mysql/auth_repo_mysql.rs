use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

/// `auth_credential` row as it comes off the wire.
#[derive(sqlx::FromRow)]
struct CredentialRow {
    user_id: Vec<u8>,
    username: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for CredentialRecord {
    type Error = AuthError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let user_id = Uuid::from_slice(&row.user_id)
            .map(UserId)
            .map_err(|e| AuthError::Store(format!("bad user_id in auth_credential: {}", e)))?;
        Ok(CredentialRecord {
            user_id,
            username: row.username,
            password_hash: row.password_hash,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

/// Keeps a row only if its username is byte-for-byte the one asked for.
/// A PAD SPACE collation would otherwise let `"TEST_USER "` match `"TEST_USER"`.
fn exact_match(row: CredentialRow, username: &str) -> Option<CredentialRow> {
    (row.username.as_bytes() == username.as_bytes()).then_some(row)
}

pub struct MySqlAuthRepo {
    pool: MySqlPool,
}

impl MySqlAuthRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlAuthRepo { pool }
    }
}

#[async_trait::async_trait]
impl AuthRepo for MySqlAuthRepo {
    async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
SELECT user_id, username, password_hash, is_active, created_at
FROM auth_credential
WHERE username = ?
"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Store(e.to_string()))?;

        row.and_then(|row| exact_match(row, username))
            .map(CredentialRecord::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str, user_id: Vec<u8>) -> CredentialRow {
        CredentialRow {
            user_id,
            username: username.to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_maps_to_record() {
        let id = Uuid::new_v4();
        let record = CredentialRecord::try_from(row("TEST_USER", id.as_bytes().to_vec())).unwrap();
        assert_eq!(record.user_id, UserId(id));
        assert_eq!(record.username, "TEST_USER");
        assert!(record.is_active);
    }

    #[test]
    fn short_user_id_is_store_error() {
        let err = CredentialRecord::try_from(row("TEST_USER", vec![0u8; 15])).unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));
    }

    #[test]
    fn padded_or_recased_username_does_not_match() {
        let id = Uuid::new_v4().as_bytes().to_vec();
        assert!(exact_match(row("TEST_USER", id.clone()), "TEST_USER").is_some());
        for asked in ["TEST_USER ", "test_user", " TEST_USER"] {
            assert!(exact_match(row("TEST_USER", id.clone()), asked).is_none(), "{:?}", asked);
        }
    }
}
