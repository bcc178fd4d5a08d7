use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::settings::SeedUser;
use chrono::Utc;
use dashmap::DashMap;

/// User store kept in process memory, keyed by exact username.
pub struct MemoryAuthRepo {
    users: DashMap<String, CredentialRecord>,
}

impl MemoryAuthRepo {
    pub fn new() -> Self {
        MemoryAuthRepo {
            users: DashMap::new(),
        }
    }

    pub fn insert(&self, record: CredentialRecord) {
        self.users.insert(record.username.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Add the configured users, hashing plain passwords on the way in.
    pub async fn seed(
        &self,
        hasher: &dyn CredentialHasher,
        seeds: &[SeedUser],
    ) -> anyhow::Result<usize> {
        for seed in seeds {
            let password_hash = match (&seed.password, &seed.password_hash) {
                (Some(password), None) => hasher.hash_password(password).await?,
                (None, Some(hash)) => hash.clone(),
                _ => {
                    return Err(anyhow::anyhow!(
                        "seed user {:?} needs exactly one of password or password_hash",
                        seed.username
                    ));
                }
            };
            self.insert(CredentialRecord {
                user_id: UserId::new_random(),
                username: seed.username.clone(),
                password_hash,
                is_active: seed.is_active,
                created_at: Utc::now(),
            });
        }
        Ok(seeds.len())
    }
}

impl Default for MemoryAuthRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuthRepo for MemoryAuthRepo {
    async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self.users.get(username).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::Argon2PasswordHasher;

    fn seed(username: &str, password: Option<&str>, hash: Option<&str>) -> SeedUser {
        SeedUser {
            username: username.to_string(),
            password: password.map(str::to_string),
            password_hash: hash.map(str::to_string),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn lookup_is_exact() {
        let repo = MemoryAuthRepo::new();
        let hasher = Argon2PasswordHasher::with_cost(1024, 1).unwrap();
        repo.seed(&hasher, &[seed("TEST_USER", Some("DUMMY_PASSWORD"), None)])
            .await
            .unwrap();

        let rec = repo.get_by_username("TEST_USER").await.unwrap().unwrap();
        assert!(rec.password_hash.starts_with("$argon2id$"));
        assert!(repo.get_by_username("test_user").await.unwrap().is_none());
        assert!(repo.get_by_username("TEST_USER ").await.unwrap().is_none());
        assert!(repo.get_by_username("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn precomputed_hash_is_kept_verbatim() {
        let repo = MemoryAuthRepo::new();
        let hasher = Argon2PasswordHasher::with_cost(1024, 1).unwrap();
        repo.seed(&hasher, &[seed("alice", None, Some("$argon2id$opaque"))])
            .await
            .unwrap();
        let rec = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(rec.password_hash, "$argon2id$opaque");
    }

    #[tokio::test]
    async fn seed_needs_exactly_one_secret() {
        let repo = MemoryAuthRepo::new();
        let hasher = Argon2PasswordHasher::with_cost(1024, 1).unwrap();
        assert!(repo.seed(&hasher, &[seed("a", None, None)]).await.is_err());
        assert!(repo
            .seed(&hasher, &[seed("b", Some("pw"), Some("$argon2id$x"))])
            .await
            .is_err());
        assert!(repo.is_empty());
    }
}
