use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub user_id: UserId,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Read side of the user store. Lifecycle of the records is outside this service.
#[async_trait::async_trait]
pub trait AuthRepo: Send + Sync {
    /// Fetch credentials by exact username (for login).
    async fn get_by_username(&self, username: &str)
    -> Result<Option<CredentialRecord>, AuthError>;
}
