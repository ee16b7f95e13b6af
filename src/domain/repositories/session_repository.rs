use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Server-side record of an issued session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl SessionRecord {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// Repository trait for issued sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: SessionRecord) -> Result<(), String>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SessionRecord>, String>;

    /// Mark a session revoked; fails if it does not exist
    async fn revoke(&self, id: Uuid) -> Result<(), String>;
}
