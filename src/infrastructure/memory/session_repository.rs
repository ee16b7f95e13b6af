use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::{SessionRecord, SessionRepository};

/// In-process SessionRepository
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<Uuid, SessionRecord>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: SessionRecord) -> Result<(), String> {
        self.sessions.write().await.insert(session.id, session);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SessionRecord>, String> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn revoke(&self, id: Uuid) -> Result<(), String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| format!("Session not found: {}", id))?;
        session.revoked = true;
        Ok(())
    }
}
