use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth_event::AuthEvent;
use crate::domain::repositories::AuthEventSink;

/// In-process audit trail
#[derive(Default)]
pub struct InMemoryAuthEventSink {
    events: RwLock<Vec<AuthEvent>>,
}

impl InMemoryAuthEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<AuthEvent> {
        self.events.read().await.clone()
    }

    pub async fn events_for(&self, user_id: Uuid) -> Vec<AuthEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuthEventSink for InMemoryAuthEventSink {
    async fn append(&self, event: &AuthEvent) -> Result<(), String> {
        self.events.write().await.push(event.clone());
        Ok(())
    }
}
