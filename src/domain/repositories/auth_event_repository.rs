use async_trait::async_trait;

use crate::domain::auth_event::AuthEvent;

/// Append-only sink for authentication audit events
#[async_trait]
pub trait AuthEventSink: Send + Sync {
    async fn append(&self, event: &AuthEvent) -> Result<(), String>;
}
