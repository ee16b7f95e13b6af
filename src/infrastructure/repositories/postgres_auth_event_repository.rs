use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::auth_event::AuthEvent;
use crate::domain::repositories::AuthEventSink;

/// PostgreSQL audit trail
pub struct PostgresAuthEventSink {
    pool: PgPool,
}

impl PostgresAuthEventSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthEventSink for PostgresAuthEventSink {
    async fn append(&self, event: &AuthEvent) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO auth_events (id, user_id, event_type, auth_data, processed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(event.event_type.as_str())
        .bind(&event.event_data)
        .bind(event.processed)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to append auth event: {}", e))?;

        Ok(())
    }
}
