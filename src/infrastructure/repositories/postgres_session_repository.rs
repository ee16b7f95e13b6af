use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{SessionRecord, SessionRepository};

/// PostgreSQL implementation of SessionRepository
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: SessionRecord) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to create session: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SessionRecord>, String> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, created_at, expires_at, revoked_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find session: {}", e))?;

        Ok(row.map(|r| SessionRecord {
            id: r.id,
            user_id: r.user_id,
            created_at: r.created_at,
            expires_at: r.expires_at,
            revoked: r.revoked_at.is_some(),
        }))
    }

    async fn revoke(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = COALESCE(revoked_at, NOW())
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to revoke session: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Session not found: {}", id));
        }

        Ok(())
    }
}
