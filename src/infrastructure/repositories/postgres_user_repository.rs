use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::user_repository::{User, UserRepository};
use crate::domain::user::{Email, MetadataPatch, UserMetadata};

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    company_id: Option<Uuid>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email =
            Email::new(&r.email).map_err(|e| format!("Invalid email from database: {}", e))?;
        Ok(User {
            id: r.id,
            email,
            password_hash: r.password_hash,
            metadata: UserMetadata {
                first_name: r.first_name,
                last_name: r.last_name,
                company_id: r.company_id,
            },
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<Uuid, String> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name, company_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.metadata.first_name)
        .bind(&user.metadata.last_name)
        .bind(user.metadata.company_id)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                format!("duplicate email: {}", user.email)
            }
            _ => format!("Failed to create user: {}", e),
        })?;

        Ok(user.id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, company_id
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find user by id: {}", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, String> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, company_id
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find user by email: {}", e))?;

        row.map(User::try_from).transpose()
    }

    async fn update_metadata(&self, id: Uuid, patch: &MetadataPatch) -> Result<(), String> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update user metadata: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("User not found: {}", id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query(
            r#"
            DELETE FROM users WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to delete user: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("User not found: {}", id));
        }

        Ok(())
    }
}
