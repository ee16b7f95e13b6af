use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::company::{Company, CompanyUpdate};
use crate::domain::repositories::CompanyRepository;

/// PostgreSQL implementation of CompanyRepository
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    /// Creates a new PostgresCompanyRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(r: CompanyRow) -> Self {
        Company::from_persistence(r.id, r.name, r.address, r.created_at, r.updated_at)
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn insert(&self, company: &Company) -> Result<Company, String> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            INSERT INTO companies (id, name, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, address, created_at, updated_at
            "#,
        )
        .bind(company.id())
        .bind(company.name())
        .bind(company.address())
        .bind(company.created_at())
        .bind(company.updated_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| format!("Failed to create company: {}", e))?;

        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Company>, String> {
        let row = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, name, address, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find company by id: {}", e))?;

        Ok(row.map(Company::from))
    }

    async fn update(&self, id: Uuid, update: &CompanyUpdate) -> Result<(), String> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET name = COALESCE($2, name),
                address = COALESCE($3, address),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(update.name.as_deref())
        .bind(update.address.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update company: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Company not found: {}", id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query(
            r#"
            DELETE FROM companies WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to delete company: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Company not found: {}", id));
        }

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Company>, String> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            r#"
            SELECT id, name, address, created_at, updated_at
            FROM companies
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list companies: {}", e))?;

        Ok(rows.into_iter().map(Company::from).collect())
    }
}
