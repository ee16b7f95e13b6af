use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::company::{Company, CompanyUpdate};

/// Repository trait for Company aggregate
///
/// Defines the contract for persisting and retrieving companies.
/// Implementations should handle database-specific details.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a new company and return the stored row
    async fn insert(&self, company: &Company) -> Result<Company, String>;

    /// Find a company by its ID
    async fn get(&self, id: Uuid) -> Result<Option<Company>, String>;

    /// Apply a partial update; fails if the company does not exist
    async fn update(&self, id: Uuid, update: &CompanyUpdate) -> Result<(), String>;

    /// Delete a company by ID
    async fn delete(&self, id: Uuid) -> Result<(), String>;

    /// List all companies, oldest first
    async fn list(&self) -> Result<Vec<Company>, String>;
}
