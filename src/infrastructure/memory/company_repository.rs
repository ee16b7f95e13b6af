use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::company::{Company, CompanyUpdate};
use crate::domain::repositories::CompanyRepository;

/// In-process CompanyRepository
#[derive(Default)]
pub struct InMemoryCompanyRepository {
    companies: RwLock<HashMap<Uuid, Company>>,
}

impl InMemoryCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn insert(&self, company: &Company) -> Result<Company, String> {
        let mut companies = self.companies.write().await;
        if companies.contains_key(&company.id()) {
            return Err(format!("Company already exists: {}", company.id()));
        }
        companies.insert(company.id(), company.clone());
        Ok(company.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Company>, String> {
        Ok(self.companies.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, update: &CompanyUpdate) -> Result<(), String> {
        let mut companies = self.companies.write().await;
        let company = companies
            .get_mut(&id)
            .ok_or_else(|| format!("Company not found: {}", id))?;
        company.apply(update)
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        self.companies
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| format!("Company not found: {}", id))
    }

    async fn list(&self) -> Result<Vec<Company>, String> {
        let mut companies: Vec<Company> = self.companies.read().await.values().cloned().collect();
        companies.sort_by_key(|c| (c.created_at(), c.id()));
        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_get_delete() {
        let repo = InMemoryCompanyRepository::new();
        let company = Company::new("ABC", None).unwrap();

        repo.insert(&company).await.unwrap();
        assert_eq!(repo.get(company.id()).await.unwrap(), Some(company.clone()));

        repo.delete(company.id()).await.unwrap();
        assert!(repo.get(company.id()).await.unwrap().is_none());
        assert!(repo.delete(company.id()).await.is_err());
    }

    #[tokio::test]
    async fn update_missing_company_fails() {
        let repo = InMemoryCompanyRepository::new();
        let result = repo.update(Uuid::new_v4(), &CompanyUpdate::default()).await;
        assert!(result.unwrap_err().contains("not found"));
    }
}
