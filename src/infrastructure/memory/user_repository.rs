use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::{User, UserRepository};
use crate::domain::user::{Email, MetadataPatch};

/// In-process UserRepository enforcing email uniqueness
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<Uuid, String> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(format!("duplicate email: {}", user.email));
        }
        let id = user.id;
        users.insert(id, user);
        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, String> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn update_metadata(&self, id: Uuid, patch: &MetadataPatch) -> Result<(), String> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| format!("User not found: {}", id))?;
        patch.apply_to(&mut user.metadata);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| format!("User not found: {}", id))
    }
}
