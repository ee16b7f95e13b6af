use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{Email, MetadataPatch, ProviderUser, UserMetadata};

/// Stored credential record behind the local identity provider
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Email,
    pub password_hash: String,
    pub metadata: UserMetadata,
}

impl From<User> for ProviderUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            metadata: user.metadata,
        }
    }
}

/// Repository trait for stored identities
///
/// `create` must fail with a message containing "duplicate" when the email
/// is already taken.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> Result<Uuid, String>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, String>;

    /// Overwrite the name fields present in `patch`
    async fn update_metadata(&self, id: Uuid, patch: &MetadataPatch) -> Result<(), String>;

    /// Remove a user; used to undo a half-finished registration
    async fn delete(&self, id: Uuid) -> Result<(), String>;
}
