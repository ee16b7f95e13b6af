use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::user::{AuthGrant, Email, MetadataPatch, ProviderUser, Session, UserMetadata};

/// Kind of provider-driven auth state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

impl AuthChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthChangeKind::SignedIn => "SIGNED_IN",
            AuthChangeKind::SignedOut => "SIGNED_OUT",
            AuthChangeKind::TokenRefreshed => "TOKEN_REFRESHED",
            AuthChangeKind::UserUpdated => "USER_UPDATED",
        }
    }
}

impl std::fmt::Display for AuthChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw transition as broadcast by the provider
///
/// `session` is `None` for sign-out.
#[derive(Debug, Clone)]
pub struct AuthTransition {
    pub kind: AuthChangeKind,
    pub session: Option<Session>,
}

/// Contract of the identity/auth provider
///
/// Error strings are human-readable and are passed through to callers
/// verbatim (for example a duplicate-email rejection).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new identity carrying `metadata` and open a session for it
    async fn create_identity(
        &self,
        email: &Email,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<AuthGrant, String>;

    /// Check credentials and open a session
    async fn authenticate(&self, email: &Email, password: &str) -> Result<AuthGrant, String>;

    /// Revoke the session behind `access_token`
    async fn invalidate_session(&self, access_token: &str) -> Result<(), String>;

    /// Exchange a live session for a fresh one, revoking the old token
    async fn refresh_session(&self, access_token: &str) -> Result<Session, String>;

    /// The live session behind `access_token`, if any
    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, String>;

    /// The identity owning `access_token`
    ///
    /// `Err` for an invalid or revoked token, `Ok(None)` when the token is
    /// valid but its user no longer exists.
    async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, String>;

    /// Update profile metadata of the identity owning `access_token`
    async fn update_metadata(
        &self,
        access_token: &str,
        patch: &MetadataPatch,
    ) -> Result<ProviderUser, String>;

    /// Subscribe to auth state transitions emitted after this call
    fn subscribe(&self) -> broadcast::Receiver<AuthTransition>;
}
