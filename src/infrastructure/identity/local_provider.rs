use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::jwt::{create_token, verify_token, Claims};
use crate::auth::password::{hash_password, verify_password};
use crate::domain::identity_provider::{AuthChangeKind, AuthTransition, IdentityProvider};
use crate::domain::repositories::{SessionRecord, SessionRepository, User, UserRepository};
use crate::domain::user::{AuthGrant, Email, MetadataPatch, ProviderUser, Session, UserMetadata};

/// Buffered transitions per subscriber before it starts lagging
const TRANSITION_CAPACITY: usize = 64;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "User already registered (duplicate email)";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials";

/// Settings for token issuing and password hashing
#[derive(Debug, Clone)]
pub struct IdentitySettings {
    pub jwt_secret: String,
    pub session_ttl: Duration,
    pub password_cost: u32,
}

/// Identity provider backed by our own user and session tables
///
/// Passwords are bcrypt hashed; sessions are JWTs whose `sid` claim points at
/// a session record, so a token stops working as soon as its record is
/// revoked even if the JWT itself has not expired.
pub struct LocalIdentityProvider {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    settings: IdentitySettings,
    transitions: broadcast::Sender<AuthTransition>,
}

impl LocalIdentityProvider {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        settings: IdentitySettings,
    ) -> Self {
        let (transitions, _) = broadcast::channel(TRANSITION_CAPACITY);
        Self {
            users,
            sessions,
            settings,
            transitions,
        }
    }

    async fn open_session(&self, user_id: Uuid) -> Result<Session, String> {
        let now = Utc::now();
        let record = SessionRecord {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            expires_at: now + self.settings.session_ttl,
            revoked: false,
        };

        let access_token = create_token(
            user_id,
            record.id,
            record.expires_at,
            &self.settings.jwt_secret,
        )
        .map_err(|e| format!("Failed to create session token: {}", e))?;

        let expires_at = record.expires_at;
        self.sessions.create(record).await?;

        Ok(Session {
            access_token,
            user_id,
            expires_at,
        })
    }

    /// Claims of a token whose session record is still live
    async fn live_claims(&self, access_token: &str) -> Result<Claims, String> {
        let claims = verify_token(access_token, &self.settings.jwt_secret)
            .map_err(|e| format!("Invalid session token: {}", e))?;

        let record = self
            .sessions
            .find_by_id(claims.sid)
            .await?
            .ok_or_else(|| "Session not found".to_string())?;

        if record.user_id != claims.sub || !record.is_live(Utc::now()) {
            return Err("Session has expired or was signed out".to_string());
        }

        Ok(claims)
    }

    fn publish(&self, kind: AuthChangeKind, session: Option<Session>) {
        // No subscribers is not an error
        let _ = self.transitions.send(AuthTransition { kind, session });
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_identity(
        &self,
        email: &Email,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<AuthGrant, String> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(DUPLICATE_EMAIL_MESSAGE.to_string());
        }

        let password_hash = hash_password(password, self.settings.password_cost)
            .map_err(|e| format!("Failed to hash password: {}", e))?;

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            password_hash,
            metadata,
        };
        self.users.create(user.clone()).await?;

        // A user without a session is a failed registration; remove it so
        // the email stays free and no identity outlives its company
        let session = match self.open_session(user.id).await {
            Ok(session) => session,
            Err(e) => {
                if let Err(cleanup) = self.users.delete(user.id).await {
                    tracing::error!(user_id = %user.id, error = %cleanup, "Failed to remove user after session failure");
                }
                return Err(e);
            }
        };
        tracing::info!(user_id = %user.id, "Identity created");
        self.publish(AuthChangeKind::SignedIn, Some(session.clone()));

        Ok(AuthGrant {
            user: user.into(),
            session,
        })
    }

    async fn authenticate(&self, email: &Email, password: &str) -> Result<AuthGrant, String> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_string())?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| format!("Password verification failed: {}", e))?;
        if !valid {
            return Err(INVALID_CREDENTIALS_MESSAGE.to_string());
        }

        let session = self.open_session(user.id).await?;
        self.publish(AuthChangeKind::SignedIn, Some(session.clone()));

        Ok(AuthGrant {
            user: user.into(),
            session,
        })
    }

    async fn invalidate_session(&self, access_token: &str) -> Result<(), String> {
        let claims = self.live_claims(access_token).await?;
        self.sessions.revoke(claims.sid).await?;
        self.publish(AuthChangeKind::SignedOut, None);
        Ok(())
    }

    async fn refresh_session(&self, access_token: &str) -> Result<Session, String> {
        let claims = self.live_claims(access_token).await?;
        self.sessions.revoke(claims.sid).await?;

        let session = self.open_session(claims.sub).await?;
        self.publish(AuthChangeKind::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    async fn get_session(&self, access_token: &str) -> Result<Option<Session>, String> {
        let claims = match verify_token(access_token, &self.settings.jwt_secret) {
            Ok(claims) => claims,
            Err(_) => return Ok(None),
        };

        let session = self
            .sessions
            .find_by_id(claims.sid)
            .await?
            .filter(|record| record.user_id == claims.sub && record.is_live(Utc::now()))
            .map(|record| Session {
                access_token: access_token.to_string(),
                user_id: record.user_id,
                expires_at: record.expires_at,
            });

        Ok(session)
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<ProviderUser>, String> {
        let claims = self.live_claims(access_token).await?;
        Ok(self.users.find_by_id(claims.sub).await?.map(Into::into))
    }

    async fn update_metadata(
        &self,
        access_token: &str,
        patch: &MetadataPatch,
    ) -> Result<ProviderUser, String> {
        let claims = self.live_claims(access_token).await?;
        self.users.update_metadata(claims.sub, patch).await?;

        let user: ProviderUser = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| "User not found".to_string())?
            .into();

        self.publish(
            AuthChangeKind::UserUpdated,
            Some(Session {
                access_token: access_token.to_string(),
                user_id: claims.sub,
                expires_at: claims.expires_at(),
            }),
        );

        Ok(user)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthTransition> {
        self.transitions.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::{InMemorySessionRepository, InMemoryUserRepository};

    fn provider() -> LocalIdentityProvider {
        LocalIdentityProvider::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemorySessionRepository::new()),
            IdentitySettings {
                jwt_secret: "unit-test-secret".to_string(),
                session_ttl: Duration::hours(1),
                password_cost: 4,
            },
        )
    }

    fn email() -> Email {
        Email::new("jan@example.com").unwrap()
    }

    fn metadata() -> UserMetadata {
        UserMetadata {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            company_id: Some(Uuid::new_v4()),
        }
    }

    #[tokio::test]
    async fn create_identity_opens_session() {
        let provider = provider();
        let grant = provider
            .create_identity(&email(), "secret1", metadata())
            .await
            .unwrap();

        let user = provider
            .current_user(&grant.session.access_token)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, grant.user.id);
        assert_eq!(user.metadata.first_name, "Jan");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let provider = provider();
        provider
            .create_identity(&email(), "secret1", metadata())
            .await
            .unwrap();

        let err = provider
            .create_identity(&email(), "secret2", metadata())
            .await
            .unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let provider = provider();
        provider
            .create_identity(&email(), "secret1", metadata())
            .await
            .unwrap();

        assert!(provider.authenticate(&email(), "secret1").await.is_ok());
        assert_eq!(
            provider.authenticate(&email(), "wrong").await.unwrap_err(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }

    #[tokio::test]
    async fn unknown_email_gets_same_message_as_bad_password() {
        let provider = provider();
        let err = provider
            .authenticate(&Email::new("ghost@example.com").unwrap(), "secret1")
            .await
            .unwrap_err();
        assert_eq!(err, INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn invalidated_session_is_gone() {
        let provider = provider();
        let grant = provider
            .create_identity(&email(), "secret1", metadata())
            .await
            .unwrap();
        let token = grant.session.access_token;

        provider.invalidate_session(&token).await.unwrap();

        assert!(provider.get_session(&token).await.unwrap().is_none());
        assert!(provider.current_user(&token).await.is_err());
        assert!(provider.invalidate_session(&token).await.is_err());
    }

    #[tokio::test]
    async fn refresh_revokes_old_token() {
        let provider = provider();
        let grant = provider
            .create_identity(&email(), "secret1", metadata())
            .await
            .unwrap();
        let old = grant.session.access_token;

        let fresh = provider.refresh_session(&old).await.unwrap();

        assert_ne!(fresh.access_token, old);
        assert!(provider.get_session(&old).await.unwrap().is_none());
        assert!(provider.get_session(&fresh.access_token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn garbage_token_has_no_session() {
        let provider = provider();
        assert!(provider.get_session("garbage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_metadata_changes_only_patched_fields() {
        let provider = provider();
        let grant = provider
            .create_identity(&email(), "secret1", metadata())
            .await
            .unwrap();

        let user = provider
            .update_metadata(
                &grant.session.access_token,
                &MetadataPatch {
                    first_name: None,
                    last_name: Some("Nowak".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(user.metadata.first_name, "Jan");
        assert_eq!(user.metadata.last_name, "Nowak");
        assert_eq!(user.metadata.company_id, grant.user.metadata.company_id);
    }

    #[tokio::test]
    async fn transitions_are_broadcast() {
        let provider = provider();
        let mut rx = provider.subscribe();

        let grant = provider
            .create_identity(&email(), "secret1", metadata())
            .await
            .unwrap();
        provider
            .invalidate_session(&grant.session.access_token)
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, AuthChangeKind::SignedIn);
        assert_eq!(first.session.map(|s| s.user_id), Some(grant.user.id));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, AuthChangeKind::SignedOut);
        assert!(second.session.is_none());
    }
}
