use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth_event::{AuthEvent, AuthEventType};
use crate::domain::company::Company;
use crate::domain::identity_provider::IdentityProvider;
use crate::domain::repositories::{AuthEventSink, CompanyRepository};
use crate::domain::user::{AuthGrant, AuthSession, EnrichedUser, UserMetadata};
use crate::services::errors::{AuthError, AuthResult};
use crate::services::forms::{Credentials, NewAccount, ProfileUpdate};
use crate::services::session_resolver::SessionResolver;

/// Sign-up, sign-in and session management over the identity provider
///
/// Sign-up creates a company and then an identity linked to it. The two
/// writes cannot share a transaction, so a failed identity creation is
/// followed by an awaited delete of the company before returning.
#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    companies: Arc<dyn CompanyRepository>,
    events: Arc<dyn AuthEventSink>,
    resolver: SessionResolver,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        companies: Arc<dyn CompanyRepository>,
        events: Arc<dyn AuthEventSink>,
    ) -> Self {
        let resolver = SessionResolver::new(identity.clone(), companies.clone());
        Self {
            identity,
            companies,
            events,
            resolver,
        }
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    /// Provisions a company and a user linked to it
    ///
    /// # Steps
    /// 1. Insert the company; on failure nothing needs undoing
    /// 2. Create the identity with the company ID in its metadata; on
    ///    failure delete the company, then report the provider's message
    /// 3. Record a `registration` event (best effort)
    /// 4. Resolve and return the enriched session
    pub async fn sign_up(&self, account: NewAccount) -> AuthResult<AuthSession> {
        let company = Company::new(account.company_name.clone(), account.company_address.clone())
            .map_err(AuthError::CompanyCreationFailed)?;

        let company = match self.companies.insert(&company).await {
            Ok(company) => company,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create company");
                return Err(AuthError::CompanyCreationFailed(e));
            }
        };

        let metadata = UserMetadata {
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            company_id: Some(company.id()),
        };

        let grant = match self
            .identity
            .create_identity(&account.email, &account.password, metadata)
            .await
        {
            Ok(grant) => grant,
            Err(e) => {
                tracing::warn!(email = %account.email, error = %e, "Identity creation failed, removing company");
                self.remove_orphaned_company(company.id()).await;
                return Err(AuthError::IdentityCreationFailed(e));
            }
        };

        tracing::info!(
            user_id = %grant.user.id,
            company_id = %company.id(),
            "Account provisioned"
        );

        self.log_auth_event(
            grant.user.id,
            AuthEventType::Registration,
            json!({
                "email": account.email.as_str(),
                "company_id": company.id(),
                "company_name": company.name(),
            }),
        )
        .await;

        self.finish(grant).await
    }

    /// Authenticates existing credentials
    pub async fn sign_in(&self, credentials: Credentials) -> AuthResult<AuthSession> {
        let grant = self
            .identity
            .authenticate(&credentials.email, &credentials.password)
            .await
            .map_err(|e| {
                tracing::info!(email = %credentials.email, error = %e, "Sign in rejected");
                AuthError::AuthenticationFailed(e)
            })?;

        self.log_auth_event(
            grant.user.id,
            AuthEventType::Login,
            json!({ "email": credentials.email.as_str() }),
        )
        .await;

        self.finish(grant).await
    }

    /// Invalidates the session behind `access_token`
    ///
    /// On failure the session is left as it was and the provider error is
    /// returned.
    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let user_id = self
            .identity
            .current_user(access_token)
            .await
            .ok()
            .flatten()
            .map(|user| user.id);

        self.identity
            .invalidate_session(access_token)
            .await
            .map_err(AuthError::SignOutFailed)?;

        if let Some(user_id) = user_id {
            self.log_auth_event(user_id, AuthEventType::Logout, json!({}))
                .await;
        }

        Ok(())
    }

    /// Exchanges a live session for a fresh one
    pub async fn refresh_session(&self, access_token: &str) -> AuthResult<AuthSession> {
        let session = self
            .identity
            .refresh_session(access_token)
            .await
            .map_err(AuthError::SessionRefreshFailed)?;

        self.resolver.resolve_session(session).await
    }

    pub async fn get_session(&self, access_token: &str) -> Option<AuthSession> {
        self.resolver.get_session(access_token).await
    }

    pub async fn update_profile(
        &self,
        access_token: &str,
        update: ProfileUpdate,
    ) -> AuthResult<EnrichedUser> {
        self.resolver.update(access_token, update).await
    }

    async fn finish(&self, grant: AuthGrant) -> AuthResult<AuthSession> {
        self.resolver
            .resolve_session(grant.session)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %grant.user.id, error = %e, "Could not resolve freshly issued session");
                AuthError::Unexpected(e.to_string())
            })
    }

    /// Compensating delete for step 1 of sign-up
    ///
    /// A failure here is logged only; the caller still sees the identity
    /// error that triggered it.
    async fn remove_orphaned_company(&self, company_id: Uuid) {
        if let Err(e) = self.companies.delete(company_id).await {
            tracing::error!(%company_id, error = %e, "Failed to roll back company after identity creation failure");
        }
    }

    async fn log_auth_event(&self, user_id: Uuid, event_type: AuthEventType, data: Value) {
        let event = AuthEvent::new(user_id, event_type, data);
        if let Err(e) = self.events.append(&event).await {
            tracing::warn!(%user_id, event_type = %event_type, error = %e, "Failed to record auth event");
        }
    }
}
