use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::company::Company;
use crate::domain::identity_provider::{AuthChangeKind, AuthTransition, IdentityProvider};
use crate::domain::repositories::CompanyRepository;
use crate::domain::user::{AuthSession, EnrichedUser, ProviderUser, Session};
use crate::services::errors::{AuthError, AuthResult};
use crate::services::forms::ProfileUpdate;
use crate::services::subscription::Subscription;

/// Auth state change delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStateChange {
    pub kind: AuthChangeKind,
    pub user: Option<EnrichedUser>,
}

/// Turns provider sessions into enriched users
///
/// Company lookups degrade gracefully: a failed or empty fetch leaves the
/// company off the user instead of failing resolution.
#[derive(Clone)]
pub struct SessionResolver {
    identity: Arc<dyn IdentityProvider>,
    companies: Arc<dyn CompanyRepository>,
}

impl SessionResolver {
    pub fn new(identity: Arc<dyn IdentityProvider>, companies: Arc<dyn CompanyRepository>) -> Self {
        Self {
            identity,
            companies,
        }
    }

    /// Resolves the user owning `access_token` with their company attached
    pub async fn resolve(&self, access_token: &str) -> AuthResult<EnrichedUser> {
        let user = match self.identity.current_user(access_token).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AuthError::UserNotFound),
            Err(e) => {
                tracing::debug!(error = %e, "Identity lookup failed");
                return Err(AuthError::UserNotFound);
            }
        };

        let company = self.company_for(&user).await;
        Ok(EnrichedUser::new(user, company))
    }

    /// Attaches the enriched user to a provider session
    pub async fn resolve_session(&self, session: Session) -> AuthResult<AuthSession> {
        let user = self.resolve(&session.access_token).await?;
        Ok(AuthSession { session, user })
    }

    /// Current session for a token, or `None` if it is not live
    pub async fn get_session(&self, access_token: &str) -> Option<AuthSession> {
        let session = match self.identity.get_session(access_token).await {
            Ok(Some(session)) => session,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(error = %e, "Failed to look up session");
                return None;
            }
        };

        match self.resolve_session(session).await {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Session exists but its user could not be resolved");
                None
            }
        }
    }

    /// Updates profile metadata and company details of the signed-in user
    ///
    /// The identity and company writes are independent; a failure of either
    /// is reported as its own error. Company fields are ignored when the
    /// user has no company.
    pub async fn update(
        &self,
        access_token: &str,
        update: ProfileUpdate,
    ) -> AuthResult<EnrichedUser> {
        let current = self.resolve(access_token).await?;
        let (metadata, company_update) = update.into_parts();

        if !metadata.is_empty() {
            self.identity
                .update_metadata(access_token, &metadata)
                .await
                .map_err(AuthError::IdentityUpdateFailed)?;
        }

        if !company_update.is_empty() {
            if let Some(company) = &current.company {
                self.companies
                    .update(company.id(), &company_update)
                    .await
                    .map_err(|e| {
                        tracing::error!(company_id = %company.id(), error = %e, "Company update failed");
                        AuthError::CompanyUpdateFailed(e)
                    })?;
            }
        }

        self.resolve(access_token).await
    }

    /// Registers a listener for provider-driven auth transitions
    ///
    /// Transitions emitted after this call returns are delivered in order.
    /// Each carries the freshly resolved user, or `None` when the transition
    /// has no session or the user could not be resolved.
    pub fn on_auth_state_change<F>(&self, mut listener: F) -> Subscription
    where
        F: FnMut(AuthStateChange) + Send + 'static,
    {
        let mut transitions = self.identity.subscribe();
        let resolver = self.clone();

        Subscription::spawn(async move {
            loop {
                match transitions.recv().await {
                    Ok(transition) => listener(resolver.enrich_transition(transition).await),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Auth state listener lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    async fn enrich_transition(&self, transition: AuthTransition) -> AuthStateChange {
        let user = match transition.session {
            Some(session) => match self.resolve(&session.access_token).await {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(kind = %transition.kind, error = %e, "Could not resolve user for auth state change");
                    None
                }
            },
            None => None,
        };

        AuthStateChange {
            kind: transition.kind,
            user,
        }
    }

    async fn company_for(&self, user: &ProviderUser) -> Option<Company> {
        let company_id = user.metadata.company_id?;
        match self.companies.get(company_id).await {
            Ok(company) => {
                if company.is_none() {
                    tracing::warn!(user_id = %user.id, %company_id, "Linked company does not exist");
                }
                company
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, %company_id, error = %e, "Failed to fetch company");
                None
            }
        }
    }
}
