use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::user::EnrichedUser;

/// Raw bearer token from the `Authorization` header
///
/// Usage:
/// ```rust,ignore
/// async fn handler(BearerToken(token): BearerToken) -> Result<String, ApiError> {
///     Ok(token)
/// }
/// ```
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ApiError::unauthorized("Invalid authorization format. Use: Bearer <token>")
            })?;

        Ok(BearerToken(token.to_string()))
    }
}

/// Signed-in user for protected routes
///
/// Rejects with 401 unless the bearer token resolves to a live session.
pub struct CurrentUser {
    pub token: String,
    pub user: EnrichedUser,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let user = state
            .auth
            .resolver()
            .resolve(&token)
            .await
            .map_err(|_| ApiError::unauthorized("Authentication required"))?;

        Ok(CurrentUser { token, user })
    }
}
