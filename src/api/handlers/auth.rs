use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::api::envelope::ApiResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::{BearerToken, CurrentUser};
use crate::api::state::AppState;
use crate::domain::user::{AuthSession, EnrichedUser};
use crate::services::forms::{ProfileUpdate, SignInData, SignUpData};

/// Register a new company and its first user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SignUpData>, ApiError>,
) -> Result<(StatusCode, Json<ApiResponse<AuthSession>>), ApiError> {
    let account = req.validate().map_err(ApiError::validation)?;
    let session = state.auth.sign_up(account).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session))))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<SignInData>, ApiError>,
) -> Result<Json<ApiResponse<AuthSession>>, ApiError> {
    let credentials = req.validate().map_err(ApiError::validation)?;
    let session = state.auth.sign_in(credentials).await?;

    Ok(Json(ApiResponse::ok(session)))
}

/// Invalidate the caller's session
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth.sign_out(&token).await?;
    Ok(Json(ApiResponse::empty()))
}

/// Exchange the caller's session for a fresh one
///
/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<AuthSession>>, ApiError> {
    let session = state.auth.refresh_session(&token).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// Current session with the enriched user
///
/// GET /api/auth/session
pub async fn session(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<ApiResponse<AuthSession>>, ApiError> {
    let session = state
        .auth
        .get_session(&token)
        .await
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    Ok(Json(ApiResponse::ok(session)))
}

/// Update the caller's name and company details
///
/// PATCH /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    WithRejection(Json(req), _): WithRejection<Json<ProfileUpdate>, ApiError>,
) -> Result<Json<ApiResponse<EnrichedUser>>, ApiError> {
    let user = state.auth.update_profile(&current.token, req).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
