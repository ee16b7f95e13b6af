use thiserror::Error;

use crate::domain::validation::ValidationErrors;

/// Errors surfaced by the authentication workflows
///
/// Provider messages are carried verbatim where the caller is meant to see
/// them. Everything else maps to a generic message in `user_message`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Company creation failed: {0}")]
    CompanyCreationFailed(String),

    #[error("{0}")]
    IdentityCreationFailed(String),

    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    SignOutFailed(String),

    #[error("{0}")]
    SessionRefreshFailed(String),

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    IdentityUpdateFailed(String),

    #[error("Company update failed: {0}")]
    CompanyUpdateFailed(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AuthError {
    /// Message safe to hand to the UI layer
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(errors) => errors.to_string(),
            AuthError::CompanyCreationFailed(_) => "Failed to create company".to_string(),
            AuthError::IdentityCreationFailed(msg)
            | AuthError::AuthenticationFailed(msg)
            | AuthError::SignOutFailed(msg)
            | AuthError::SessionRefreshFailed(msg)
            | AuthError::IdentityUpdateFailed(msg) => msg.clone(),
            AuthError::UserNotFound => "User is not signed in".to_string(),
            AuthError::CompanyUpdateFailed(_) => "Failed to update company details".to_string(),
            AuthError::Unexpected(_) => "An unexpected error occurred".to_string(),
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::Validation(errors)
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Errors surfaced by product queries
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Data store error: {0}")]
    Store(String),
}

impl From<ValidationErrors> for ProductError {
    fn from(errors: ValidationErrors) -> Self {
        ProductError::Validation(errors)
    }
}

pub type ProductResult<T> = Result<T, ProductError>;
