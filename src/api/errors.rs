use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::validation::ValidationErrors;
use crate::services::{AuthError, ProductError};

/// API error type with HTTP status code and message
///
/// Rendered in the same `{data, error, success}` envelope as successful
/// responses, with field messages attached for validation failures.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<ValidationErrors>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: None,
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 400 error carrying field-level messages
    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid input".to_string(),
            fields: Some(errors),
        }
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "data": null,
            "error": self.message,
            "success": false,
        });
        if let Some(fields) = self.fields {
            body["fields"] = json!(fields);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = match rejection {
            JsonRejection::MissingJsonContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.user_message();
        match err {
            AuthError::Validation(errors) => Self::validation(errors),
            AuthError::IdentityCreationFailed(_) | AuthError::IdentityUpdateFailed(_) => {
                Self::bad_request(message)
            }
            AuthError::AuthenticationFailed(_)
            | AuthError::SessionRefreshFailed(_)
            | AuthError::UserNotFound => Self::unauthorized(message),
            AuthError::SignOutFailed(_) => Self::bad_request(message),
            AuthError::CompanyCreationFailed(_)
            | AuthError::CompanyUpdateFailed(_)
            | AuthError::Unexpected(_) => Self::internal_server_error(message),
        }
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Validation(errors) => Self::validation(errors),
            ProductError::NotFound(sku) => Self::not_found(format!("Product not found: {}", sku)),
            ProductError::Store(_) => Self::internal_server_error("Failed to fetch products"),
        }
    }
}
