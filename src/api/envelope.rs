use serde::Serialize;

/// Uniform `{data, error, success}` response body
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            success: true,
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
            success: true,
        }
    }
}
