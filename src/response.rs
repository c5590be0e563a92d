use serde::Serialize;
use utoipa::ToSchema;

/// Envelope used for health checks, fallbacks and error bodies.
/// Catalog resources are returned bare.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorData {
    pub error: String,
}

impl ApiResponse<ErrorData> {
    /// `{"message": <status text>, "data": {"error": <detail>}}`
    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Some(ErrorData {
                error: error.into(),
            }),
        }
    }
}
