// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

pub const SERVER_ERROR: &str = "Server error";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error; detail never reaches production clients
    InternalServerError { message: String, detail: Option<String> },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError { message, .. } => message,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::InternalServerError { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({ "message": self.message() })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Generic 500 that keeps the underlying cause for non-production responses
    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::InternalServerError {
            message: SERVER_ERROR.to_string(),
            detail: Some(err.to_string()),
        }
    }
}

impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        // Log the real error but return generic message
        tracing::error!("Store error: {}", err);
        ApiError::internal(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

/// Carried on error responses so the error handler can decorate them
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let report = ErrorReport {
            message: self.message().to_string(),
            detail: self.detail().map(str::to_string),
        };
        let mut response = (self.status_code(), Json(self.to_json())).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
