// HTTP API Error Types
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::database::account_store::StoreError;
use crate::services::account_service::{AccountError, ACCOUNT_NOT_FOUND, EMAIL_TAKEN};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    ValidationError {
        message: String,
        errors: Vec<String>,
    },
    InvalidJson(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),

    // Any other status produced outside the handlers (body limits, media type, ...)
    Other { status: StatusCode, message: String },
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Other { status, .. } => *status,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::MethodNotAllowed(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
            ApiError::Other { message, .. } => message,
        }
    }

    /// Convert to JSON response body: `{status: "error", message, errors?}`
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "status": "error",
            "message": self.message(),
        });

        if let ApiError::ValidationError { errors, .. } = self {
            response["errors"] = json!(errors);
        }

        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation_error(message: impl Into<String>, errors: Vec<String>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            errors,
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// Envelope for a bare status, message taken from its reason phrase
    pub fn from_status(status: StatusCode) -> Self {
        let message = status
            .canonical_reason()
            .unwrap_or(INTERNAL_ERROR_MESSAGE)
            .to_string();
        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::METHOD_NOT_ALLOWED => ApiError::MethodNotAllowed(message),
            StatusCode::INTERNAL_SERVER_ERROR => {
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
            _ => ApiError::Other { status, message },
        }
    }
}

// Convert other error types to ApiError
impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(errors) => {
                ApiError::validation_error("Validation failed", errors)
            }
            AccountError::NotFound => ApiError::not_found(ACCOUNT_NOT_FOUND),
            AccountError::Conflict(msg) => ApiError::conflict(msg),
            AccountError::Backend(store_err) => store_err.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_connectivity() {
            tracing::error!("Database unavailable: {}", err);
            return ApiError::service_unavailable(UNAVAILABLE_MESSAGE);
        }
        match err {
            StoreError::NotFound(_) => ApiError::not_found(ACCOUNT_NOT_FOUND),
            StoreError::Conflict(_) => ApiError::conflict(EMAIL_TAKEN),
            StoreError::Database(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {:?}", sqlx_err);
                ApiError::internal_server_error(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let message = rejection.body_text();
        if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            return ApiError::Other { status, message };
        }
        ApiError::invalid_json(message)
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
