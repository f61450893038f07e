// Process-wide error boundary: everything the handlers did not answer
// themselves leaves the service as a `{status: "error", message}` envelope.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use std::any::Any;

use crate::error::{ApiError, INTERNAL_ERROR_MESSAGE};

/// Fallback for paths no route matches
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Replace non-JSON error responses (method mismatch, body limits, ...)
/// with the standard envelope, keeping their status code.
pub async fn envelope_bare_errors(response: Response) -> Response {
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        return response;
    }

    let mut enveloped = ApiError::from_status(status).into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        enveloped.headers_mut().insert(header::ALLOW, allow.clone());
    }
    enveloped
}

/// Turn a handler panic into a plain 500; the payload only goes to the log
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("Request handler panicked: {}", detail);

    ApiError::internal_server_error(INTERNAL_ERROR_MESSAGE).into_response()
}
