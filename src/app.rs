use axum::{
    middleware::map_response,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::database::account_store::AccountStore;
use crate::handlers;
use crate::middleware::{envelope_bare_errors, handle_panic, route_not_found};
use crate::services::AccountService;

/// Shared per-request state. Cloning is cheap; the store sits behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
}

impl AppState {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            accounts: AccountService::new(store),
        }
    }
}

/// Build the full router with the error boundary and request logging
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::system::root))
        .route("/health", get(handlers::system::health))
        .merge(account_routes())
        .fallback(route_not_found)
        .with_state(state)
        // Global middleware, innermost first
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(map_response(envelope_bare_errors))
        .layer(TraceLayer::new_for_http());

    if security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn account_routes() -> Router<AppState> {
    use handlers::accounts;

    Router::new()
        .route("/api/accounts", post(accounts::create_post))
        .route(
            "/api/accounts/:id",
            put(accounts::update_put).delete(accounts::delete_account),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryAccountStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::new(Arc::new(MemoryAccountStore::new()));
        app(state, &SecurityConfig { enable_cors: false })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn unknown_route_gets_error_envelope() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/nothing-here")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": "error", "message": "Route not found"}));
    }

    #[tokio::test]
    async fn wrong_method_gets_error_envelope() {
        let (status, body) = send(
            Request::builder()
                .method(Method::GET)
                .uri("/api/accounts")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/accounts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn create_round_trip_in_process() {
        let (status, body) = send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/accounts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "jo@example.com", "firstName": "Jo", "lastName": "Do"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["email"], "jo@example.com");
        assert!(body["data"].get("updatedAt").is_none());
    }

    #[tokio::test]
    async fn health_reports_ok_with_memory_store() {
        let (status, body) = send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["database"], "ok");
    }
}
