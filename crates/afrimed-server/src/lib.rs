//! AfriMed Assist server library logic.

pub mod api_users;
pub mod api_voice;
pub mod config;
pub mod middleware;

use afrimed_db::DbPool;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use config::VoiceConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Maximum request body size (64 KiB). The API takes no meaningful bodies;
/// this protects against oversized payloads.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Public voice widget configuration.
    pub voice: VoiceConfig,
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load
/// balancers, monitoring, and CI to verify the server is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/users", post(api_users::provision_user_handler))
        .layer(axum::middleware::from_fn(middleware::identity_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/api/voice/config", get(api_voice::voice_config_handler))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use afrimed_db::{create_pool, run_migrations, DbRuntimeSettings};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        // A single pooled connection keeps the in-memory database shared.
        let settings = DbRuntimeSettings {
            pool_max_size: 1,
            ..DbRuntimeSettings::default()
        };
        let pool = create_pool(":memory:", settings).expect("pool should build");
        let conn = pool.get().expect("should get a connection");
        run_migrations(&conn).expect("migrations should succeed");
        drop(conn);

        app(AppState {
            pool,
            voice: VoiceConfig {
                public_api_key: "pk_test".to_string(),
                assistant_id: "assistant-123".to_string(),
            },
        })
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn voice_config_is_public() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/voice/config")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["publicApiKey"], "pk_test");
        assert_eq!(json["assistantId"], "assistant-123");
    }
}
