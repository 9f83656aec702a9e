//! The user provisioning endpoint.

use crate::middleware::IdentityContext;
use crate::AppState;
use afrimed_users::{find_or_create_user, User};
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Response body for successful provisioning.
#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    /// The provisioned (or pre-existing) user row.
    pub user: User,
}

/// API error type mapping to HTTP status codes.
///
/// Store failures keep their detail in the server log only; the caller
/// sees a generic body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized or incomplete user data")]
    Unauthorized,
    #[error("internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized or incomplete user data",
            ),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Handler for `POST /api/users`.
///
/// No request body: the identity middleware has already placed the
/// authenticated identity in the request extensions. Looks the user up by
/// primary email and inserts the row with the starting credit balance on
/// first visit. Idempotent for existing users.
pub async fn provision_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(identity): Extension<IdentityContext>,
) -> Result<Json<ProvisionResponse>, ApiError> {
    let user = tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::Internal(format!("db connection failed: {e}")))?;

        find_or_create_user(&conn, &identity.0)
            .map_err(|e| ApiError::Internal(format!("provisioning failed: {e}")))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("task join error: {e}")))??;

    Ok(Json(ProvisionResponse { user }))
}
