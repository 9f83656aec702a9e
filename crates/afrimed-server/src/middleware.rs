//! Identity extraction middleware.
//!
//! Authentication itself is owned by the hosted identity provider fronting
//! this service; it forwards the authenticated user's primary email and
//! full name as request headers. This middleware turns those headers into
//! an explicit [`Identity`] value in the request extensions, so handlers
//! receive identity as a parameter instead of performing ambient lookups.

use crate::api_users::ApiError;
use afrimed_users::Identity;
use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
};

/// Header carrying the authenticated user's primary email. Required.
pub const AUTH_EMAIL_HEADER: &str = "x-auth-email";

/// Header carrying the authenticated user's full name. Optional.
pub const AUTH_NAME_HEADER: &str = "x-auth-name";

/// Wrapper for [`Identity`] stored in request extensions.
#[derive(Clone, Debug)]
pub struct IdentityContext(pub Identity);

fn header_string(req: &Request<Body>, name: &str) -> Option<String> {
    let value = req.headers().get(name)?.to_str().ok()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Rejects requests with no usable primary email before any store access;
/// otherwise inserts an [`IdentityContext`] for downstream handlers.
pub async fn identity_middleware(
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(email) = header_string(&req, AUTH_EMAIL_HEADER) else {
        return Err(ApiError::Unauthorized);
    };
    let name = header_string(&req, AUTH_NAME_HEADER);

    req.extensions_mut()
        .insert(IdentityContext(Identity::new(email, name)));

    Ok(next.run(req).await)
}
