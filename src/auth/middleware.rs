//! Authentication middleware.

use super::AuthConfig;
use crate::Error;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Rejects any request without the configured bearer token.
///
/// Runs before routing, so unknown paths are also answered with 401.
pub async fn auth_middleware(
    State(auth_config): State<Arc<AuthConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = extract_bearer_token(&request)
        .map(|token| auth_config.authorizes(token))
        .unwrap_or(false);

    if !authorized {
        tracing::error!("Unauthorized request to path: {}", request.uri().path());
        return Error::Unauthorized.into_response();
    }

    next.run(request).await
}

/// Extract Bearer token from Authorization header.
///
/// The scheme name is matched case-insensitively.
fn extract_bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    scheme.eq_ignore_ascii_case("Bearer").then_some(token)
}
