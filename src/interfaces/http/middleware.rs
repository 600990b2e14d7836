//! Bearer authentication middleware
//!
//! Verifies `Authorization: Bearer <token>` through the configured
//! [`IdentityVerifier`] and stores the resulting [`Caller`] in the request
//! extensions. Handlers take it with `Extension<Caller>`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::common::ApiResponse;
use crate::domain::{Caller, IdentityVerifier};

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return unauthorized("Missing authentication token");
    };

    let Some(token) = extract_token(auth_header) else {
        return unauthorized("Expected a Bearer token");
    };

    match auth.verifier.verify(token) {
        Ok(caller) => {
            tracing::debug!(user_id = %caller.id, role = %caller.role, "Authenticated");
            request.extensions_mut().insert::<Caller>(caller);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Rejected credential: {}", e);
            unauthorized("Invalid authentication token")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}
