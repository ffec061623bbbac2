// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin API key middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Compare a presented key against the configured one without leaking
/// how many leading bytes matched.
fn key_matches(presented: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}

/// Require `Authorization: Bearer <ADMIN_API_KEY>` for `/admin/*` routes.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    if !key_matches(presented.trim(), &state.config.admin_api_key) {
        tracing::warn!(path = %request.uri().path(), "Blocked admin request with invalid key");
        return Err(AppError::Forbidden("Invalid admin key".to_string()));
    }

    Ok(next.run(request).await)
}
