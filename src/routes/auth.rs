// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session routes: signup, login, anonymous visitors, logout.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::models::{LeadStatus, User};
use crate::services::accounts::{LoginRequest, SignupRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/anonymous", post(anonymous))
        .route("/auth/logout", post(logout))
}

/// Issued session plus the profile it belongs to.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub status: LeadStatus,
    pub is_anonymous: bool,
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

/// Attach a fresh session for `user` to the response.
fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let token = create_jwt(&user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let jar = jar.add(session_cookie(token.clone(), state.config.secure_cookies()));

    Ok((
        jar,
        Json(SessionResponse {
            token,
            user_id: user.id,
            name: user.name,
            email: user.email,
            status: user.status,
            is_anonymous: user.is_anonymous,
        }),
    ))
}

/// Create an email/password account and sign it in.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    let user = state.accounts.signup(&req).await?;
    let (jar, body) = start_session(&state, jar, user)?;
    Ok((StatusCode::CREATED, jar, body))
}

/// Email/password login.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let user = state.accounts.login(&req).await?;
    start_session(&state, jar, user)
}

/// Register an anonymous visitor lead and sign it in.
async fn anonymous(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    let user = state.accounts.create_anonymous().await?;
    let (jar, body) = start_session(&state, jar, user)?;
    Ok((StatusCode::CREATED, jar, body))
}

/// Clear the session cookie. Attributes must match the ones it was set with.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (StatusCode, CookieJar) {
    let removal = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies())
        .max_age(time::Duration::ZERO)
        .build();

    (StatusCode::NO_CONTENT, jar.add(removal))
}
