// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes: profile, gated content, plans and client config.

use crate::config::FirebaseClientConfig;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::catalog::{self, MediaItem, PlanCatalog, Profile};
use crate::models::{LeadStatus, PlanTier};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/content", get(get_content))
}

/// Public API routes.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plans", get(get_plans))
        .route("/api/firebase-config", get(get_firebase_config))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: LeadStatus,
    pub plan: Option<PlanTier>,
    pub is_anonymous: bool,
    pub is_subscribed: bool,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let is_subscribed = state.billing.has_active_subscription(&profile).await?;

    Ok(Json(UserResponse {
        id: profile.id,
        name: profile.name,
        email: profile.email,
        status: profile.status,
        plan: profile.plan,
        is_anonymous: profile.is_anonymous,
        is_subscribed,
    }))
}

// ─── Content ─────────────────────────────────────────────────

/// Dashboard content. Photos and videos are `null` until subscribed; the
/// counts are always present so locked tiles can be rendered.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub is_subscribed: bool,
    pub profile: Profile,
    pub plans: PlanCatalog,
    pub previews: Vec<MediaItem>,
    pub photo_count: usize,
    pub video_count: usize,
    pub photos: Option<Vec<MediaItem>>,
    pub videos: Option<Vec<MediaItem>>,
}

async fn get_content(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ContentResponse>> {
    let is_subscribed = state.billing.is_subscribed(&user.user_id).await?;

    tracing::debug!(user_id = %user.user_id, is_subscribed, "Serving content");

    Ok(Json(ContentResponse {
        is_subscribed,
        profile: catalog::profile(),
        plans: catalog::plans(&state.config.payment_links),
        previews: catalog::previews(),
        photo_count: catalog::photo_count(),
        video_count: catalog::video_count(),
        photos: is_subscribed.then(catalog::photos),
        videos: is_subscribed.then(catalog::videos),
    }))
}

// ─── Public ──────────────────────────────────────────────────

async fn get_plans(State(state): State<Arc<AppState>>) -> Json<PlanCatalog> {
    Json(catalog::plans(&state.config.payment_links))
}

/// Firebase web-client config for the frontend.
async fn get_firebase_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FirebaseClientConfig>> {
    let config = &state.config.firebase_client;
    if !config.is_complete() {
        return Err(AppError::Misconfigured(
            "Firebase client config is missing apiKey or projectId".to_string(),
        ));
    }
    Ok(Json(config.clone()))
}
