// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Funnel tracking routes.

use crate::error::Result;
use crate::middleware::auth::{optional_user, AuthUser};
use crate::models::LeadStatus;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Longest page name stored in an access log.
const MAX_PAGE_LEN: usize = 128;

/// Tracking routes that require a session.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/heartbeat", post(heartbeat))
        .route("/api/track/subscription-click", post(subscription_click))
        .route("/api/payment/pix", post(pix_page_visit))
}

/// Tracking routes open to anyone.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/track/access", post(track_access))
}

/// Result of a best-effort tracking write.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrackResponse {
    pub recorded: bool,
}

async fn heartbeat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<TrackResponse> {
    let recorded = state.tracking.heartbeat(&user.user_id).await;
    Json(TrackResponse { recorded })
}

async fn subscription_click(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<TrackResponse> {
    let recorded = state.tracking.subscription_click(&user.user_id).await;
    Json(TrackResponse { recorded })
}

#[derive(Deserialize)]
pub struct AccessRequest {
    page: String,
}

/// Client IP: first hop of `X-Forwarded-For`, else `X-Real-IP`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|ip| !ip.is_empty())
        })
        .map(str::to_string)
}

/// Log a page view. A session is used when present but not required.
async fn track_access(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(req): Json<AccessRequest>,
) -> (StatusCode, Json<TrackResponse>) {
    let page: String = req.page.trim().chars().take(MAX_PAGE_LEN).collect();
    if page.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(TrackResponse { recorded: false }),
        );
    }

    let user_id = optional_user(&state, &jar, &headers).map(|u| u.user_id);
    let recorded = state
        .tracking
        .record_access(&page, user_id, client_ip(&headers))
        .await;

    (StatusCode::CREATED, Json(TrackResponse { recorded }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PixResponse {
    pub status: LeadStatus,
}

/// The user opened the pix QR-code page.
async fn pix_page_visit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PixResponse>> {
    let status = state.billing.mark_pix_generated(&user.user_id).await?;
    Ok(Json(PixResponse { status }))
}
