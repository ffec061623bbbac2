// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin dashboard routes (API key required).

use crate::error::{AppError, Result};
use crate::models::catalog::{self, MediaItem};
use crate::models::{AccessLog, DashboardStats, LeadStatus, PlanTier};
use crate::time_utils::{day_bounds, parse_day};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEFAULT_ACCESS_LOG_LIMIT: u32 = 100;
const MAX_ACCESS_LOG_LIMIT: u32 = 500;

/// Admin routes. The admin key middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/stats", get(get_stats))
        .route("/admin/leads", get(get_leads))
        .route("/admin/access-logs", get(get_access_logs))
        .route("/admin/content", get(get_content))
}

#[derive(Deserialize)]
struct DateQuery {
    /// Day filter (YYYY-MM-DD)
    date: Option<String>,
}

impl DateQuery {
    fn day(&self) -> Result<Option<NaiveDate>> {
        match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            None => Ok(None),
            Some(raw) => parse_day(raw).map(Some).ok_or_else(|| {
                AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
            }),
        }
    }
}

// ─── Stats ───────────────────────────────────────────────────

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DashboardStats>> {
    let now = Utc::now();
    let day = query.day()?.unwrap_or_else(|| now.date_naive());

    let users = state.db.list_users().await?;
    let site_accesses = state.db.count_access_logs().await?;

    let stats = DashboardStats::compute(
        &users,
        u32::try_from(site_accesses).unwrap_or(u32::MAX),
        day,
        now,
    );

    tracing::debug!(
        total_leads = stats.total_leads,
        leads_paid = stats.leads_paid,
        date = %day,
        "Computed dashboard stats"
    );

    Ok(Json(stats))
}

// ─── Leads ───────────────────────────────────────────────────

/// One row of the leads table.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct LeadRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub status: LeadStatus,
    pub plan: Option<PlanTier>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub last_active: DateTime<Utc>,
    pub online: bool,
    pub has_clicked_subscription: bool,
    pub is_anonymous: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeadsResponse {
    pub leads: Vec<LeadRow>,
    pub total: usize,
}

/// All leads, newest first, optionally only those created on `date`.
async fn get_leads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<LeadsResponse>> {
    let bounds = query.day()?.map(day_bounds);
    let now = Utc::now();

    let leads: Vec<LeadRow> = state
        .db
        .list_users()
        .await?
        .into_iter()
        .filter(|user| match bounds {
            Some((start, end)) => user.created_between(start, end),
            None => true,
        })
        .map(|user| LeadRow {
            online: user.is_online(now),
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
            status: user.status,
            plan: user.plan,
            created_at: user.created_at,
            last_active: user.last_active,
            has_clicked_subscription: user.has_clicked_subscription,
            is_anonymous: user.is_anonymous,
        })
        .collect();

    Ok(Json(LeadsResponse {
        total: leads.len(),
        leads,
    }))
}

// ─── Access Logs ─────────────────────────────────────────────

#[derive(Deserialize)]
struct AccessLogQuery {
    limit: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogsResponse {
    pub logs: Vec<AccessLog>,
    pub total: usize,
}

/// Most recent access logs.
async fn get_access_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AccessLogQuery>,
) -> Result<Json<AccessLogsResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_ACCESS_LOG_LIMIT)
        .clamp(1, MAX_ACCESS_LOG_LIMIT);

    let logs = state.db.list_access_logs(Some(limit)).await?;
    let total = state.db.count_access_logs().await?;

    Ok(Json(AccessLogsResponse { logs, total }))
}

// ─── Content ─────────────────────────────────────────────────

/// The full media catalog, never gated.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AdminContentResponse {
    pub photos: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    pub photo_count: usize,
    pub video_count: usize,
}

async fn get_content() -> Json<AdminContentResponse> {
    Json(AdminContentResponse {
        photos: catalog::photos(),
        videos: catalog::videos(),
        photo_count: catalog::photo_count(),
        video_count: catalog::video_count(),
    })
}
