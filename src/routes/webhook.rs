// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook route for payment gateway events.

use crate::error::{AppError, Result};
use crate::models::PlanTier;
use crate::services::billing::{verify_signature, PaymentEvent, PaymentOutcome};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Header carrying the hex HMAC-SHA256 of the request body.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/webhook", post(handle_event))
}

/// Acknowledgement sent back to the gateway.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<PlanTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub end_date: Option<DateTime<Utc>>,
}

/// Handle an incoming payment event (POST).
///
/// The body is read raw so the signature covers exactly what was sent.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>> {
    if let Some(secret) = &state.config.webhook_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");

        if !verify_signature(secret, &body, signature) {
            tracing::warn!("Security Alert: Webhook signature mismatch");
            return Err(AppError::Unauthorized);
        }
    }

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Webhook body is not valid JSON");
        AppError::BadRequest("Invalid JSON payload".to_string())
    })?;

    tracing::info!(payload = %payload, "Webhook event received (raw)");

    let event: PaymentEvent = serde_json::from_value(payload).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse webhook event");
        AppError::BadRequest(format!("Malformed payment event: {}", e))
    })?;

    let response = match state.billing.apply_payment_event(&event).await? {
        PaymentOutcome::Ignored => WebhookResponse {
            message: "Event received, no action taken".to_string(),
            subscription_id: None,
            plan_id: None,
            end_date: None,
        },
        PaymentOutcome::Activated(activation) => WebhookResponse {
            message: "Subscription activated".to_string(),
            subscription_id: Some(activation.subscription_id),
            plan_id: Some(activation.plan),
            end_date: Some(activation.end_date),
        },
    };

    Ok(Json(response))
}
