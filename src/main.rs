// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ModelMuse API Server
//!
//! Serves sessions, gated content, funnel tracking, the admin dashboard
//! and the payment webhook for the subscription-content site.

use modelmuse::{
    config::Config,
    db::FirestoreDb,
    services::ErrorEmitter,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        backend = ?config.storage_backend,
        "Starting ModelMuse API"
    );

    // Single database handle shared by every service
    let db = FirestoreDb::from_config(&config).await?;

    // Log storage failures reported by best-effort writes
    let error_emitter = ErrorEmitter::new();
    error_emitter.spawn_listener();

    if config.webhook_secret.is_none() {
        tracing::warn!("PAYMENT_WEBHOOK_SECRET not set; webhook signatures are not verified");
    }

    let state = Arc::new(AppState::new(config.clone(), db, error_emitter));

    // Build router
    let app = modelmuse::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("modelmuse=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
