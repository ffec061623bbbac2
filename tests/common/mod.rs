// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use modelmuse::config::Config;
use modelmuse::db::FirestoreDb;
use modelmuse::models::{LeadStatus, User};
use modelmuse::routes::create_router;
use modelmuse::services::ErrorEmitter;
use modelmuse::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project", None)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app on the in-memory backend.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Same as [`create_test_app`] with a caller-adjusted config.
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        config,
        FirestoreDb::new_in_memory(),
        ErrorEmitter::new(),
    ));
    (create_router(state.clone()), state)
}

/// Store a lead directly, bypassing signup.
#[allow(dead_code)]
pub async fn seed_user(state: &AppState, id: &str, email: &str, subscription_id: Option<&str>) -> User {
    let now = chrono::Utc::now();
    let user = User {
        id: id.to_string(),
        name: "Ana".to_string(),
        email: email.to_string(),
        age: Some(27),
        status: LeadStatus::NotPaid,
        subscription_id: subscription_id.map(str::to_string),
        plan: None,
        end_date: None,
        created_at: now,
        last_active: now,
        has_clicked_subscription: false,
        is_anonymous: false,
    };
    state.db.upsert_user(&user).await.unwrap();
    user
}

/// Session token for a user ID, signed with the test key.
#[allow(dead_code)]
pub fn session_token(state: &AppState, user_id: &str) -> String {
    modelmuse::middleware::auth::create_jwt(user_id, &state.config.jwt_signing_key).unwrap()
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
