// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end paywall tests: content stays locked until the payment
//! webhook activates the user's subscription.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use modelmuse::models::catalog;
use modelmuse::models::LeadStatus;
use serde_json::json;
use tower::ServiceExt;

mod common;

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_content_unlocks_after_payment() {
    let (app, _state) = common::create_test_app();

    // Sign up through the API so the placeholder subscription exists
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"name": "Ana", "age": 30, "email": "a@b.com", "password": "password123"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let token = common::body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    // Locked: previews and counts only
    let response = app
        .clone()
        .oneshot(authed("GET", "/api/content", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content = common::body_json(response).await;
    assert_eq!(content["isSubscribed"], false);
    assert!(content["photos"].is_null());
    assert!(content["videos"].is_null());
    assert_eq!(content["photoCount"], catalog::photo_count());
    assert_eq!(content["videoCount"], catalog::video_count());
    assert_eq!(
        content["previews"].as_array().unwrap().len(),
        catalog::previews().len()
    );

    // Gateway confirms a quarterly payment
    let payload = json!({
        "event": "transaction_status_changed",
        "transaction": {
            "status": "paid",
            "customer": {"email": "a@b.com"},
            "items": [{"name": "Assinatura 3 MESES"}]
        }
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Unlocked
    let response = app
        .clone()
        .oneshot(authed("GET", "/api/content", &token))
        .await
        .unwrap();
    let content = common::body_json(response).await;
    assert_eq!(content["isSubscribed"], true);
    assert_eq!(
        content["photos"].as_array().unwrap().len(),
        catalog::photo_count()
    );
    assert_eq!(
        content["videos"].as_array().unwrap().len(),
        catalog::video_count()
    );

    let response = app
        .oneshot(authed("GET", "/api/me", &token))
        .await
        .unwrap();
    let me = common::body_json(response).await;
    assert_eq!(me["isSubscribed"], true);
    assert_eq!(me["status"], "paid");
    assert_eq!(me["plan"], "professional");
}

#[tokio::test]
async fn test_legacy_null_subscription_link_is_locked() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state, "u1", "a@b.com", Some("null")).await;
    let token = common::session_token(&state, "u1");

    let response = app
        .oneshot(authed("GET", "/api/content", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content = common::body_json(response).await;
    assert_eq!(content["isSubscribed"], false);
}

#[tokio::test]
async fn test_pix_visit_never_downgrades_paid() {
    let (app, state) = common::create_test_app();
    common::seed_user(&state, "u1", "a@b.com", None).await;
    let token = common::session_token(&state, "u1");

    let response = app
        .clone()
        .oneshot(authed("POST", "/api/payment/pix", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::body_json(response).await["status"], "pix_generated");

    // Payment lands
    let payload = json!({
        "event": "transaction_status_changed",
        "transaction": {
            "status": "paid",
            "customer": {"id": "u1"},
            "items": [{"name": "1 mês"}]
        }
    });
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhook")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    // Revisiting the pix page keeps the paid status
    let response = app
        .oneshot(authed("POST", "/api/payment/pix", &token))
        .await
        .unwrap();
    assert_eq!(common::body_json(response).await["status"], "paid");

    let user = state.db.get_user("u1").await.unwrap().unwrap();
    assert_eq!(user.status, LeadStatus::Paid);
}

#[tokio::test]
async fn test_plans_carry_configured_payment_links() {
    let (app, _state) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/plans")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let plans = common::body_json(response).await;
    assert_eq!(plans["subscriptions"][0]["id"], "monthly");
    assert_eq!(plans["subscriptions"][0]["price"], "14,90");
    assert_eq!(
        plans["subscriptions"][0]["paymentUrl"],
        "https://pay.example.com/monthly"
    );
    assert_eq!(plans["promotions"].as_array().unwrap().len(), 3);
}
