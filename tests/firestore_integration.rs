// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (`FIRESTORE_EMULATOR_HOST`). Without it they are skipped.

use chrono::{TimeDelta, TimeZone, Utc};
use modelmuse::db::FirestoreDb;
use modelmuse::models::{
    AccessLog, Credentials, LeadStatus, PlanTier, Subscription, SubscriptionStatus, User,
    UserPatch,
};

mod common;
use common::test_db;

/// Helper to create a basic test user with a unique ID and email.
fn test_user() -> User {
    let id = FirestoreDb::new_document_id();
    let now = Utc::now();
    User {
        email: format!("{}@example.com", id),
        id,
        name: "Ana".to_string(),
        age: Some(31),
        status: LeadStatus::NotPaid,
        subscription_id: None,
        plan: None,
        end_date: None,
        created_at: now,
        last_active: now,
        has_clicked_subscription: false,
        is_anonymous: false,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let user = test_user();

    assert!(db.get_user(&user.id).await.unwrap().is_none());

    db.upsert_user(&user).await.unwrap();

    let fetched = db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Ana");
    assert_eq!(fetched.email, user.email);
    assert_eq!(fetched.age, Some(31));
    assert_eq!(fetched.status, LeadStatus::NotPaid);

    let by_email = db.find_user_by_email(&user.email).await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn test_update_user_only_touches_patched_fields() {
    require_emulator!();

    let db = test_db().await;
    let user = test_user();
    db.upsert_user(&user).await.unwrap();

    let end = Utc.with_ymd_and_hms(2025, 8, 15, 12, 0, 0).unwrap();
    db.update_user(
        &user.id,
        &UserPatch {
            status: Some(LeadStatus::Paid),
            plan: Some(PlanTier::Professional),
            end_date: Some(end),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let fetched = db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, LeadStatus::Paid);
    assert_eq!(fetched.plan, Some(PlanTier::Professional));
    assert_eq!(fetched.end_date, Some(end));
    assert_eq!(fetched.name, "Ana");
    assert_eq!(fetched.email, user.email);
}

// ═══════════════════════════════════════════════════════════════════════════
// SUBSCRIPTION AND CREDENTIAL TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_subscription_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let user = test_user();
    let mut subscription = Subscription::placeholder(FirestoreDb::new_document_id(), user.id.clone());
    db.set_subscription(&subscription).await.unwrap();

    let fetched = db.get_subscription(&subscription.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, SubscriptionStatus::Inactive);
    assert!(!fetched.unlocks_content());

    let start = Utc::now();
    subscription.status = SubscriptionStatus::Active;
    subscription.plan_id = Some(PlanTier::Enterprise);
    subscription.start_date = Some(start);
    subscription.end_date = Some(start + TimeDelta::days(180));
    db.set_subscription(&subscription).await.unwrap();

    let fetched = db.get_subscription(&subscription.id).await.unwrap().unwrap();
    assert!(fetched.unlocks_content());
    assert_eq!(fetched.plan_id, Some(PlanTier::Enterprise));
    assert_eq!(fetched.user_id, user.id);
}

#[tokio::test]
async fn test_credentials_roundtrip() {
    require_emulator!();

    let db = test_db().await;
    let user = test_user();
    db.set_credentials(&Credentials {
        user_id: user.id.clone(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
    })
    .await
    .unwrap();

    let fetched = db.get_credentials(&user.id).await.unwrap().unwrap();
    assert!(fetched.password_hash.starts_with("$argon2id$"));
    assert!(db.get_credentials("no-such-user").await.unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// ACCESS LOG TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_access_logs_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let before = db.count_access_logs().await.unwrap();
    let far_future = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();

    for minutes in [0, 2, 1] {
        db.append_access_log(&AccessLog {
            id: FirestoreDb::new_document_id(),
            page: format!("future-{}", minutes),
            user_id: None,
            ip: None,
            access_time: far_future + TimeDelta::minutes(minutes),
        })
        .await
        .unwrap();
    }

    assert_eq!(db.count_access_logs().await.unwrap(), before + 3);

    let logs = db.list_access_logs(Some(2)).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].page, "future-2");
    assert_eq!(logs[1].page, "future-1");
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    require_emulator!();

    let db = test_db().await;
    let id = FirestoreDb::new_document_id();
    let err = db
        .update_user(
            &id,
            &UserPatch {
                last_active: Some(Utc::now()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, modelmuse::error::AppError::NotFound(_)));
    assert!(db.get_user(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_email_claim_conflicts() {
    require_emulator!();

    let db = test_db().await;
    let email = format!("{}@example.com", FirestoreDb::new_document_id());
    db.claim_email(&email, "u1").await.unwrap();

    let err = db.claim_email(&email, "u2").await.unwrap_err();
    assert!(matches!(err, modelmuse::error::AppError::Conflict(_)));
}
