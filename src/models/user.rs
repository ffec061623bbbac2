// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User (lead) model for storage and API.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::PlanTier;

/// How long after the last heartbeat a lead still counts as online.
pub const ONLINE_WINDOW_SECS: i64 = 5 * 60;

/// Where a lead is in the payment funnel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    NotPaid,
    /// Opened the pix QR-code page but no payment confirmed yet
    PixGenerated,
    Paid,
}

/// User profile stored in Firestore (`users/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Document ID
    pub id: String,
    /// Display name ("Visitante" for anonymous visitors)
    pub name: String,
    /// Email address (`{id}@anon.com` for anonymous visitors)
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub status: LeadStatus,
    /// Linked subscription document ID
    #[serde(default, deserialize_with = "legacy_null_id")]
    pub subscription_id: Option<String>,
    /// Plan tier of the last confirmed payment
    #[serde(default)]
    pub plan: Option<PlanTier>,
    /// End of the paid period (mirrors the subscription)
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    #[serde(default)]
    pub has_clicked_subscription: bool,
    #[serde(default)]
    pub is_anonymous: bool,
}

impl User {
    /// Online heuristic: a heartbeat within the last five minutes.
    pub fn is_online(&self, now: DateTime<Utc>) -> bool {
        now - self.last_active < TimeDelta::seconds(ONLINE_WINDOW_SECS)
    }

    /// Whether the user was created within `[start, end]`.
    pub fn created_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.created_at >= start && self.created_at <= end
    }
}

/// Older documents store the string `"null"` instead of omitting the link.
fn legacy_null_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.is_empty() && id != "null"))
}

/// Partial update of a user document. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_clicked_subscription: Option<bool>,
}

/// Password credentials (`credentials/{user_id}`), kept apart from the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_id: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// Email uniqueness index entry (`emails/{sha256(email)}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailClaim {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn user_json(subscription_id: serde_json::Value) -> serde_json::Value {
        json!({
            "id": "u1",
            "name": "Visitante",
            "email": "u1@anon.com",
            "subscriptionId": subscription_id,
            "status": "not_paid",
            "createdAt": "2025-05-01T10:00:00Z",
            "lastActive": "2025-05-01T10:00:00Z",
            "hasClickedSubscription": false
        })
    }

    #[test]
    fn test_legacy_null_subscription_id() {
        let user: User = serde_json::from_value(user_json(json!("null"))).unwrap();
        assert_eq!(user.subscription_id, None);

        let user: User = serde_json::from_value(user_json(json!(null))).unwrap();
        assert_eq!(user.subscription_id, None);

        let user: User = serde_json::from_value(user_json(json!("sub_1"))).unwrap();
        assert_eq!(user.subscription_id.as_deref(), Some("sub_1"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let user: User = serde_json::from_value(json!({
            "id": "u2",
            "name": "Ana",
            "email": "ana@example.com",
            "createdAt": "2025-05-01T10:00:00Z",
            "lastActive": "2025-05-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.status, LeadStatus::NotPaid);
        assert_eq!(user.subscription_id, None);
        assert!(!user.has_clicked_subscription);
        assert!(!user.is_anonymous);
    }

    #[test]
    fn test_online_window() {
        let user: User = serde_json::from_value(user_json(json!(null))).unwrap();
        let last = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();

        assert!(user.is_online(last + TimeDelta::minutes(4) + TimeDelta::seconds(59)));
        assert!(!user.is_online(last + TimeDelta::minutes(5)));
        assert!(!user.is_online(last + TimeDelta::hours(1)));
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = UserPatch {
            status: Some(LeadStatus::PixGenerated),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"status": "pix_generated"})
        );
    }
}
