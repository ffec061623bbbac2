// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Payment events, subscription activation and the content paywall.
//!
//! The payment gateway reports transaction status changes to
//! `/api/webhook`. A `paid` transaction:
//! 1. Resolves the customer to a user (document ID, then email)
//! 2. Maps the purchased item to a plan tier and period
//! 3. Links a subscription to the user if none exists yet
//! 4. Activates the subscription, then marks the user as paid

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::subscription::PlanTerm;
use crate::models::{LeadStatus, PlanTier, Subscription, SubscriptionStatus, User, UserPatch};
use crate::time_utils::{add_months, format_utc_rfc3339, now_utc};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Event name the gateway uses for transaction updates.
pub const TRANSACTION_STATUS_CHANGED: &str = "transaction_status_changed";

/// Transaction status that activates a subscription.
pub const STATUS_PAID: &str = "paid";

/// Item name assumed when the payload lists no items.
const UNKNOWN_ITEM: &str = "unknown";

/// Inbound gateway payload. Every field is optional; anything we do not
/// recognize is acknowledged and ignored.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub transaction: Option<Transaction>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub items: Vec<TransactionItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Customer {
    /// Our user document ID, when the checkout link carried it
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionItem {
    #[serde(default)]
    pub name: Option<String>,
}

impl PaymentEvent {
    /// Whether this event confirms a payment.
    pub fn is_paid_transaction(&self) -> bool {
        self.event.as_deref() == Some(TRANSACTION_STATUS_CHANGED)
            && self
                .transaction
                .as_ref()
                .and_then(|t| t.status.as_deref())
                == Some(STATUS_PAID)
    }

    fn customer(&self) -> Option<&Customer> {
        self.transaction.as_ref().and_then(|t| t.customer.as_ref())
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer()
            .and_then(|c| c.id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer()
            .and_then(|c| c.email.as_deref())
            .filter(|email| !email.trim().is_empty())
    }

    /// Name of the first purchased item, or `"unknown"`.
    pub fn item_name(&self) -> &str {
        self.transaction
            .as_ref()
            .and_then(|t| t.items.first())
            .and_then(|item| item.name.as_deref())
            .unwrap_or(UNKNOWN_ITEM)
    }
}

/// Subscription state written for a confirmed payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub user_id: String,
    pub subscription_id: String,
    pub plan: PlanTier,
    pub end_date: DateTime<Utc>,
}

/// Result of applying a payment event.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// Not a paid transaction; nothing written.
    Ignored,
    Activated(Activation),
}

/// Check a hex HMAC-SHA256 signature of a webhook body in constant time.
pub fn verify_signature(secret: &[u8], body: &[u8], signature_hex: &str) -> bool {
    let Ok(provided) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}

/// Hex HMAC-SHA256 of `body`, as the gateway computes it.
pub fn sign_payload(secret: &[u8], body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Subscription billing operations.
#[derive(Clone)]
pub struct BillingService {
    db: FirestoreDb,
}

impl BillingService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Apply a gateway event. Only paid transactions write anything.
    pub async fn apply_payment_event(&self, event: &PaymentEvent) -> Result<PaymentOutcome> {
        if !event.is_paid_transaction() {
            tracing::debug!(event = ?event.event, "Ignoring non-payment event");
            return Ok(PaymentOutcome::Ignored);
        }

        let user = self.resolve_customer(event).await?.ok_or_else(|| {
            AppError::NotFound("No user matches the transaction customer".to_string())
        })?;

        let item_name = event.item_name();
        let term = PlanTerm::from_item_name(item_name);
        if !term.is_recognized() {
            tracing::warn!(
                user_id = %user.id,
                item = %item_name,
                "Unrecognized plan item, activating with no paid period"
            );
        }

        let subscription_id = match &user.subscription_id {
            Some(id) => id.clone(),
            None => self.link_new_subscription(&user.id).await?,
        };

        let start = now_utc();
        let end_date = add_months(start, term.months);

        self.db
            .set_subscription(&Subscription {
                id: subscription_id.clone(),
                user_id: user.id.clone(),
                status: SubscriptionStatus::Active,
                plan_id: Some(term.tier),
                start_date: Some(start),
                end_date: Some(end_date),
            })
            .await?;

        self.db
            .update_user(
                &user.id,
                &UserPatch {
                    status: Some(LeadStatus::Paid),
                    plan: Some(term.tier),
                    end_date: Some(end_date),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(
            user_id = %user.id,
            subscription_id = %subscription_id,
            plan = ?term.tier,
            end_date = %format_utc_rfc3339(end_date),
            "Subscription activated"
        );

        Ok(PaymentOutcome::Activated(Activation {
            user_id: user.id,
            subscription_id,
            plan: term.tier,
            end_date,
        }))
    }

    /// Find the paying user: by document ID first, then by email.
    async fn resolve_customer(&self, event: &PaymentEvent) -> Result<Option<User>> {
        if let Some(id) = event.customer_id() {
            if let Some(user) = self.db.get_user(id).await? {
                return Ok(Some(user));
            }
            tracing::debug!(customer_id = %id, "Customer ID matches no user, trying email");
        }

        match event.customer_email() {
            Some(email) => {
                self.db
                    .find_user_by_email(&email.trim().to_lowercase())
                    .await
            }
            None => Ok(None),
        }
    }

    /// Mint a subscription ID and store it on the user right away.
    async fn link_new_subscription(&self, user_id: &str) -> Result<String> {
        let subscription_id = FirestoreDb::new_document_id();
        self.db
            .update_user(
                user_id,
                &UserPatch {
                    subscription_id: Some(subscription_id.clone()),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(user_id, subscription_id = %subscription_id, "Linked new subscription");
        Ok(subscription_id)
    }

    /// Paywall check: the user's linked subscription is active.
    pub async fn is_subscribed(&self, user_id: &str) -> Result<bool> {
        match self.db.get_user(user_id).await? {
            Some(user) => self.has_active_subscription(&user).await,
            None => Ok(false),
        }
    }

    /// Paywall check for an already-loaded user.
    pub async fn has_active_subscription(&self, user: &User) -> Result<bool> {
        let Some(subscription_id) = user.subscription_id.as_deref() else {
            return Ok(false);
        };
        Ok(self
            .db
            .get_subscription(subscription_id)
            .await?
            .is_some_and(|sub| sub.unlocks_content()))
    }

    /// Record that the user opened the pix payment page.
    ///
    /// Only moves `not_paid` forward; returns the resulting status.
    pub async fn mark_pix_generated(&self, user_id: &str) -> Result<LeadStatus> {
        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        if user.status != LeadStatus::NotPaid {
            return Ok(user.status);
        }

        self.db
            .update_user(
                user_id,
                &UserPatch {
                    status: Some(LeadStatus::PixGenerated),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(user_id, "Pix payment page opened");
        Ok(LeadStatus::PixGenerated)
    }
}
