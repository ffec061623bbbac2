// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Subscription billing record and plan tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a subscription currently unlocks content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Inactive,
    Active,
}

/// Plan tier recorded on a confirmed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    /// One month
    Starter,
    /// Three months (quarterly)
    Professional,
    /// Six months
    Enterprise,
}

/// A plan resolved from a checkout item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanTerm {
    pub tier: PlanTier,
    /// Paid period length; zero for item names we do not recognize
    pub months: u32,
}

impl PlanTerm {
    /// Map a checkout item name (e.g. "Assinatura 3 meses") to a plan.
    ///
    /// Matching is a case-insensitive substring search. Unrecognized names
    /// fall back to a starter plan with no paid period.
    pub fn from_item_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let (tier, months) = if ["1 mês", "1 mes", "30 dias"]
            .iter()
            .any(|needle| name.contains(needle))
        {
            (PlanTier::Starter, 1)
        } else if name.contains("3 meses") {
            (PlanTier::Professional, 3)
        } else if name.contains("6 meses") {
            (PlanTier::Enterprise, 6)
        } else {
            (PlanTier::Starter, 0)
        };
        Self { tier, months }
    }

    pub fn is_recognized(&self) -> bool {
        self.months > 0
    }
}

/// Subscription document (`subscriptions/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Document ID (also stored on the user as `subscriptionId`)
    pub id: String,
    /// Owning user document ID
    pub user_id: String,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub plan_id: Option<PlanTier>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Inactive placeholder created at signup.
    pub fn placeholder(id: String, user_id: String) -> Self {
        Self {
            id,
            user_id,
            status: SubscriptionStatus::Inactive,
            plan_id: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Paywall rule: content is unlocked iff the status is `active`.
    ///
    /// `end_date` is informational; nothing expires a subscription.
    pub fn unlocks_content(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}
