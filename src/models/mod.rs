// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod access_log;
pub mod catalog;
pub mod stats;
pub mod subscription;
pub mod user;

pub use access_log::AccessLog;
pub use stats::DashboardStats;
pub use subscription::{PlanTier, Subscription, SubscriptionStatus};
pub use user::{Credentials, EmailClaim, LeadStatus, User, UserPatch};
