//! Admin dashboard statistics.
//!
//! Computed on every request by scanning full snapshots of the `users` and
//! `site_access_logs` collections, so cost is O(users) per call. Fine for the
//! lead volumes a single landing page produces.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{LeadStatus, User};
use crate::time_utils::day_bounds;

/// Funnel counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Day the `leads_on_date` counter refers to
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    pub total_leads: u32,
    pub leads_on_date: u32,
    pub leads_online: u32,
    pub leads_paid: u32,
    pub leads_unpaid: u32,
    /// Paid leads as a percentage of all leads (0 when there are none)
    pub conversion_rate: f64,
    pub site_accesses: u32,
    pub subscription_clicks: u32,
}

impl DashboardStats {
    /// Aggregate a users snapshot.
    ///
    /// `site_accesses` is the size of the access-log collection, counted by
    /// the caller.
    pub fn compute(users: &[User], site_accesses: u32, date: NaiveDate, now: DateTime<Utc>) -> Self {
        let (start, end) = day_bounds(date);
        let mut stats = DashboardStats {
            date,
            site_accesses,
            ..Default::default()
        };

        for user in users {
            stats.total_leads += 1;
            if user.status == LeadStatus::Paid {
                stats.leads_paid += 1;
            }
            if user.created_between(start, end) {
                stats.leads_on_date += 1;
            }
            if user.is_online(now) {
                stats.leads_online += 1;
            }
            if user.has_clicked_subscription {
                stats.subscription_clicks += 1;
            }
        }

        stats.leads_unpaid = stats.total_leads - stats.leads_paid;
        stats.conversion_rate = conversion_rate(stats.leads_paid, stats.total_leads);
        stats
    }
}

/// `paid / total * 100`, guarding the empty case.
pub fn conversion_rate(paid: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(paid) / f64::from(total) * 100.0
    }
}
