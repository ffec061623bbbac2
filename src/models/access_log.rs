// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Site access log entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only page access record (`site_access_logs/{id}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLog {
    pub id: String,
    /// Page name as reported by the client (e.g. "dashboard")
    pub page: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    pub access_time: DateTime<Utc>,
}
