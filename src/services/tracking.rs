// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Visitor activity tracking.
//!
//! These writes are best-effort: a failure is published to the
//! [`ErrorEmitter`] and the caller carries on.

use crate::db::{collections, FirestoreDb};
use crate::error::AppError;
use crate::models::{AccessLog, UserPatch};
use crate::services::error_events::{ErrorEmitter, Operation, PermissionError};
use crate::time_utils::now_utc;

/// Funnel tracking writes.
#[derive(Clone)]
pub struct TrackingService {
    db: FirestoreDb,
    errors: ErrorEmitter,
}

impl TrackingService {
    pub fn new(db: FirestoreDb, errors: ErrorEmitter) -> Self {
        Self { db, errors }
    }

    /// Refresh `lastActive` (drives the online indicator).
    pub async fn heartbeat(&self, user_id: &str) -> bool {
        let patch = UserPatch {
            last_active: Some(now_utc()),
            ..Default::default()
        };
        self.update_user(user_id, patch).await
    }

    /// Remember that the user clicked a subscribe button.
    pub async fn subscription_click(&self, user_id: &str) -> bool {
        let patch = UserPatch {
            has_clicked_subscription: Some(true),
            ..Default::default()
        };
        self.update_user(user_id, patch).await
    }

    /// Append a page access record.
    pub async fn record_access(
        &self,
        page: &str,
        user_id: Option<String>,
        ip: Option<String>,
    ) -> bool {
        let log = AccessLog {
            id: FirestoreDb::new_document_id(),
            page: page.to_string(),
            user_id,
            ip,
            access_time: now_utc(),
        };

        match self.db.append_access_log(&log).await {
            Ok(()) => true,
            Err(e) => {
                self.report(collections::ACCESS_LOGS.to_string(), Operation::Create, &log, e);
                false
            }
        }
    }

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> bool {
        match self.db.update_user(user_id, &patch).await {
            Ok(()) => true,
            Err(e) => {
                let path = format!("{}/{}", collections::USERS, user_id);
                self.report(path, Operation::Update, &patch, e);
                false
            }
        }
    }

    fn report<T: serde::Serialize>(&self, path: String, operation: Operation, data: &T, err: AppError) {
        self.errors.emit(PermissionError {
            path,
            operation,
            request_resource_data: serde_json::to_value(data).ok(),
            message: err.to_string(),
        });
    }
}
