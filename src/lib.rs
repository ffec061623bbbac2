// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! ModelMuse: backend for a subscription-content site
//!
//! This crate provides the HTTP API behind the landing page: visitor and
//! account sessions, the subscription paywall, funnel tracking, the admin
//! dashboard and the payment gateway webhook.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{AccountService, BillingService, ErrorEmitter, TrackingService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub accounts: AccountService,
    pub billing: BillingService,
    pub tracking: TrackingService,
    pub error_emitter: ErrorEmitter,
}

impl AppState {
    /// Wire the services around a single database handle.
    pub fn new(config: Config, db: FirestoreDb, error_emitter: ErrorEmitter) -> Self {
        Self {
            accounts: AccountService::new(db.clone()),
            billing: BillingService::new(db.clone()),
            tracking: TrackingService::new(db.clone(), error_emitter.clone()),
            config,
            db,
            error_emitter,
        }
    }
}
