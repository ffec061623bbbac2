// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod billing;
pub mod error_events;
pub mod tracking;

pub use accounts::AccountService;
pub use billing::{BillingService, PaymentEvent, PaymentOutcome};
pub use error_events::ErrorEmitter;
pub use tracking::TrackingService;
