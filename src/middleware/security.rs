// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Security headers middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Headers set on every response.
const BASELINE_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'none'; frame-ancestors 'none'",
    ),
    (header::REFERRER_POLICY, "no-referrer"),
];

const HSTS: &str = "max-age=31536000; includeSubDomains";

/// Which optional headers apply to this deployment.
#[derive(Debug, Clone, Copy)]
pub struct SecurityPolicy {
    /// Send `Strict-Transport-Security` (HTTPS frontends only)
    pub hsts: bool,
}

impl SecurityPolicy {
    pub fn for_frontend(frontend_url: &str) -> Self {
        Self {
            hsts: frontend_url.starts_with("https://"),
        }
    }
}

/// Add security headers to all responses.
///
/// Responses carry session and lead data, so they default to `no-store`
/// unless the handler chose its own `Cache-Control`.
pub async fn add_security_headers(
    State(policy): State<SecurityPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in BASELINE_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    if policy.hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS),
        );
    }
    headers
        .entry(header::CACHE_CONTROL)
        .or_insert(HeaderValue::from_static("no-store"));

    response
}
