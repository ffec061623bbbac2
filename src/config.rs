// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Secrets are injected as environment variables by the hosting platform
//! and read once at startup.

use serde::{Deserialize, Serialize};
use std::env;

/// Which document store backs the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Google Cloud Firestore (or its emulator).
    Firestore,
    /// In-process store; data is lost on restart.
    Memory,
}

/// Public Firebase web-client configuration served to the frontend.
///
/// Every field is optional at load time; `/api/firebase-config` refuses to
/// serve a config without `apiKey` and `projectId`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseClientConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl FirebaseClientConfig {
    /// Whether the minimum fields a web client needs are present.
    pub fn is_complete(&self) -> bool {
        self.api_key.is_some() && self.project_id.is_some()
    }
}

/// Checkout links for each plan, handed out by the payment gateway.
#[derive(Debug, Clone, Default)]
pub struct PaymentLinks {
    pub monthly: Option<String>,
    pub quarterly: Option<String>,
    pub annual: Option<String>,
    pub lifetime: Option<String>,
}

/// The subset of a Google service-account key we read.
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    project_id: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL (CORS origin)
    pub frontend_url: String,
    /// GCP project hosting Firestore
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Document store selection
    pub storage_backend: StorageBackend,
    /// Firebase web-client config
    pub firebase_client: FirebaseClientConfig,
    /// Plan checkout links
    pub payment_links: PaymentLinks,

    // --- Secrets ---
    /// Service account JSON for Firestore (falls back to ADC when absent)
    pub firebase_service_account: Option<String>,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Bearer key for the admin endpoints
    pub admin_api_key: String,
    /// HMAC secret the payment gateway signs webhooks with
    pub webhook_secret: Option<Vec<u8>>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:9002".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Memory,
            firebase_client: FirebaseClientConfig {
                api_key: Some("test-api-key".to_string()),
                auth_domain: Some("test-project.firebaseapp.com".to_string()),
                project_id: Some("test-project".to_string()),
                storage_bucket: Some("test-project.appspot.com".to_string()),
                messaging_sender_id: Some("1234567890".to_string()),
                app_id: Some("1:1234567890:web:abcdef".to_string()),
            },
            payment_links: PaymentLinks {
                monthly: Some("https://pay.example.com/monthly".to_string()),
                quarterly: Some("https://pay.example.com/quarterly".to_string()),
                annual: Some("https://pay.example.com/annual".to_string()),
                lifetime: Some("https://pay.example.com/lifetime".to_string()),
            },
            firebase_service_account: None,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            admin_api_key: "test_admin_key".to_string(),
            webhook_secret: None,
        }
    }

    /// Whether session cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        // FIREBASE_X first, then the NEXT_PUBLIC_ variant used by older deployments.
        let firebase = |name: &str| {
            get(&format!("FIREBASE_{}", name))
                .or_else(|| get(&format!("NEXT_PUBLIC_FIREBASE_{}", name)))
        };

        let firebase_service_account = get("FIREBASE_SERVICE_ACCOUNT");
        let service_account_project = match &firebase_service_account {
            Some(raw) => Some(
                serde_json::from_str::<ServiceAccountKey>(raw)
                    .map_err(|e| ConfigError::Invalid("FIREBASE_SERVICE_ACCOUNT", e.to_string()))?
                    .project_id,
            ),
            None => None,
        };

        let firebase_client = FirebaseClientConfig {
            api_key: firebase("API_KEY"),
            auth_domain: firebase("AUTH_DOMAIN"),
            project_id: firebase("PROJECT_ID"),
            storage_bucket: firebase("STORAGE_BUCKET"),
            messaging_sender_id: firebase("MESSAGING_SENDER_ID"),
            app_id: firebase("APP_ID"),
        };

        let gcp_project_id = firebase_client
            .project_id
            .clone()
            .or_else(|| get("GCP_PROJECT_ID"))
            .or(service_account_project)
            .unwrap_or_else(|| "local-dev".to_string());

        let storage_backend = match get("STORAGE_BACKEND").as_deref() {
            None | Some("firestore") => StorageBackend::Firestore,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid(
                    "STORAGE_BACKEND",
                    format!("unknown backend '{}'", other),
                ))
            }
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", format!("'{}' is not a port", raw)))?,
            None => 8080,
        };

        Ok(Self {
            frontend_url: get("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:9002".to_string()),
            gcp_project_id,
            port,
            storage_backend,
            firebase_client,
            payment_links: PaymentLinks {
                monthly: get("PAYMENT_MONTHLY"),
                quarterly: get("PAYMENT_QUARTERLY"),
                annual: get("PAYMENT_ANNUAL"),
                lifetime: get("PAYMENT_LIFETIME"),
            },
            firebase_service_account,
            jwt_signing_key: get("JWT_SIGNING_KEY")
                .ok_or(ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            admin_api_key: get("ADMIN_API_KEY").ok_or(ConfigError::Missing("ADMIN_API_KEY"))?,
            webhook_secret: get("PAYMENT_WEBHOOK_SECRET").map(String::into_bytes),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!"),
        ("ADMIN_API_KEY", "admin"),
    ];

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).expect("Config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.gcp_project_id, "local-dev");
        assert_eq!(config.storage_backend, StorageBackend::Firestore);
        assert_eq!(config.admin_api_key, "admin");
        assert!(config.webhook_secret.is_none());
        assert!(!config.firebase_client.is_complete());
    }

    #[test]
    fn test_config_missing_jwt_key() {
        let err = Config::from_lookup(lookup_from(&[("ADMIN_API_KEY", "admin")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SIGNING_KEY")));
    }

    #[test]
    fn test_firebase_client_prefers_server_names() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("FIREBASE_API_KEY", "server-key"));
        pairs.push(("NEXT_PUBLIC_FIREBASE_API_KEY", "public-key"));
        pairs.push(("NEXT_PUBLIC_FIREBASE_PROJECT_ID", "studio-123"));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.firebase_client.api_key.as_deref(), Some("server-key"));
        assert_eq!(
            config.firebase_client.project_id.as_deref(),
            Some("studio-123")
        );
        assert!(config.firebase_client.is_complete());
        assert_eq!(config.gcp_project_id, "studio-123");
    }

    #[test]
    fn test_service_account_project_fallback() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((
            "FIREBASE_SERVICE_ACCOUNT",
            r#"{"type":"service_account","project_id":"sa-project","client_email":"x@y"}"#,
        ));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.gcp_project_id, "sa-project");
        assert!(config.firebase_service_account.is_some());
    }

    #[test]
    fn test_invalid_service_account_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("FIREBASE_SERVICE_ACCOUNT", "not json"));

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("FIREBASE_SERVICE_ACCOUNT", _)));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PAYMENT_MONTHLY", "   "));
        pairs.push(("PAYMENT_QUARTERLY", "https://pay.example.com/q"));
        pairs.push(("STORAGE_BACKEND", "memory"));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.payment_links.monthly.is_none());
        assert_eq!(
            config.payment_links.quarterly.as_deref(),
            Some("https://pay.example.com/q")
        );
        assert_eq!(config.storage_backend, StorageBackend::Memory);
    }
}
