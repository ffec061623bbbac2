// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (leads, anonymous visitors included)
//! - Subscriptions (billing records)
//! - Credentials (password hashes) and the email uniqueness index
//! - Site access logs (append-only)
//!
//! The same API is served by an in-process [`MemoryStore`] for tests and
//! local runs without GCP credentials.

use crate::config::{Config, StorageBackend};
use crate::db::collections;
use crate::db::memory::MemoryStore;
use crate::error::AppError;
use crate::models::{AccessLog, Credentials, EmailClaim, Subscription, User, UserPatch};
use firestore::errors::FirestoreError;
use firestore::FirestoreWritePrecondition;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// Credentials come from `service_account_json` when given, otherwise
    /// from Application Default Credentials. For local development with the
    /// emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, service_account_json: Option<&str>) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = match service_account_json {
            Some(json) => {
                let options = firestore::FirestoreDbOptions::new(project_id.to_string());
                firestore::FirestoreDb::with_options_token_source(
                    options,
                    gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
                    gcloud_sdk::TokenSourceType::Json(json.to_string()),
                )
                .await
            }
            None => firestore::FirestoreDb::new(project_id).await,
        }
        .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(
            project = project_id,
            service_account = service_account_json.is_some(),
            "Connected to Firestore"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-process database (tests, local runs). Starts empty.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    /// Connect to the backend selected in configuration.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data will not survive a restart");
                Ok(Self::new_in_memory())
            }
            StorageBackend::Firestore => {
                Self::new(
                    &config.gcp_project_id,
                    config.firebase_service_account.as_deref(),
                )
                .await
            }
        }
    }

    /// Generate a fresh document ID.
    pub fn new_document_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    // ─── Generic Document Operations ─────────────────────────────

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collection)
                .obj()
                .one(id)
                .await
                .map_err(db_error),
            Backend::Memory(store) => store
                .get(collection, id)
                .map(from_json)
                .transpose(),
        }
    }

    async fn set_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collection)
                    .document_id(id)
                    .object(doc)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.set(collection, id, to_json(doc)?),
        }
        Ok(())
    }

    /// Write a new document. `Conflict` if the ID is already taken.
    async fn create_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: T = client
                    .fluent()
                    .insert()
                    .into(collection)
                    .document_id(id)
                    .object(doc)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.create(collection, id, to_json(doc)?)?,
        }
        Ok(())
    }

    /// Write only the given top-level fields of an existing document.
    ///
    /// A missing document is `NotFound`; no partial document is created.
    async fn merge_doc(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), AppError> {
        if fields.is_empty() {
            return Ok(());
        }
        match &self.backend {
            Backend::Firestore(client) => {
                let paths: Vec<String> = fields.keys().cloned().collect();
                let doc = Value::Object(fields);
                let _: () = client
                    .fluent()
                    .update()
                    .fields(paths)
                    .in_col(collection)
                    .precondition(FirestoreWritePrecondition::Exists(true))
                    .document_id(id)
                    .object(&doc)
                    .execute()
                    .await
                    .map_err(db_error)?;
            }
            Backend::Memory(store) => store.merge(collection, id, fields)?,
        }
        Ok(())
    }

    async fn find_by_field<T>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: u32,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let value = value.to_string();
                client
                    .fluent()
                    .select()
                    .from(collection)
                    .filter(move |q| q.field(field).eq(value.clone()))
                    .limit(limit)
                    .obj()
                    .query()
                    .await
                    .map_err(db_error)
            }
            Backend::Memory(store) => store
                .find_eq(collection, field, &Value::from(value), limit as usize)
                .into_iter()
                .map(from_json)
                .collect(),
        }
    }

    /// Read a whole collection, optionally ordered (`(field, descending)`) and limited.
    ///
    /// Documents that do not parse as `T` are logged and skipped, so one bad
    /// document cannot take down a listing.
    async fn list_docs<T>(
        &self,
        collection: &str,
        order_by: Option<(&str, bool)>,
        limit: Option<u32>,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let mut query = client.fluent().select().from(collection);
                if let Some((field, descending)) = order_by {
                    let direction = if descending {
                        firestore::FirestoreQueryDirection::Descending
                    } else {
                        firestore::FirestoreQueryDirection::Ascending
                    };
                    query = query.order_by([(field, direction)]);
                }
                if let Some(limit) = limit {
                    query = query.limit(limit);
                }
                let docs = query.query().await.map_err(db_error)?;
                Ok(docs
                    .iter()
                    .filter_map(|doc| {
                        let parsed = firestore::FirestoreDb::deserialize_doc_to::<T>(doc)
                            .map_err(|e| e.to_string());
                        keep_well_formed(collection, &doc.name, parsed)
                    })
                    .collect())
            }
            Backend::Memory(store) => Ok(store
                .list(collection, order_by, limit.map(|l| l as usize))
                .into_iter()
                .filter_map(|doc| {
                    let id = doc.get("id").and_then(Value::as_str).unwrap_or("?").to_string();
                    let parsed = serde_json::from_value(doc).map_err(|e| e.to_string());
                    keep_well_formed(collection, &id, parsed)
                })
                .collect()),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by document ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, user_id).await
    }

    /// Find the first user registered with an email address.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let mut users: Vec<User> = self
            .find_by_field(collections::USERS, "email", email, 1)
            .await?;
        Ok(users.pop())
    }

    /// Create or replace a user document.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.id, user).await
    }

    /// Apply a partial update to a user document.
    pub async fn update_user(&self, user_id: &str, patch: &UserPatch) -> Result<(), AppError> {
        let fields = match to_json(patch)? {
            Value::Object(fields) => fields,
            _ => return Err(AppError::Database("User patch is not an object".to_string())),
        };
        self.merge_doc(collections::USERS, user_id, fields).await
    }

    /// Snapshot of every user (admin views).
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.list_docs(collections::USERS, Some(("createdAt", true)), None)
            .await
    }

    // ─── Subscription Operations ─────────────────────────────────

    pub async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        self.get_doc(collections::SUBSCRIPTIONS, subscription_id)
            .await
    }

    /// Create or replace a subscription document.
    pub async fn set_subscription(&self, subscription: &Subscription) -> Result<(), AppError> {
        self.set_doc(collections::SUBSCRIPTIONS, &subscription.id, subscription)
            .await
    }

    // ─── Credential Operations ───────────────────────────────────

    pub async fn get_credentials(&self, user_id: &str) -> Result<Option<Credentials>, AppError> {
        self.get_doc(collections::CREDENTIALS, user_id).await
    }

    pub async fn set_credentials(&self, credentials: &Credentials) -> Result<(), AppError> {
        self.set_doc(collections::CREDENTIALS, &credentials.user_id, credentials)
            .await
    }

    /// Reserve a normalized email for a user. `Conflict` if already taken.
    ///
    /// The claim is keyed by a hash of the address, since emails may contain
    /// characters that are not valid in document IDs.
    pub async fn claim_email(&self, email: &str, user_id: &str) -> Result<(), AppError> {
        let claim = EmailClaim {
            user_id: user_id.to_string(),
        };
        self.create_doc(collections::EMAILS, &email_key(email), &claim)
            .await
    }

    // ─── Access Log Operations ───────────────────────────────────

    /// Append a page access record.
    pub async fn append_access_log(&self, log: &AccessLog) -> Result<(), AppError> {
        self.set_doc(collections::ACCESS_LOGS, &log.id, log).await
    }

    /// Access logs, newest first.
    pub async fn list_access_logs(&self, limit: Option<u32>) -> Result<Vec<AccessLog>, AppError> {
        self.list_docs(collections::ACCESS_LOGS, Some(("accessTime", true)), limit)
            .await
    }

    /// Size of the access-log collection.
    pub async fn count_access_logs(&self) -> Result<usize, AppError> {
        match &self.backend {
            Backend::Memory(store) => Ok(store.count(collections::ACCESS_LOGS)),
            Backend::Firestore(_) => Ok(self.list_access_logs(None).await?.len()),
        }
    }
}

/// Map store errors: missing documents and taken IDs keep their meaning.
fn db_error(e: FirestoreError) -> AppError {
    match e {
        FirestoreError::DataNotFoundError(e) => AppError::NotFound(e.to_string()),
        FirestoreError::DataConflictError(e) => AppError::Conflict(e.to_string()),
        other => AppError::Database(other.to_string()),
    }
}

fn keep_well_formed<T>(collection: &str, id: &str, parsed: Result<T, String>) -> Option<T> {
    match parsed {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::warn!(collection, document = id, error = %e, "Skipping malformed document");
            None
        }
    }
}

fn email_key(email: &str) -> String {
    hex::encode(Sha256::digest(email.as_bytes()))
}

fn to_json<T: Serialize>(doc: &T) -> Result<Value, AppError> {
    serde_json::to_value(doc).map_err(|e| AppError::Database(format!("Serialization failed: {}", e)))
}

fn from_json<T: DeserializeOwned>(doc: Value) -> Result<T, AppError> {
    serde_json::from_value(doc)
        .map_err(|e| AppError::Database(format!("Malformed document: {}", e)))
}
