// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account creation and password login.
//!
//! Email/password accounts store an argon2 hash under `credentials/{id}`,
//! separate from the profile. Anonymous visitors get a profile only.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{Credentials, LeadStatus, Subscription, User};
use crate::time_utils::now_utc;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Deserialize;
use validator::Validate;

/// Display name given to anonymous visitors.
pub const ANONYMOUS_NAME: &str = "Visitante";

/// Email domain for synthesized anonymous addresses.
const ANONYMOUS_EMAIL_DOMAIN: &str = "anon.com";

/// Signup form.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Nome é obrigatório"))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "Idade é obrigatória"))]
    pub age: u32,
    #[serde(default)]
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "A senha deve ter pelo menos 8 caracteres"))]
    pub password: String,
}

/// Login form.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    pub password: String,
}

impl SignupRequest {
    /// Trimmed name and normalized email; validation runs on this form.
    fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            age: self.age,
            email: normalize_email(&self.email),
            password: self.password.clone(),
        }
    }
}

impl LoginRequest {
    fn normalized(&self) -> Self {
        Self {
            email: normalize_email(&self.email),
            password: self.password.clone(),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_in_use() -> AppError {
    AppError::Conflict("Este email já está em uso.".to_string())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Account operations.
#[derive(Clone)]
pub struct AccountService {
    db: FirestoreDb,
}

impl AccountService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Register an email/password account.
    ///
    /// Claims the email first, so concurrent signups for one address cannot
    /// both succeed. Then creates the profile, an inactive placeholder
    /// subscription linked to it, and the credentials.
    pub async fn signup(&self, req: &SignupRequest) -> Result<User> {
        let req = req.normalized();
        req.validate()?;

        // Accounts created before the email index existed have no claim
        if self.db.find_user_by_email(&req.email).await?.is_some() {
            return Err(email_in_use());
        }

        let user_id = FirestoreDb::new_document_id();
        self.db
            .claim_email(&req.email, &user_id)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => email_in_use(),
                other => other,
            })?;

        let now = now_utc();
        let subscription_id = FirestoreDb::new_document_id();

        let user = User {
            id: user_id.clone(),
            name: req.name,
            email: req.email,
            age: Some(req.age),
            status: LeadStatus::NotPaid,
            subscription_id: Some(subscription_id.clone()),
            plan: None,
            end_date: None,
            created_at: now,
            last_active: now,
            has_clicked_subscription: false,
            is_anonymous: false,
        };

        self.db.upsert_user(&user).await?;
        self.db
            .set_subscription(&Subscription::placeholder(subscription_id, user_id.clone()))
            .await?;
        self.db
            .set_credentials(&Credentials {
                user_id,
                password_hash: hash_password(&req.password)?,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, req: &LoginRequest) -> Result<User> {
        let req = req.normalized();
        req.validate()?;

        let user = self
            .db
            .find_user_by_email(&req.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let credentials = self
            .db
            .get_credentials(&user.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&req.password, &credentials.password_hash) {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "Login successful");
        Ok(user)
    }

    /// Create a lead for a visitor who has not signed up.
    pub async fn create_anonymous(&self) -> Result<User> {
        let now = now_utc();
        let id = FirestoreDb::new_document_id();
        let user = User {
            email: format!("{}@{}", id, ANONYMOUS_EMAIL_DOMAIN),
            id,
            name: ANONYMOUS_NAME.to_string(),
            age: None,
            status: LeadStatus::NotPaid,
            subscription_id: None,
            plan: None,
            end_date: None,
            created_at: now,
            last_active: now,
            has_clicked_subscription: false,
            is_anonymous: true,
        };

        self.db.upsert_user(&user).await?;
        tracing::info!(user_id = %user.id, "Anonymous visitor registered");
        Ok(user)
    }
}
