// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration, credential login, GitHub account linking and
//! display preferences.

use std::sync::OnceLock;

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{AuthProvider, Preferences, PreferencesUpdate, User};
use crate::time_utils::now_rfc3339;

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

impl RegisterRequest {
    /// Normalize and validate. Returns (name, lowercased email, password).
    pub fn normalized(self) -> Result<(String, String, String)> {
        let request = RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
        };

        if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "Name, email, and password are required".to_string(),
            ));
        }
        request
            .validate()
            .map_err(|e| AppError::from_validation(&e))?;
        if !email_regex().is_match(&request.email) {
            return Err(AppError::BadRequest(
                "Please enter a valid email address".to_string(),
            ));
        }

        Ok((request.name, request.email, request.password))
    }
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Profile fields reported by an OAuth provider.
#[derive(Debug, Clone)]
pub struct OAuthIdentity {
    pub provider_id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Run Argon2 off the async executor.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Blocking task failed: {}", e)))
}

#[derive(Clone)]
pub struct AccountService {
    db: FirestoreDb,
}

impl AccountService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Register a credentials account.
    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let (name, email, password) = request.normalized()?;

        if self.db.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = blocking(move || hash_password(&password)).await??;
        let now = now_rfc3339();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            password_hash: Some(password_hash),
            provider: AuthProvider::Credentials,
            provider_id: None,
            image: None,
            is_admin: false,
            favorites: vec![],
            preferences: Preferences::default(),
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.create_user(&user).await
    }

    /// Check email and password. Accounts without a password (GitHub-only)
    /// cannot sign in this way.
    pub async fn login(&self, request: LoginRequest) -> Result<User> {
        let email = request.email.trim().to_lowercase();
        if email.is_empty() || request.password.is_empty() {
            return Err(AppError::BadRequest(
                "Email and password are required".to_string(),
            ));
        }

        let user = self
            .db
            .find_user_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)?;
        let hash = user.password_hash.clone().ok_or(AppError::Unauthorized)?;

        let password = request.password;
        let valid = blocking(move || verify_password(&password, &hash)).await?;
        if !valid {
            tracing::info!(user_id = %user.id, "Rejected login with wrong password");
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Find or create the account for a GitHub sign-in.
    ///
    /// An existing account with the same email is linked to GitHub.
    pub async fn upsert_github_user(&self, identity: OAuthIdentity) -> Result<User> {
        let email = identity.email.trim().to_lowercase();

        match self.db.find_user_by_email(&email).await? {
            Some(mut user) => {
                if user.provider != AuthProvider::Github {
                    user.provider = AuthProvider::Github;
                    user.provider_id = Some(identity.provider_id);
                    user.image = identity.image;
                    user.updated_at = now_rfc3339();
                    self.db.upsert_user(&user).await?;
                    tracing::info!(user_id = %user.id, "Linked existing account to GitHub");
                }
                Ok(user)
            }
            None => {
                let now = now_rfc3339();
                let user = User {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: identity.name,
                    email,
                    password_hash: None,
                    provider: AuthProvider::Github,
                    provider_id: Some(identity.provider_id),
                    image: identity.image,
                    is_admin: false,
                    favorites: vec![],
                    preferences: Preferences::default(),
                    created_at: now.clone(),
                    updated_at: now,
                };
                self.db.create_user(&user).await
            }
        }
    }

    pub async fn current_user(&self, session: &AuthUser) -> Result<User> {
        self.db
            .get_user(&session.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Admin check against the stored account rather than the session claim.
    pub async fn require_admin(&self, session: &AuthUser) -> Result<()> {
        match self.db.get_user(&session.user_id).await? {
            Some(user) if user.is_admin => Ok(()),
            Some(_) => {
                tracing::warn!(user_id = %session.user_id, "Admin claim no longer held");
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
            None => Err(AppError::Forbidden("Admin access required".to_string())),
        }
    }

    pub async fn update_preferences(
        &self,
        session: &AuthUser,
        update: PreferencesUpdate,
    ) -> Result<Preferences> {
        let mut user = self.current_user(session).await?;
        user.preferences.apply(update);
        user.updated_at = now_rfc3339();
        self.db.upsert_user(&user).await?;
        Ok(user.preferences)
    }
}
