// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Quotes (one document per calendar day)
//! - Users (profile, favorites and preferences)
//! - User emails (uniqueness index for registration)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Quote, User};
use crate::time_utils::now_rfc3339;
use firestore::errors::FirestoreError;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Filters that Firestore can evaluate server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteSelection {
    /// Inclusive date range; an exact date is a range of one day.
    pub date_range: Option<(String, String)>,
    /// Exact category match
    pub category: Option<String>,
}

/// Document in the email uniqueness index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailIndexEntry {
    user_id: String,
}

/// Map a write error, turning "already exists" into a conflict.
fn map_write_error(err: FirestoreError, conflict_message: &str) -> AppError {
    match err {
        FirestoreError::DataConflictError(_) => AppError::Conflict(conflict_message.to_string()),
        other => AppError::Database(other.to_string()),
    }
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any token; skip credential discovery entirely.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

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
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Quote Operations ────────────────────────────────────────

    /// Get the quote for a calendar day.
    pub async fn get_quote(&self, date: &str) -> Result<Option<Quote>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::QUOTES)
            .obj()
            .one(date)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch quotes matching the server-side filters.
    pub async fn find_quotes(&self, selection: &QuoteSelection) -> Result<Vec<Quote>, AppError> {
        let date_range = selection.date_range.clone();
        let category = selection.category.clone();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::QUOTES)
            .filter(move |q| {
                q.for_all([
                    date_range
                        .as_ref()
                        .and_then(|(start, _)| q.field("date").greater_than_or_equal(start.clone())),
                    date_range
                        .as_ref()
                        .and_then(|(_, end)| q.field("date").less_than_or_equal(end.clone())),
                    category
                        .as_ref()
                        .and_then(|c| q.field("category").eq(c.clone())),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get quotes for a set of dates, skipping dates with no quote.
    ///
    /// Reads run concurrently with a cap to avoid overloading Firestore.
    pub async fn get_quotes_by_dates(&self, dates: &[String]) -> Result<Vec<Quote>, AppError> {
        let results = stream::iter(dates.to_vec())
            .map(|date| async move { self.get_quote(&date).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<Quote>, AppError>>>()
            .await;

        let mut quotes = Vec::with_capacity(results.len());
        for result in results {
            if let Some(quote) = result? {
                quotes.push(quote);
            }
        }
        Ok(quotes)
    }

    /// Get the quote currently flagged as quote of the week.
    pub async fn get_quote_of_the_week(&self) -> Result<Option<Quote>, AppError> {
        let quotes: Vec<Quote> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::QUOTES)
            .filter(|q| q.for_all([q.field("isQuoteOfTheWeek").eq(true)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(quotes.into_iter().next())
    }

    /// Store a new quote. Fails with `Conflict` if the day already has one.
    ///
    /// A quote flagged as quote of the week is written in a transaction that
    /// also clears the flag on every other flagged quote, so the clear and the
    /// set commit together.
    pub async fn create_quote(&self, quote: &Quote) -> Result<Quote, AppError> {
        const DUPLICATE: &str = "A quote already exists for this date";

        if self.get_quote(&quote.date).await?.is_some() {
            return Err(AppError::Conflict(DUPLICATE.to_string()));
        }

        let client = self.get_client()?;

        if !quote.is_quote_of_the_week {
            let created: Quote = client
                .fluent()
                .insert()
                .into(collections::QUOTES)
                .document_id(&quote.date)
                .object(quote)
                .execute()
                .await
                .map_err(|e| map_write_error(e, DUPLICATE))?;
            tracing::info!(date = %created.date, "Quote created");
            return Ok(created);
        }

        let flagged: Vec<Quote> = client
            .fluent()
            .select()
            .from(collections::QUOTES)
            .filter(|q| q.for_all([q.field("isQuoteOfTheWeek").eq(true)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let now = now_rfc3339();
        let cleared = flagged.len();
        for mut other in flagged {
            other.is_quote_of_the_week = false;
            other.updated_at = now.clone();
            client
                .fluent()
                .update()
                .in_col(collections::QUOTES)
                .document_id(&other.date)
                .object(&other)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!("Failed to add flag reset to transaction: {}", e))
                })?;
        }

        client
            .fluent()
            .update()
            .in_col(collections::QUOTES)
            .document_id(&quote.date)
            .object(quote)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add quote to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| map_write_error(e, DUPLICATE))?;

        tracing::info!(
            date = %quote.date,
            cleared,
            "Quote of the week created"
        );

        Ok(quote.clone())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by (lowercased) email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// Create a user, claiming the email in the uniqueness index first.
    pub async fn create_user(&self, user: &User) -> Result<User, AppError> {
        const DUPLICATE: &str = "A user with this email already exists";
        let client = self.get_client()?;

        let _: EmailIndexEntry = client
            .fluent()
            .insert()
            .into(collections::USER_EMAILS)
            .document_id(&user.email)
            .object(&EmailIndexEntry {
                user_id: user.id.clone(),
            })
            .execute()
            .await
            .map_err(|e| map_write_error(e, DUPLICATE))?;

        let created = client
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute::<User>()
            .await;

        match created {
            Ok(created) => {
                tracing::info!(user_id = %created.id, provider = ?created.provider, "User created");
                Ok(created)
            }
            Err(e) => {
                // Release the email so the user can retry registration.
                if let Err(cleanup) = client
                    .fluent()
                    .delete()
                    .from(collections::USER_EMAILS)
                    .document_id(&user.email)
                    .execute()
                    .await
                {
                    tracing::warn!(error = %cleanup, "Failed to release email index entry");
                }
                Err(map_write_error(e, DUPLICATE))
            }
        }
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
