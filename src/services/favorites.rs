// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user favorite quotes.
//!
//! Favorites are a set of dates on the user document. Every change is a
//! read-modify-write of that one document, so concurrent toggles from the
//! same user resolve as last write wins.

use serde::Serialize;

use crate::calendar;
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Quote, User};
use crate::time_utils::now_rfc3339;

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
    pub is_favorite: bool,
}

/// A user's favorite dates and the quotes behind them.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteQuotes {
    pub favorites: Vec<String>,
    pub quotes: Vec<Quote>,
}

#[derive(Clone)]
pub struct FavoriteService {
    db: FirestoreDb,
}

impl FavoriteService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    async fn load_user(&self, session: &AuthUser) -> Result<User> {
        self.db
            .get_user(&session.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Add the date if absent, remove it if present.
    ///
    /// The date must name an existing quote.
    pub async fn toggle(&self, session: &AuthUser, date: &str) -> Result<ToggleOutcome> {
        calendar::parse_date(date)?;

        let mut user = self.load_user(session).await?;
        if self.db.get_quote(date).await?.is_none() {
            return Err(AppError::NotFound("Quote not found".to_string()));
        }

        let is_favorite = user.toggle_favorite(date);
        user.updated_at = now_rfc3339();
        self.db.upsert_user(&user).await?;

        tracing::debug!(user_id = %user.id, date, is_favorite, "Favorite toggled");
        Ok(ToggleOutcome { is_favorite })
    }

    /// Remove the date from favorites; absent dates are not an error.
    pub async fn remove(&self, session: &AuthUser, date: &str) -> Result<()> {
        calendar::parse_date(date)?;

        let mut user = self.load_user(session).await?;
        if user.remove_favorite(date) {
            user.updated_at = now_rfc3339();
            self.db.upsert_user(&user).await?;
            tracing::debug!(user_id = %user.id, date, "Favorite removed");
        }
        Ok(())
    }

    /// Favorite dates plus their quotes, newest first. Dates whose quote no
    /// longer exists are kept in `favorites` but yield no quote.
    pub async fn list(&self, session: &AuthUser) -> Result<FavoriteQuotes> {
        let user = self.load_user(session).await?;
        let quotes = self.db.get_quotes_by_dates(&user.favorites).await?;

        Ok(FavoriteQuotes {
            favorites: user.favorites,
            quotes: sort_newest_first(quotes),
        })
    }
}

fn sort_newest_first(mut quotes: Vec<Quote>) -> Vec<Quote> {
    quotes.sort_by(|a, b| b.date.cmp(&a.date));
    quotes
}
