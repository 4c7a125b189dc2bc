// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{NewQuote, Preferences, PreferencesUpdate, Quote, UserProfile};
use crate::routes::{parse_body, parse_query};
use crate::services::{FavoriteQuotes, ToggleOutcome};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route(
            "/api/favorites",
            get(list_favorites)
                .post(toggle_favorite)
                .delete(remove_favorite),
        )
        .route("/api/quotes", post(create_quote))
        .route(
            "/api/preferences",
            get(get_preferences).put(update_preferences),
        )
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state.accounts.current_user(&user).await?.profile();
    Ok(Json(profile))
}

async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Preferences>> {
    Ok(Json(state.accounts.current_user(&user).await?.preferences))
}

/// Partial update; omitted fields keep their value.
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Preferences>> {
    let update: PreferencesUpdate = parse_body(body)?;
    let preferences = state.accounts.update_preferences(&user, update).await?;
    tracing::info!(user_id = %user.user_id, "Preferences updated");
    Ok(Json(preferences))
}

// ─── Favorites ───────────────────────────────────────────────

#[derive(Deserialize)]
struct FavoriteRequest {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteResponse {
    pub is_favorite: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn required_date(date: Option<String>) -> Result<String> {
    date.map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::BadRequest("Valid date is required".to_string()))
}

async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FavoriteQuotes>> {
    Ok(Json(state.favorites.list(&user).await?))
}

/// Flip a favorite on or off.
async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ToggleFavoriteResponse>> {
    let request: FavoriteRequest = parse_body(body)?;
    let date = required_date(request.date)?;

    let ToggleOutcome { is_favorite } = state.favorites.toggle(&user, &date).await?;
    let message = if is_favorite {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };

    Ok(Json(ToggleFavoriteResponse {
        is_favorite,
        message: message.to_string(),
    }))
}

async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    params: std::result::Result<Query<FavoriteRequest>, QueryRejection>,
) -> Result<Json<MessageResponse>> {
    let date = required_date(parse_query(params)?.date)?;
    state.favorites.remove(&user, &date).await?;

    Ok(Json(MessageResponse {
        message: "Removed from favorites".to_string(),
    }))
}

// ─── Quote Administration ────────────────────────────────────

#[derive(Serialize)]
pub struct CreateQuoteResponse {
    pub message: String,
    pub quote: Quote,
}

/// Create a quote (admin only).
async fn create_quote(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<CreateQuoteResponse>)> {
    user.require_admin()?;

    let new_quote: NewQuote = parse_body(body)?;
    let quote = new_quote.into_quote()?;

    state.accounts.require_admin(&user).await?;
    let quote = state.quotes.insert(quote).await?;

    tracing::info!(
        user_id = %user.user_id,
        date = %quote.date,
        quote_of_the_week = quote.is_quote_of_the_week,
        "Quote created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateQuoteResponse {
            message: "Quote created successfully".to_string(),
            quote,
        }),
    ))
}
