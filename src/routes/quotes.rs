// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public quote and calendar routes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, CalendarCell, YearMonth};
use crate::error::{AppError, Result};
use crate::models::quote::{truncate_quote, CATEGORIES};
use crate::models::Quote;
use crate::routes::parse_query;
use crate::services::{QuotePage, QuoteQuery};
use crate::AppState;

/// Characters of quote text shown in a calendar cell.
const PREVIEW_CHARS: usize = 50;

/// Public routes (no auth required).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/quotes", get(list_quotes))
        .route("/api/quotes/today", get(today_quote))
        .route("/api/quotes/week", get(quote_of_the_week))
        .route("/api/quotes/categories", get(categories))
        .route("/api/quotes/{date}", get(quote_detail))
        .route("/api/calendar", get(month_calendar))
}

// ─── Quote Queries ───────────────────────────────────────────

/// Filtered, sorted, paginated quote listing.
async fn list_quotes(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<QuoteQuery>, QueryRejection>,
) -> Result<Json<QuotePage>> {
    let filter = parse_query(params)?.validate()?;
    Ok(Json(state.quotes.query(&filter).await?))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub date: String,
    pub display_date: String,
    pub quote: Option<Quote>,
}

async fn today_quote(State(state): State<Arc<AppState>>) -> Result<Json<TodayResponse>> {
    let date = calendar::today();
    let quote = state.quotes.for_date(&date).await?;

    Ok(Json(TodayResponse {
        display_date: calendar::format_long_display(&date)?,
        date,
        quote,
    }))
}

async fn quote_of_the_week(State(state): State<Arc<AppState>>) -> Result<Json<Quote>> {
    state
        .quotes
        .quote_of_the_week()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No quote of the week".to_string()))
}

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<&'static str>,
}

async fn categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: CATEGORIES.to_vec(),
    })
}

/// Single-day view with neighbor links.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDetailResponse {
    pub date: String,
    pub display_date: String,
    pub prev_date: String,
    /// `None` when the next day is still in the future
    pub next_date: Option<String>,
    pub quote: Option<Quote>,
    pub share_text: Option<String>,
}

async fn quote_detail(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<QuoteDetailResponse>> {
    calendar::parse_date(&date)?;
    if calendar::is_future(&date) {
        return Err(AppError::NotFound(format!("No quote for {} yet", date)));
    }

    let quote = state.quotes.for_date(&date).await?;
    let next_date = calendar::add_days(&date, 1)?;

    Ok(Json(QuoteDetailResponse {
        display_date: calendar::format_long_display(&date)?,
        prev_date: calendar::subtract_days(&date, 1)?,
        next_date: (!calendar::is_future(&next_date)).then_some(next_date),
        share_text: quote.as_ref().map(Quote::share_text),
        quote,
        date,
    }))
}

// ─── Calendar ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CalendarParams {
    year: Option<i32>,
    /// Zero-indexed (0 = January)
    month: Option<u32>,
}

/// A grid cell decorated with quote and today/future flags.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    #[serde(flatten)]
    pub cell: CalendarCell,
    pub is_today: bool,
    pub is_future: bool,
    pub has_quote: bool,
    pub preview: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub days: Vec<CalendarDay>,
    pub prev: YearMonth,
    pub next: YearMonth,
    /// Navigation never moves past the current month.
    pub can_go_next: bool,
}

async fn month_calendar(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<CalendarParams>, QueryRejection>,
) -> Result<Json<CalendarResponse>> {
    let params = parse_query(params)?;
    let today = calendar::local_today();
    let year = params.year.unwrap_or_else(|| today.year());
    let month = params.month.unwrap_or_else(|| today.month0());

    let cells = calendar::calendar_grid(year, month)?;
    let navigation = calendar::navigation_months(year, month);

    let previews: HashMap<String, String> = match (cells.first(), cells.last()) {
        (Some(first), Some(last)) => state
            .quotes
            .in_range(&first.date, &last.date)
            .await?
            .into_iter()
            .map(|q| {
                let preview = truncate_quote(&q.text, PREVIEW_CHARS);
                (q.date, preview)
            })
            .collect(),
        _ => HashMap::new(),
    };

    let days = cells
        .into_iter()
        .map(|cell| {
            let preview = previews.get(&cell.date).cloned();
            CalendarDay {
                is_today: calendar::is_today_on(&cell.date, today),
                is_future: calendar::is_future_on(&cell.date, today),
                has_quote: preview.is_some(),
                preview,
                cell,
            }
        })
        .collect();

    tracing::debug!(year, month, quotes = previews.len(), "Calendar month");

    Ok(Json(CalendarResponse {
        year,
        month,
        month_name: calendar::month_label(month)?,
        days,
        prev: navigation.prev,
        next: navigation.next,
        can_go_next: !calendar::is_after_month(navigation.next.year, navigation.next.month, today),
    }))
}
