// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quote model for storage and API.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::calendar;
use crate::error::AppError;
use crate::time_utils::now_rfc3339;

pub const DEFAULT_CATEGORY: &str = "general";

/// Categories offered by the quote editor.
pub const CATEGORIES: [&str; 15] = [
    "general",
    "motivation",
    "wisdom",
    "love",
    "success",
    "life",
    "inspiration",
    "humor",
    "friendship",
    "happiness",
    "peace",
    "growth",
    "courage",
    "gratitude",
    "dreams",
];

/// A daily quote stored in Firestore.
///
/// The document ID is `date`, which keeps one quote per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub text: String,
    pub author: String,
    /// Calendar day (YYYY-MM-DD)
    pub date: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub is_quote_of_the_week: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Quote {
    /// `"text" - author`, used for sharing.
    pub fn share_text(&self) -> String {
        format!("\"{}\" - {}", self.text, self.author)
    }
}

/// Request body for creating a quote.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewQuote {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Quote text is required and must be at most 1000 characters"
    ))]
    pub text: String,
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 200,
        message = "Author is required and must be at most 200 characters"
    ))]
    pub author: String,
    #[serde(default)]
    pub date: String,
    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,
    #[serde(default)]
    pub is_quote_of_the_week: bool,
}

impl NewQuote {
    /// Trim and validate, producing a storable quote.
    pub fn into_quote(self) -> Result<Quote, AppError> {
        let trimmed = NewQuote {
            text: self.text.trim().to_string(),
            author: self.author.trim().to_string(),
            date: self.date.trim().to_string(),
            category: self
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            is_quote_of_the_week: self.is_quote_of_the_week,
        };

        if trimmed.date.is_empty() {
            return Err(AppError::BadRequest("Date is required".to_string()));
        }
        trimmed
            .validate()
            .map_err(|e| AppError::from_validation(&e))?;
        calendar::parse_date(&trimmed.date)?;

        let now = now_rfc3339();
        Ok(Quote {
            id: uuid::Uuid::new_v4().to_string(),
            text: trimmed.text,
            author: trimmed.author,
            date: trimmed.date,
            category: trimmed.category.unwrap_or_else(default_category),
            is_quote_of_the_week: trimmed.is_quote_of_the_week,
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

/// Shorten quote text for previews, preferring a word boundary near the cut.
pub fn truncate_quote(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(' ') {
        Some(idx) if truncated[..idx].chars().count() * 5 > max_chars * 4 => {
            format!("{}...", &truncated[..idx])
        }
        _ => format!("{}...", truncated),
    }
}
