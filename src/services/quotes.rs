// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quote queries: filtering, search, sorting and pagination.
//!
//! Date and category filters are pushed down to Firestore. Firestore has no
//! substring search, so search, ordering and paging run here on the
//! candidate set.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::db::{FirestoreDb, QuoteSelection};
use crate::error::{AppError, Result};
use crate::models::{NewQuote, Quote};

pub const DEFAULT_LIMIT: u32 = 100;

/// Field to order results by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Author,
    Text,
    Category,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Raw query parameters for `GET /api/quotes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortOrder>,
}

/// Validated quote filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteFilter {
    pub selection: QuoteSelection,
    /// Lowercased search term
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for QuoteFilter {
    fn default() -> Self {
        Self {
            selection: QuoteSelection::default(),
            search: None,
            page: 1,
            limit: DEFAULT_LIMIT,
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn checked_date(value: Option<String>) -> Result<Option<String>> {
    non_empty(value)
        .map(|d| calendar::parse_date(&d).map(|_| d))
        .transpose()
        .map_err(AppError::from)
}

impl QuoteQuery {
    /// Validate raw parameters. Nothing touches the store before this passes.
    pub fn validate(self) -> Result<QuoteFilter> {
        let date = checked_date(self.date)?;
        let start_date = checked_date(self.start_date)?;
        let end_date = checked_date(self.end_date)?;

        // A range needs both ends; a lone bound is ignored.
        let date_range = match (start_date, end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => date.map(|d| (d.clone(), d)),
        };

        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::BadRequest(
                "Page must be greater than 0".to_string(),
            ));
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(AppError::BadRequest(
                "Limit must be greater than 0".to_string(),
            ));
        }

        Ok(QuoteFilter {
            selection: QuoteSelection {
                date_range,
                category: non_empty(self.category).filter(|c| c != "all"),
            },
            search: non_empty(self.search).map(|s| s.to_lowercase()),
            page,
            limit,
            sort_by: self.sort_by.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
        })
    }
}

impl QuoteFilter {
    /// Whether a quote passes every filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        if let Some((start, end)) = &self.selection.date_range {
            if quote.date.as_str() < start.as_str() || quote.date.as_str() > end.as_str() {
                return false;
            }
        }
        if let Some(category) = &self.selection.category {
            if &quote.category != category {
                return false;
            }
        }
        if let Some(term) = &self.search {
            if !quote.text.to_lowercase().contains(term)
                && !quote.author.to_lowercase().contains(term)
            {
                return false;
            }
        }
        true
    }

    fn compare(&self, a: &Quote, b: &Quote) -> Ordering {
        let primary = match self.sort_by {
            SortField::Date => Ordering::Equal,
            SortField::Author => a.author.to_lowercase().cmp(&b.author.to_lowercase()),
            SortField::Text => a.text.to_lowercase().cmp(&b.text.to_lowercase()),
            SortField::Category => a.category.to_lowercase().cmp(&b.category.to_lowercase()),
        };
        // YYYY-MM-DD sorts chronologically as a string.
        let ordering = primary.then_with(|| a.date.cmp(&b.date));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filter, sort and cut one page out of a candidate set.
    pub fn apply(&self, candidates: Vec<Quote>) -> QuotePage {
        let mut matching: Vec<Quote> = candidates
            .into_iter()
            .filter(|q| self.matches(q))
            .collect();
        matching.sort_by(|a, b| self.compare(a, b));

        let total = matching.len() as u64;
        let start = (u64::from(self.page) - 1).saturating_mul(u64::from(self.limit));
        let items: Vec<Quote> = matching
            .into_iter()
            .skip(usize::try_from(start).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .collect();

        QuotePage::new(items, self.page, self.limit, total)
    }
}

/// One page of quotes with pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePage {
    pub items: Vec<Quote>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl QuotePage {
    pub fn new(items: Vec<Quote>, page: u32, limit: u32, total: u64) -> Self {
        let limit_wide = u64::from(limit.max(1));
        Self {
            items,
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit_wide),
            has_next: u64::from(page).saturating_mul(limit_wide) < total,
            has_prev: page > 1,
        }
    }
}

/// Quote reads and creation.
#[derive(Clone)]
pub struct QuoteService {
    db: FirestoreDb,
}

impl QuoteService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Run a validated query.
    pub async fn query(&self, filter: &QuoteFilter) -> Result<QuotePage> {
        let candidates = self.db.find_quotes(&filter.selection).await?;
        tracing::debug!(
            candidates = candidates.len(),
            search = ?filter.search,
            page = filter.page,
            "Quote query"
        );
        Ok(filter.apply(candidates))
    }

    /// Quote for one day, if any.
    pub async fn for_date(&self, date: &str) -> Result<Option<Quote>> {
        calendar::parse_date(date)?;
        self.db.get_quote(date).await
    }

    pub async fn quote_of_the_week(&self) -> Result<Option<Quote>> {
        self.db.get_quote_of_the_week().await
    }

    /// Validate and store a new quote.
    pub async fn create(&self, new_quote: NewQuote) -> Result<Quote> {
        self.insert(new_quote.into_quote()?).await
    }

    /// Store an already validated quote.
    pub async fn insert(&self, quote: Quote) -> Result<Quote> {
        self.db.create_quote(&quote).await
    }

    /// Quotes in an inclusive date range, ascending by date.
    pub async fn in_range(&self, start: &str, end: &str) -> Result<Vec<Quote>> {
        let selection = QuoteSelection {
            date_range: Some((start.to_string(), end.to_string())),
            category: None,
        };
        let mut quotes = self.db.find_quotes(&selection).await?;
        quotes.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(quotes)
    }
}
