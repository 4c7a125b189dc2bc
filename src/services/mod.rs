// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod favorites;
pub mod github;
pub mod quotes;

pub use accounts::{AccountService, OAuthIdentity};
pub use favorites::{FavoriteService, FavoriteQuotes, ToggleOutcome};
pub use github::GithubClient;
pub use quotes::{QuoteFilter, QuotePage, QuoteQuery, QuoteService};
