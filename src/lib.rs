// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quote Calendar: one quote per calendar day.
//!
//! This crate provides the backend API: a date and month-grid engine, quote
//! queries, per-user favorites, and account sessions on top of Firestore.

pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{AccountService, FavoriteService, GithubClient, QuoteService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub quotes: QuoteService,
    pub favorites: FavoriteService,
    pub accounts: AccountService,
    /// `None` when GitHub sign-in is not configured.
    pub github: Option<GithubClient>,
}

impl AppState {
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        let github = config
            .github
            .as_ref()
            .map(|gh| GithubClient::new(gh.client_id.clone(), gh.client_secret.clone()));

        Self {
            quotes: QuoteService::new(db.clone()),
            favorites: FavoriteService::new(db.clone()),
            accounts: AccountService::new(db),
            github,
            config,
        }
    }
}
