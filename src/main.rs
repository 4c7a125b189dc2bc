// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quote Calendar API Server
//!
//! Serves one quote per day, a month calendar of quotes, and per-user
//! favorites and display preferences.

use quote_calendar::{config::Config, db::FirestoreDb, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Quote Calendar API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    if config.github.is_some() {
        tracing::info!("GitHub sign-in enabled");
    } else {
        tracing::info!("GitHub sign-in disabled (no client credentials)");
    }

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db));

    // Build router
    let app = quote_calendar::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quote_calendar=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
