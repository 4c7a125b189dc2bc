// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use quote_calendar::config::Config;
use quote_calendar::db::FirestoreDb;
use quote_calendar::middleware::auth::create_jwt;
use quote_calendar::routes::create_router;
use quote_calendar::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app with the offline mock database.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_with_config(config)
}

#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, FirestoreDb::new_mock()));
    (create_router(state.clone()), state)
}

/// Session token for a regular user.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, false, signing_key).expect("JWT creation")
}

/// Session token for an admin.
#[allow(dead_code)]
pub fn create_admin_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, true, signing_key).expect("JWT creation")
}

/// Unique suffix for test isolation against a shared emulator.
#[allow(dead_code)]
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
