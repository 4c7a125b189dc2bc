//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development. Secrets are read once at
//! startup and kept in memory.

use std::env;

/// GitHub OAuth app credentials.
#[derive(Debug, Clone)]
pub struct GithubCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for CORS and OAuth redirects
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for the OAuth `state` parameter
    pub oauth_state_key: Vec<u8>,
    /// GitHub sign-in is disabled when unset
    pub github: Option<GithubCredentials>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key_32_bytes!!".to_vec(),
            github: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();
        if jwt_signing_key.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SIGNING_KEY",
                "must be at least 32 bytes".to_string(),
            ));
        }

        let oauth_state_key = env::var("OAUTH_STATE_KEY")
            .map(|v| v.trim().as_bytes().to_vec())
            .unwrap_or_else(|_| jwt_signing_key.clone());

        let github = match (env::var("GITHUB_CLIENT_ID"), env::var("GITHUB_CLIENT_SECRET")) {
            (Ok(client_id), Ok(client_secret)) => Some(GithubCredentials {
                client_id: client_id.trim().to_string(),
                client_secret: client_secret.trim().to_string(),
            }),
            (Err(_), Err(_)) => None,
            (Ok(_), Err(_)) => return Err(ConfigError::Missing("GITHUB_CLIENT_SECRET")),
            (Err(_), Ok(_)) => return Err(ConfigError::Missing("GITHUB_CLIENT_ID")),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key,
            oauth_state_key,
            github,
        })
    }

    /// Cookies are `Secure` unless the frontend runs on localhost.
    pub fn secure_cookies(&self) -> bool {
        !(self.frontend_url.starts_with("http://localhost")
            || self.frontend_url.starts_with("http://127.0.0.1"))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
