// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub OAuth client.
//!
//! Handles:
//! - Authorization URL construction
//! - Code-for-token exchange
//! - Profile and primary email lookup

use crate::error::AppError;
use crate::services::accounts::OAuthIdentity;
use serde::Deserialize;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const API_BASE_URL: &str = "https://api.github.com";

/// GitHub API client.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl GithubClient {
    /// Create a new GitHub client with OAuth app credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("quote-calendar/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default(),
            base_url: API_BASE_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    /// URL the browser is sent to for consent.
    pub fn authorize_url(&self, callback_url: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope=read:user%20user:email&state={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(callback_url),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str, callback_url: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(TOKEN_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", callback_url),
            ])
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(format!("Token exchange request failed: {}", e)))?;

        let token: TokenResponse = self.check_response_json(response).await?;
        match (token.access_token, token.error) {
            (Some(access_token), _) => Ok(access_token),
            (None, Some(error)) => Err(AppError::GitHubApi(format!(
                "Token exchange rejected: {}",
                error
            ))),
            (None, None) => Err(AppError::GitHubApi(
                "Token exchange returned no access token".to_string(),
            )),
        }
    }

    /// Resolve the signed-in GitHub account.
    ///
    /// Falls back to the primary verified address when the profile email is private.
    pub async fn fetch_identity(&self, access_token: &str) -> Result<OAuthIdentity, AppError> {
        let user: GithubUser = self
            .get_json(&format!("{}/user", self.base_url), access_token)
            .await?;

        let email = match user.email.clone() {
            Some(email) if !email.is_empty() => email,
            _ => {
                let emails: Vec<GithubEmail> = self
                    .get_json(&format!("{}/user/emails", self.base_url), access_token)
                    .await?;
                primary_email(&emails).ok_or_else(|| {
                    AppError::BadRequest("GitHub account has no verified email".to_string())
                })?
            }
        };

        Ok(OAuthIdentity {
            provider_id: user.id.to_string(),
            name: user.name.unwrap_or_else(|| user.login.clone()),
            email,
            image: user.avatar_url,
        })
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::GitHubApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::GitHubApi(format!("JSON parse error: {}", e)))
    }
}

fn primary_email(emails: &[GithubEmail]) -> Option<String> {
    emails
        .iter()
        .find(|e| e.primary && e.verified)
        .or_else(|| emails.iter().find(|e| e.verified))
        .map(|e| e.email.clone())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}
