//! Supabase GoTrue client — the production identity provider.
//!
//! Speaks the password grant, sign-up and refresh-token grant over plain
//! HTTP. The project URL and anon key are injected at construction; the anon
//! key is a publishable value, not a secret.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::error::AuthError;
use crate::services::auth_service::{Identity, IdentityProvider, Session};

/// Token response from a password grant, refresh grant, or an auto-activated
/// sign-up.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: SupabaseUser,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

/// Error body from GoTrue. Older and newer API versions disagree on the
/// field names, so all are optional.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

/// HTTP client for a Supabase auth backend.
pub struct SupabaseAuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuthClient {
    /// Create a client for the given Supabase project.
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn token_request(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(format!(
                "{}/auth/v1/token?grant_type={}",
                self.base_url, grant_type
            ))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;

        if !status.is_success() {
            return Err(map_rejection(status.as_u16(), &text));
        }

        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::NetworkFailure(format!("unexpected token response: {e}")))?;
        Ok(session_from(token))
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuthClient {
    async fn password_sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.token_request(
            "password",
            serde_json::json!({
                "email": email,
                "password": password,
            }),
        )
        .await
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Option<Session>, AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "data": {
                    "full_name": display_name,
                },
            }))
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;

        if !status.is_success() {
            return Err(map_rejection(status.as_u16(), &text));
        }

        // With email confirmation off, sign-up answers with a full token
        // response; with it on, just the registered user and no tokens.
        match serde_json::from_str::<TokenResponse>(&text) {
            Ok(token) => Ok(Some(session_from(token))),
            Err(_) => Ok(None),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.token_request(
            "refresh_token",
            serde_json::json!({
                "refresh_token": refresh_token,
            }),
        )
        .await
    }
}

fn session_from(token: TokenResponse) -> Session {
    Session {
        identity: Identity {
            id: token.user.id,
            email: token.user.email.unwrap_or_default(),
            display_name: token.user.user_metadata.full_name,
        },
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at: Utc::now().timestamp() + token.expires_in,
    }
}

/// Map a non-success auth response to the error taxonomy, passing the
/// provider's message through for display.
fn map_rejection(status: u16, body: &str) -> AuthError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error_description
        .or(parsed.msg)
        .unwrap_or_else(|| format!("Authentication failed ({status})"));

    match parsed.error_code.as_deref() {
        Some("user_already_exists") | Some("email_exists") => AuthError::DuplicateAccount,
        Some("weak_password") => AuthError::WeakCredential,
        _ if message.to_lowercase().contains("already registered") => AuthError::DuplicateAccount,
        _ => AuthError::InvalidCredentials(message),
    }
}
