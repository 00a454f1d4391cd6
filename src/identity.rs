use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, sign_access_token};
use crate::config::AppConfig;

/// AuthSession
///
/// Token pair issued by the auth provider. Both tokens end up in session cookies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub user: Option<IdentityUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// IdentityError
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider answered and refused (bad credentials, revoked refresh token, ...).
    #[error("auth provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The provider could not be reached or answered with something unreadable.
    #[error("auth provider unavailable: {0}")]
    Transport(String),
}

// 1. IdentityProvider Contract
/// IdentityProvider
///
/// Abstracts the hosted auth service so the gate and the auth form actions can run
/// against the real HTTP API in production and an in-memory mock in tests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError>;
    /// Exchanges a refresh token for a rotated token pair.
    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, IdentityError>;
    /// Registers a user; the confirmation email links back to `redirect_to`.
    async fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> Result<(), IdentityError>;
    /// Sends a password recovery email linking back to `redirect_to`.
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), IdentityError>;
    async fn update_password(&self, access_token: &str, password: &str) -> Result<(), IdentityError>;
    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}

/// IdentityState
///
/// The concrete type used to share the auth provider client across the application state.
pub type IdentityState = Arc<dyn IdentityProvider>;

// 2. The Real Implementation (GoTrue HTTP API)
/// GoTrueClient
///
/// Talks to the hosted auth API under `{SUPABASE_URL}/auth/v1`. Every call carries the
/// public anon key in the `apikey` header; user-scoped calls add the access token as a
/// bearer token.
#[derive(Clone)]
pub struct GoTrueClient {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

impl GoTrueClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: config.auth_url(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.auth_url, path))
            .header("apikey", &self.anon_key)
    }

    /// Sends the request and turns non-2xx answers into `IdentityError::Rejected`.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, IdentityError> {
        let response = builder
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<serde_json::Value>().await.unwrap_or_default();
        Err(IdentityError::Rejected {
            status: status.as_u16(),
            message: provider_message(&body),
        })
    }

    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> Result<AuthSession, IdentityError> {
        let response = self
            .send(
                self.request(reqwest::Method::POST, "/token")
                    .query(&[("grant_type", grant_type)])
                    .json(&body),
            )
            .await?;

        response
            .json::<AuthSession>()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))
    }
}

/// Pulls the human-readable message out of the provider's error body, which comes in
/// a few different shapes depending on the endpoint.
fn provider_message(body: &serde_json::Value) -> String {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|value| value.as_str()))
        .unwrap_or("Request rejected by auth provider")
        .to_string()
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        self.token_grant(
            "password",
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, IdentityError> {
        self.token_grant(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    async fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> Result<(), IdentityError> {
        self.send(
            self.request(reqwest::Method::POST, "/signup")
                .query(&[("redirect_to", redirect_to)])
                .json(&serde_json::json!({ "email": email, "password": password })),
        )
        .await?;
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), IdentityError> {
        self.send(
            self.request(reqwest::Method::POST, "/recover")
                .query(&[("redirect_to", redirect_to)])
                .json(&serde_json::json!({ "email": email })),
        )
        .await?;
        Ok(())
    }

    async fn update_password(&self, access_token: &str, password: &str) -> Result<(), IdentityError> {
        self.send(
            self.request(reqwest::Method::PUT, "/user")
                .bearer_auth(access_token)
                .json(&serde_json::json!({ "password": password })),
        )
        .await?;
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.send(
            self.request(reqwest::Method::POST, "/logout")
                .bearer_auth(access_token),
        )
        .await?;
        Ok(())
    }
}

// 3. The Mock Implementation (For Tests)
/// MockBehavior
///
/// How every call on a [`MockIdentityProvider`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    Accept,
    Reject,
    Unreachable,
}

/// The user every accepted mock sign-in or refresh resolves to.
pub const MOCK_USER_ID: Uuid = Uuid::from_u128(0x5eed);
pub const MOCK_USER_EMAIL: &str = "visitor@example.com";

/// MockIdentityProvider
///
/// In-memory stand-in for the auth API. Accepted token grants mint real HS256 access
/// tokens with the configured secret, so the gate can verify them exactly as it
/// verifies provider-issued ones. Every call is recorded by name.
pub struct MockIdentityProvider {
    jwt_secret: String,
    behavior: MockBehavior,
    calls: Mutex<Vec<String>>,
}

impl MockIdentityProvider {
    pub fn new(jwt_secret: &str) -> Self {
        Self::with_behavior(jwt_secret, MockBehavior::Accept)
    }

    pub fn with_behavior(jwt_secret: &str, behavior: MockBehavior) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Names of the calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: &str) -> Result<(), IdentityError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
        match self.behavior {
            MockBehavior::Accept => Ok(()),
            MockBehavior::Reject => Err(IdentityError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
            MockBehavior::Unreachable => Err(IdentityError::Transport(
                "Mock Identity Error: Simulation requested".to_string(),
            )),
        }
    }

    fn issue_session(&self) -> Result<AuthSession, IdentityError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as usize)
            .unwrap_or_default();

        let claims = Claims {
            sub: MOCK_USER_ID,
            exp: now + 3600,
            iat: now,
            aud: "authenticated".to_string(),
            email: Some(MOCK_USER_EMAIL.to_string()),
        };

        let access_token = sign_access_token(&claims, &self.jwt_secret)
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        Ok(AuthSession {
            access_token,
            refresh_token: format!("mock-refresh-{}", Uuid::new_v4()),
            expires_in: 3600,
            user: Some(IdentityUser {
                id: MOCK_USER_ID,
                email: Some(MOCK_USER_EMAIL.to_string()),
            }),
        })
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<AuthSession, IdentityError> {
        self.record("sign_in_with_password")?;
        self.issue_session()
    }

    async fn refresh_session(&self, _refresh_token: &str) -> Result<AuthSession, IdentityError> {
        self.record("refresh_session")?;
        self.issue_session()
    }

    async fn sign_up(&self, _email: &str, _password: &str, _redirect_to: &str) -> Result<(), IdentityError> {
        self.record("sign_up")
    }

    async fn reset_password_for_email(&self, _email: &str, _redirect_to: &str) -> Result<(), IdentityError> {
        self.record("reset_password_for_email")
    }

    async fn update_password(&self, _access_token: &str, _password: &str) -> Result<(), IdentityError> {
        self.record("update_password")
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), IdentityError> {
        self.record("sign_out")
    }
}
