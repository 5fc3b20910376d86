//! Authentication backend: `/auth/login`, `/auth/register`, `/auth/verify-token`.
//!
//! These calls deliberately bypass the request gateway. A 401 from the login
//! endpoint means "wrong password", not "your session expired", and must not
//! trigger a teardown.

use super::identity::{backend_message, LoginRequest, LoginResponse, RegisterRequest};
use crate::error::{PortalError, Result};
use async_trait::async_trait;

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";

/// The remote authority that issues session tokens.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a token and identity.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;

    /// Create an account. Never returns a session.
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<serde_json::Value>;

    /// Ask the backend whether `token` is still valid.
    /// `Err(SessionExpired)` when it is not.
    async fn verify_token(&self, token: &str) -> Result<()>;
}

/// REST implementation over `reqwest`.
pub struct HttpAuthBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = backend_message(&body).unwrap_or_else(|| LOGIN_FALLBACK.to_string());
            return Err(PortalError::InvalidCredentials(message));
        }

        let data: LoginResponse = serde_json::from_str(&body)?;
        if data.token.trim().is_empty() {
            return Err(PortalError::UnexpectedResponse(
                "login response carried an empty token".into(),
            ));
        }
        Ok(data)
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<serde_json::Value> {
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(&RegisterRequest {
                name,
                email,
                password,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = backend_message(&body).unwrap_or_else(|| REGISTER_FALLBACK.to_string());
            return Err(PortalError::RegistrationRejected(message));
        }

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }

    async fn verify_token(&self, token: &str) -> Result<()> {
        let resp = self
            .http
            .get(self.url("/auth/verify-token"))
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PortalError::SessionExpired);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PortalError::Status {
                status: status.as_u16(),
                message: backend_message(&body).unwrap_or(body),
            });
        }
        Ok(())
    }
}
