//! Authenticated request gateway.
//!
//! Every domain service sends its requests through [`ApiGateway`], which
//! wraps the shared `reqwest::Client` with two steps:
//!
//! 1. **authorize**: read the token from the credential store right before
//!    sending and attach it as `Authorization: Bearer <token>`. No token means
//!    the request goes out anonymously (public listings work that way).
//! 2. **inspect**: a `401` is never retried. The gateway reports it to the
//!    [`RejectionHandler`] (the session controller, which tears the session
//!    down and redirects to `/login`) and still returns
//!    [`PortalError::SessionExpired`] to the caller. Every other failure
//!    status passes through as [`PortalError::Status`].

use crate::auth::identity::backend_message;
use crate::auth::CredentialStore;
use crate::error::{PortalError, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Receives authentication rejections observed by the gateway.
pub trait RejectionHandler: Send + Sync {
    /// A request sent with `token_used` came back 401.
    fn session_rejected(&self, token_used: Option<&str>);
}

/// Shared request path for all authenticated API access.
#[derive(Clone)]
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn CredentialStore>,
    on_rejected: Arc<dyn RejectionHandler>,
}

impl ApiGateway {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
        on_rejected: Arc<dyn RejectionHandler>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            on_rejected,
        }
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorize(&self, request: RequestBuilder) -> (RequestBuilder, Option<String>) {
        match self.store.token() {
            Some(token) => (request.bearer_auth(&token), Some(token)),
            None => (request, None),
        }
    }

    async fn inspect(&self, resp: Response, token_used: Option<String>, path: &str) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(path, "Request rejected as unauthorized");
            self.on_rejected.session_rejected(token_used.as_deref());
            return Err(PortalError::SessionExpired);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(path, status = status.as_u16(), "Request failed");
        Err(PortalError::Status {
            status: status.as_u16(),
            message: backend_message(&body).unwrap_or(body),
        })
    }

    /// Send a request with an optional JSON body through authorize + inspect.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.dispatch(request, path).await
    }

    async fn dispatch(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let (request, token_used) = self.authorize(request);
        let resp = request.send().await?;
        self.inspect(resp, token_used, path).await
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(PortalError::from)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send::<()>(Method::GET, path, None).await?;
        Self::decode(resp).await
    }

    /// GET with query parameters, encoded by reqwest.
    pub async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.get(self.url(path)).query(query);
        let resp = self.dispatch(request, path).await?;
        Self::decode(resp).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(Method::POST, path, Some(body)).await?;
        Self::decode(resp).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(Method::PUT, path, Some(body)).await?;
        Self::decode(resp).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(Method::PATCH, path, Some(body)).await?;
        Self::decode(resp).await
    }

    /// Send a request whose response body is ignored.
    pub async fn execute(&self, method: Method, path: &str) -> Result<()> {
        self.send::<()>(method, path, None).await.map(|_| ())
    }

    /// Send a JSON body and ignore the response body.
    pub async fn submit<B>(&self, method: Method, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, Some(body)).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path).await
    }
}
