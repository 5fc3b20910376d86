//! Error types for the portal session client.
//!
//! Every library operation returns `Result<T, PortalError>`. The binary wraps
//! these in `anyhow` at the edges.

use thiserror::Error;

/// Unified error type for session and gateway operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    // ─── Session Errors ───
    /// The backend rejected the login inputs.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Registration password and its confirmation differ. Raised before any request.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The backend refused to create the account (e.g. duplicate email).
    #[error("Registration rejected: {0}")]
    RegistrationRejected(String),

    /// An authenticated call came back unauthorized. The session has already
    /// been torn down when the caller sees this.
    #[error("Session expired")]
    SessionExpired,

    // ─── Transport Errors ───
    /// Network-level failure: connect, DNS, timeout.
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Non-2xx response other than 401, passed through untouched.
    #[error("Request failed ({status}): {message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body could not be used.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // ─── Infrastructure Errors ───
    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PortalError {
    /// Whether this error means the caller must log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PortalError::UnexpectedResponse(err.to_string())
        } else {
            PortalError::Unreachable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::UnexpectedResponse(err.to_string())
    }
}

impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        PortalError::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for PortalError {
    fn from(err: toml::de::Error) -> Self {
        PortalError::Config(err.to_string())
    }
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_session_expired_requires_login() {
        assert!(PortalError::SessionExpired.requires_login());
        assert!(!PortalError::PasswordMismatch.requires_login());
        assert!(!PortalError::Unreachable("down".into()).requires_login());
    }

    #[test]
    fn status_error_message_includes_code() {
        let err = PortalError::Status {
            status: 404,
            message: "Imóvel não encontrado".into(),
        };
        assert_eq!(err.to_string(), "Request failed (404): Imóvel não encontrado");
    }

    #[tokio::test]
    async fn reqwest_errors_split_into_decode_and_transport() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let resp = reqwest::get(server.uri()).await.unwrap();
        let decode = resp.json::<serde_json::Value>().await.unwrap_err();
        assert!(matches!(PortalError::from(decode), PortalError::UnexpectedResponse(_)));

        let refused = reqwest::get("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(PortalError::from(refused), PortalError::Unreachable(_)));
    }

    #[test]
    fn io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(PortalError::from(io), PortalError::Storage(_)));
    }
}
