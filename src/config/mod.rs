//! Portal client configuration.
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//! - `FIRENZE_API_URL`: backend base URL
//! - `FIRENZE_DATA_DIR`: where the credential store lives

use crate::error::{PortalError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default per-request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const ENV_API_URL: &str = "FIRENZE_API_URL";
const ENV_DATA_DIR: &str = "FIRENZE_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PortalConfig {
    /// Base URL of the REST backend, without trailing slash.
    pub api_url: String,
    /// Directory holding the persisted session.
    pub data_dir: PathBuf,
    /// Timeout applied to every outbound request.
    pub request_timeout_secs: u64,
    /// Block tenants from `/admin` and administrators from `/locatario`.
    pub enforce_role_routes: bool,
    /// Confirm a rehydrated session against `/auth/verify-token` at startup.
    /// Off by default: the stored identity is trusted until the first real call.
    pub verify_on_start: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: default_data_dir(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            enforce_role_routes: true,
            verify_on_start: false,
        }
    }
}

impl PortalConfig {
    /// Load from `path` if it exists, fall back to defaults otherwise, then
    /// apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = std::fs::read_to_string(p)
                    .map_err(|e| PortalError::Config(format!("{}: {e}", p.display())))?;
                toml::from_str::<PortalConfig>(&raw)?
            }
            Some(p) => {
                tracing::debug!(path = %p.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir.trim());
        }
    }

    /// Override the API URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the data directory.
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(PortalError::Config("api_url cannot be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(PortalError::Config(format!(
                "api_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(PortalError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// API base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.api_url.trim().trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the shared HTTP client honoring the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .build()
            .map_err(|e| PortalError::Config(format!("HTTP client: {e}")))
    }
}

/// Platform data directory for the portal, `./.firenze` when none is known.
fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("br.com", "imobiliariafirenze", "firenze")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".firenze"))
}
