//! Wired-up portal client.
//!
//! Builds every component from a [`PortalConfig`] in dependency order:
//! credential store, auth backend, router, session controller, gateway,
//! domain services. The controller doubles as the gateway's rejection
//! handler, so a 401 on any service call ends the session.

use crate::auth::{
    CredentialStore, FileCredentialStore, HttpAuthBackend, Identity, SessionController,
    SessionObserver, SessionState,
};
use crate::config::PortalConfig;
use crate::error::{PortalError, Result};
use crate::gateway::ApiGateway;
use crate::routes::{Navigator, RoutePolicy, Router};
use crate::services::{LegalService, NotificationService, PropertyService, StatusService, UserService};
use std::sync::Arc;

pub struct Portal {
    config: PortalConfig,
    controller: Arc<SessionController>,
    router: Arc<Router>,
    gateway: ApiGateway,
}

impl Portal {
    /// Build the client and restore any stored session. No network traffic
    /// happens here; see [`start`](Self::start) for the verified variant.
    pub fn new(config: PortalConfig) -> Result<Self> {
        config.validate()?;
        let http = config.http_client()?;

        let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(&config.data_dir));
        let backend = Arc::new(HttpAuthBackend::new(http.clone(), config.base_url()));
        let router = Arc::new(Router::new(RoutePolicy::new(config.enforce_role_routes)));
        let controller = Arc::new(SessionController::new(
            Arc::clone(&store),
            backend,
            router.clone(),
        ));
        let gateway = ApiGateway::new(http, config.base_url(), store, controller.clone());

        let restored = controller.rehydrate();
        tracing::debug!(
            api_url = config.base_url(),
            authenticated = restored.is_authenticated(),
            "Portal client ready"
        );

        Ok(Self {
            config,
            controller,
            router,
            gateway,
        })
    }

    /// [`new`](Self::new), then confirm the restored token with the backend
    /// when `verify_on_start` is set. An unreachable backend keeps the
    /// optimistic session.
    pub async fn start(config: PortalConfig) -> Result<Self> {
        let portal = Self::new(config)?;
        if portal.config.verify_on_start && portal.state().is_authenticated() {
            match portal.controller.verify().await {
                Ok(_) | Err(PortalError::SessionExpired) => {}
                Err(e) => tracing::warn!("Startup token check skipped: {e}"),
            }
        }
        Ok(portal)
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    // ── Session ──────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    pub fn observer(&self) -> SessionObserver {
        self.controller.observer()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        self.controller.login(email, password).await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        self.controller
            .register(name, email, password, confirm_password)
            .await
    }

    pub fn logout(&self) {
        self.controller.logout();
    }

    pub async fn verify(&self) -> Result<bool> {
        self.controller.verify().await
    }

    // ── Navigation ───────────────────────────────────────────────

    /// Try to open `path` under the current session.
    pub fn navigate(&self, path: &str) -> String {
        self.router.navigate(path, &self.controller.state())
    }

    pub fn location(&self) -> String {
        self.router.location()
    }

    // ── Services ─────────────────────────────────────────────────

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    pub fn properties(&self) -> PropertyService {
        PropertyService::new(self.gateway.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.gateway.clone())
    }

    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(self.gateway.clone())
    }

    pub fn legal(&self) -> LegalService {
        LegalService::new(self.gateway.clone())
    }

    pub fn status(&self) -> StatusService {
        StatusService::new(self.gateway.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::routes::{LOGIN_PATH, TENANT_HOME};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer, tmp: &TempDir) -> PortalConfig {
        PortalConfig::default()
            .with_api_url(server.uri())
            .with_data_dir(tmp.path())
    }

    fn seed_session(tmp: &TempDir, token: &str) {
        let store = FileCredentialStore::new(tmp.path());
        store
            .save(
                token,
                &Identity {
                    id: "2".into(),
                    name: "Bruno".into(),
                    email: "b@c.com".into(),
                    role: Role::Tenant,
                },
            )
            .unwrap();
    }

    #[tokio::test]
    async fn new_restores_stored_session_without_network() {
        let server = MockServer::start().await;
        let tmp = TempDir::new().unwrap();
        seed_session(&tmp, "t1");

        let portal = Portal::new(config(&server, &tmp)).unwrap();

        assert_eq!(portal.state().role(), Some(Role::Tenant));
        assert!(server.received_requests().await.unwrap().is_empty());
        assert_eq!(portal.navigate(TENANT_HOME), TENANT_HOME);
    }

    #[tokio::test]
    async fn start_with_verification_drops_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/verify-token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"erro": "Token inválido"})))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        seed_session(&tmp, "old");

        let mut cfg = config(&server, &tmp);
        cfg.verify_on_start = true;
        let portal = Portal::start(cfg).await.unwrap();

        assert_eq!(portal.state(), SessionState::Anonymous);
        assert_eq!(portal.location(), LOGIN_PATH);
        assert!(!tmp.path().join(crate::auth::store::SESSION_FILE).exists());
    }

    #[tokio::test]
    async fn start_without_session_skips_verification() {
        let server = MockServer::start().await;
        let tmp = TempDir::new().unwrap();

        let mut cfg = config(&server, &tmp);
        cfg.verify_on_start = true;
        let portal = Portal::start(cfg).await.unwrap();

        assert_eq!(portal.state(), SessionState::Anonymous);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let cfg = PortalConfig::default()
            .with_api_url("ftp://example.com")
            .with_data_dir(tmp.path());
        assert!(matches!(Portal::new(cfg), Err(PortalError::Config(_))));
    }
}
