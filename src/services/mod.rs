//! Domain services over the request gateway.
//!
//! Each service only knows its endpoint paths and payload shapes. Token
//! attachment and 401 handling live in [`ApiGateway`](crate::gateway::ApiGateway).

pub mod legal;
pub mod notifications;
pub mod properties;
pub mod status;
pub mod users;

pub use legal::{LegalCase, LegalDocument, LegalService, NewLegalCase};
pub use notifications::{NewNotification, Notification, NotificationKind, NotificationService};
pub use properties::{Property, PropertyService};
pub use status::StatusService;
pub use users::{User, UserService, UserStatus};

/// `base/id` with `id` percent-encoded as a single path segment.
pub(crate) fn item_path(base: &str, id: &str) -> String {
    format!("{base}/{}", urlencoding::encode(id))
}


#[cfg(test)]
pub(crate) mod test_support {
    use crate::auth::{Identity, MemoryCredentialStore, Role};
    use crate::gateway::{ApiGateway, RejectionHandler};
    use std::sync::Arc;

    struct Ignore;

    impl RejectionHandler for Ignore {
        fn session_rejected(&self, _token_used: Option<&str>) {}
    }

    /// Gateway against `base_url` holding an admin token `t1`.
    pub(crate) fn gateway(base_url: &str) -> ApiGateway {
        let admin = Identity {
            id: "1".into(),
            name: "Ana".into(),
            email: "a@b.com".into(),
            role: Role::Administrator,
        };
        ApiGateway::new(
            reqwest::Client::new(),
            base_url,
            Arc::new(MemoryCredentialStore::with_session("t1", admin)),
            Arc::new(Ignore),
        )
    }
}
