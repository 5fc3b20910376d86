//! Session and authentication for the portal client.
//!
//! Provides:
//! - Identity and role model matching the backend's `usuario` payload
//! - Durable credential store (token + identity, saved and cleared as a pair)
//! - Observable session state (`tokio::sync::watch`)
//! - Login / registration / token verification against the REST backend
//! - The lifecycle controller, sole writer of store and state
//!
//! ## Design Decisions
//! - Tokens are opaque; nothing here decodes or validates them locally.
//! - Registration never establishes a session; the caller logs in afterwards.
//! - Startup trusts the stored identity (see [`SessionController::rehydrate`]).

pub mod backend;
pub mod controller;
pub mod identity;
pub mod state;
pub mod store;

pub use backend::{AuthBackend, HttpAuthBackend};
pub use controller::SessionController;
pub use identity::{Identity, LoginResponse, Role};
pub use state::{SessionObserver, SessionState};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredSession};
