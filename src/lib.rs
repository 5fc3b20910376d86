//! Client-side session and authentication for the Imobiliária Firenze portal.
//!
//! Holds who the current user is, keeps their token across restarts, attaches
//! it to every backend call, and ends the session the moment the backend
//! rejects it. Page access is decided by [`routes::RoutePolicy`] from the
//! current [`auth::SessionState`].
//!
//! Start with [`Portal`], which wires all of it from a [`PortalConfig`].

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod portal;
pub mod routes;
pub mod services;

pub use config::PortalConfig;
pub use error::{PortalError, Result};
pub use portal::Portal;
