//! Route access policy.
//!
//! Three areas:
//! - public: `/`, `/imoveis`, `/sobre`, `/contato`, `/login`, anything unknown
//! - admin: `/admin` and everything below it
//! - tenant: `/locatario` and everything below it
//!
//! Anonymous sessions are sent to `/login` before a protected area renders.
//! With role enforcement on (the default), each role is also kept to its own
//! area. After login, administrators land on `/admin` and every other role on
//! `/locatario`.

use crate::auth::{Role, SessionState};
use parking_lot::Mutex;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_HOME: &str = "/admin";
pub const TENANT_HOME: &str = "/locatario";
pub const PUBLIC_HOME: &str = "/";

/// Application area a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Public,
    Admin,
    Tenant,
}

impl Area {
    pub fn of(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        if under(path, ADMIN_HOME) {
            Self::Admin
        } else if under(path, TENANT_HOME) {
            Self::Tenant
        } else {
            Self::Public
        }
    }

    pub fn is_protected(self) -> bool {
        !matches!(self, Self::Public)
    }
}

fn under(path: &str, root: &str) -> bool {
    path == root || path.strip_prefix(root).is_some_and(|rest| rest.starts_with('/'))
}

/// Landing page after a successful login. The only place role picks a destination.
pub fn landing_for(role: Role) -> &'static str {
    if role.is_admin() {
        ADMIN_HOME
    } else {
        TENANT_HOME
    }
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct RoutePolicy {
    enforce_roles: bool,
}

impl RoutePolicy {
    pub fn new(enforce_roles: bool) -> Self {
        Self { enforce_roles }
    }

    pub fn check(&self, path: &str, session: &SessionState) -> Access {
        let area = Area::of(path);
        if !area.is_protected() {
            return Access::Allow;
        }

        let Some(role) = session.role() else {
            return Access::Redirect(LOGIN_PATH);
        };

        if !self.enforce_roles {
            return Access::Allow;
        }

        match (area, role.is_admin()) {
            (Area::Admin, false) | (Area::Tenant, true) => Access::Redirect(landing_for(role)),
            _ => Access::Allow,
        }
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new(true)
    }
}

// ── Navigation ───────────────────────────────────────────────────

/// Something that can move the client to another location.
pub trait Navigator: Send + Sync {
    /// Go to `to`. Redirecting to the current location is a no-op.
    fn redirect(&self, to: &str);

    fn location(&self) -> String;
}

/// Current client location, guarded by the route policy.
pub struct Router {
    policy: RoutePolicy,
    location: Mutex<String>,
}

impl Router {
    pub fn new(policy: RoutePolicy) -> Self {
        Self {
            policy,
            location: Mutex::new(PUBLIC_HOME.to_string()),
        }
    }

    /// Navigate to `path` under `session`; returns where the client ended up.
    pub fn navigate(&self, path: &str, session: &SessionState) -> String {
        let target = match self.policy.check(path, session) {
            Access::Allow => path.to_string(),
            Access::Redirect(to) => {
                tracing::info!(requested = path, redirect = to, "Navigation redirected");
                to.to_string()
            }
        };
        *self.location.lock() = target.clone();
        target
    }

    pub fn policy(&self) -> RoutePolicy {
        self.policy
    }
}

impl Navigator for Router {
    fn redirect(&self, to: &str) {
        let mut location = self.location.lock();
        if *location == to {
            return;
        }
        tracing::debug!(from = %location, to, "Redirect");
        *location = to.to_string();
    }

    fn location(&self) -> String {
        self.location.lock().clone()
    }
}
