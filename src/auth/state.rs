//! Observable session state.
//!
//! One `SessionWriter` (owned by the lifecycle controller) publishes into a
//! `tokio::sync::watch` channel; any number of `SessionObserver`s read the
//! current value or await the next change.

use super::identity::{Identity, Role};
use tokio::sync::watch;

/// Who is logged in, as seen by the rest of the client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    /// A login request is in flight and no prior session exists.
    Authenticating,
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|i| i.role)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Authenticating => "authenticating",
            Self::Authenticated(_) => "authenticated",
        }
    }
}

/// Create a writer/observer pair starting at `Anonymous`.
pub(crate) fn session_channel() -> (SessionWriter, SessionObserver) {
    let (tx, rx) = watch::channel(SessionState::Anonymous);
    (SessionWriter { tx }, SessionObserver { rx })
}

/// Sole write handle. Not cloneable and not exported.
pub(crate) struct SessionWriter {
    tx: watch::Sender<SessionState>,
}

impl SessionWriter {
    /// Publish a new state; returns the one it replaced.
    pub(crate) fn set(&self, next: SessionState) -> SessionState {
        let previous = self.tx.send_replace(next);
        let current = self.tx.borrow();
        if previous.label() != current.label() {
            tracing::debug!(from = previous.label(), to = current.label(), "Session state changed");
        }
        drop(current);
        previous
    }

    pub(crate) fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub(crate) fn observer(&self) -> SessionObserver {
        SessionObserver {
            rx: self.tx.subscribe(),
        }
    }
}

/// Read-only view of the session, cheap to clone.
#[derive(Clone)]
pub struct SessionObserver {
    rx: watch::Receiver<SessionState>,
}

impl SessionObserver {
    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.rx.borrow().clone()
    }

    /// Wait for the next published state. Returns `None` once the controller
    /// is gone.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl std::fmt::Debug for SessionObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionObserver")
            .field("state", &self.rx.borrow().label())
            .finish()
    }
}
