//! Durable credential store.
//!
//! Holds the session token and the last-known identity under two fixed
//! keys, `token` and `user`. Both live in one JSON document so a save is
//! observed whole or not at all:
//!
//! ```text
//! <data_dir>/session.json
//! { "token": "...", "user": { "id": ..., "nome": ..., "email": ..., "perfil": ... } }
//! ```
//!
//! Writes go to a temp file in the same directory and are renamed over the
//! target. The store does not judge token freshness; that is left to the
//! gateway.

use super::identity::Identity;
use crate::error::{PortalError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the persisted session inside the data directory.
pub const SESSION_FILE: &str = "session.json";

/// Token + identity pair, always saved and retired together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(rename = "user")]
    pub identity: Identity,
}

/// Key/value persistence for the current session.
pub trait CredentialStore: Send + Sync {
    /// Persist token and identity as one unit.
    fn save(&self, token: &str, identity: &Identity) -> Result<()>;

    /// Last saved pair, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<StoredSession>>;

    /// Remove both keys. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;

    /// Current token, read fresh on every call. Unreadable state counts as absent.
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(stored) => stored.map(|s| s.token),
            Err(e) => {
                tracing::warn!("Credential store unreadable: {e}");
                None
            }
        }
    }
}

// ── File-backed store ────────────────────────────────────────────

/// Credential store backed by a single JSON file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store rooted at `data_dir`. The directory is created on first save.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, token: &str, identity: &Identity) -> Result<()> {
        let stored = StoredSession {
            token: token.to_string(),
            identity: identity.clone(),
        };
        let payload = serde_json::to_vec_pretty(&stored)?;

        std::fs::create_dir_all(self.dir())?;
        let mut tmp = tempfile::NamedTempFile::new_in(self.dir())?;
        tmp.write_all(&payload)?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o600))?;
        }

        tmp.persist(&self.path)
            .map_err(|e| PortalError::Storage(format!("{}: {}", self.path.display(), e.error)))?;
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredSession = serde_json::from_str(&raw).map_err(|e| {
            PortalError::Storage(format!("corrupt session file {}: {e}", self.path.display()))
        })?;

        if stored.token.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(stored))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── In-memory store ──────────────────────────────────────────────

/// Non-durable store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<StoredSession>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a session, as if saved by an earlier run.
    pub fn with_session(token: &str, identity: Identity) -> Self {
        Self {
            slot: Mutex::new(Some(StoredSession {
                token: token.to_string(),
                identity,
            })),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, token: &str, identity: &Identity) -> Result<()> {
        *self.slot.lock() = Some(StoredSession {
            token: token.to_string(),
            identity: identity.clone(),
        });
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.slot.lock().clone())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::Role;
    use tempfile::TempDir;

    fn tenant() -> Identity {
        Identity {
            id: "2".into(),
            name: "Bruno".into(),
            email: "b@c.com".into(),
            role: Role::Tenant,
        }
    }

    fn test_store() -> (TempDir, FileCredentialStore) {
        let tmp = TempDir::new().unwrap();
        let store = FileCredentialStore::new(&tmp.path().join("nested"));
        (tmp, store)
    }

    #[test]
    fn load_empty_store_is_absent() {
        let (_tmp, store) = test_store();
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn save_then_load_returns_pair() {
        let (_tmp, store) = test_store();
        store.save("t2", &tenant()).unwrap();

        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.token, "t2");
        assert_eq!(stored.identity, tenant());
        assert_eq!(store.token().as_deref(), Some("t2"));
    }

    #[test]
    fn save_replaces_previous_pair() {
        let (_tmp, store) = test_store();
        store.save("old", &tenant()).unwrap();

        let admin = Identity {
            role: Role::Administrator,
            ..tenant()
        };
        store.save("new", &admin).unwrap();

        let stored = store.load().unwrap().unwrap();
        assert_eq!(stored.token, "new");
        assert_eq!(stored.identity.role, Role::Administrator);
    }

    #[test]
    fn clear_then_load_is_absent_and_idempotent() {
        let (_tmp, store) = test_store();
        store.save("t2", &tenant()).unwrap();

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn persisted_file_uses_fixed_keys() {
        let (_tmp, store) = test_store();
        store.save("t2", &tenant()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["token"], "t2");
        assert_eq!(value["user"]["nome"], "Bruno");
        assert_eq!(value["user"]["perfil"], "locatario");
    }

    #[test]
    fn survives_a_new_store_instance() {
        let tmp = TempDir::new().unwrap();
        FileCredentialStore::new(tmp.path())
            .save("t2", &tenant())
            .unwrap();

        let reopened = FileCredentialStore::new(tmp.path());
        assert_eq!(reopened.token().as_deref(), Some("t2"));
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(SESSION_FILE), "{not json").unwrap();

        let store = FileCredentialStore::new(tmp.path());
        assert!(matches!(store.load(), Err(PortalError::Storage(_))));
        assert_eq!(store.token(), None);
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, store) = test_store();
        store.save("t2", &tenant()).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save("t1", &tenant()).unwrap();
        assert_eq!(store.token().as_deref(), Some("t1"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
