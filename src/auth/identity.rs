//! The authenticated principal and the backend payloads that carry it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Role ─────────────────────────────────────────────────────────

/// Closed set of portal roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Administrator,
    Tenant,
    Employee,
}

impl Role {
    /// Map the backend's `perfil` value. Matching is exact: only `admin`
    /// selects the administrator area and anything unknown is a tenant.
    pub fn from_profile(profile: &str) -> Self {
        match profile {
            "admin" => Self::Administrator,
            "funcionario" => Self::Employee,
            _ => Self::Tenant,
        }
    }

    /// Value written back to the backend / credential store.
    pub fn as_profile(self) -> &'static str {
        match self {
            Self::Administrator => "admin",
            Self::Tenant => "locatario",
            Self::Employee => "funcionario",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Administrator => "Administrator",
            Self::Tenant => "Tenant",
            Self::Employee => "Employee",
        })
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_profile())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::from_profile(&raw))
    }
}

// ── Identity ─────────────────────────────────────────────────────

/// Profile of the logged-in user, as returned under `usuario` by `/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend id. Numeric and string ids are both accepted.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "perfil")]
    pub role: Role,
}

pub(crate) fn id_from_number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

// ── Wire payloads ────────────────────────────────────────────────

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(rename = "senha")]
    pub password: &'a str,
}

/// Successful `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub identity: Identity,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    #[serde(rename = "nome")]
    pub name: &'a str,
    pub email: &'a str,
    #[serde(rename = "senha")]
    pub password: &'a str,
}

/// Error body the backend sends on failure: `{ "erro": "..." }`.
#[derive(Debug, Deserialize)]
pub(crate) struct BackendError {
    #[serde(alias = "error", alias = "message")]
    pub erro: Option<String>,
}

/// Extract the backend's error message from a raw body, if there is one.
pub(crate) fn backend_message(body: &str) -> Option<String> {
    serde_json::from_str::<BackendError>(body)
        .ok()
        .and_then(|b| b.erro)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}
