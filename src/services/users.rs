//! User administration, `/api/usuarios`.

use crate::auth::identity::id_from_number_or_string;
use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::services::item_path;
use serde::{Deserialize, Serialize};

const BASE: &str = "/api/usuarios";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Ativo,
    Inativo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub nome: String,
    pub email: String,
    /// "Administrador", "Locatário" or "Funcionário".
    pub tipo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_registro: Option<String>,
}

pub struct UserService {
    gateway: ApiGateway,
}

impl UserService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.gateway.get(BASE).await
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        self.gateway.get(&item_path(BASE, id)).await
    }

    /// Partial update; only the fields present in `changes` are sent.
    pub async fn update(&self, id: &str, changes: &serde_json::Value) -> Result<User> {
        self.gateway.put(&item_path(BASE, id), changes).await
    }

    pub async fn update_status(&self, id: &str, status: UserStatus) -> Result<User> {
        self.gateway
            .patch(
                &format!("{}/status", item_path(BASE, id)),
                &serde_json::json!({ "status": status }),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gateway.delete(&item_path(BASE, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn update_status_patches_status_field() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/usuarios/7/status"))
            .and(body_json(json!({"status": "Inativo"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "nome": "Carla",
                "email": "c@d.com",
                "tipo": "Funcionário",
                "status": "Inativo"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = UserService::new(test_support::gateway(&server.uri()));
        let user = service.update_status("7", UserStatus::Inativo).await.unwrap();
        assert_eq!(user.id, "7");
        assert_eq!(user.status, UserStatus::Inativo);
        assert_eq!(user.telefone, None);
    }
}
