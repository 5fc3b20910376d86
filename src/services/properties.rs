//! Property listings, `/api/imoveis`.

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::services::item_path;
use serde::{Deserialize, Serialize};

const BASE: &str = "/api/imoveis";

/// One apartment unit as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub grupo: u32,
    pub bloco: String,
    pub andar: i32,
    pub apartamento: u32,
    pub configuracao_planta: String,
    /// Usable area in m².
    pub area_util: f64,
    pub num_vagas_garagem: u32,
    pub tipo_vaga_garagem: String,
    pub preco: f64,
    pub status_anuncio: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imagens: Vec<String>,
}

pub struct PropertyService {
    gateway: ApiGateway,
}

impl PropertyService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Public listing; works without a session.
    pub async fn list(&self) -> Result<Vec<Property>> {
        self.gateway.get(BASE).await
    }

    pub async fn get(&self, id: &str) -> Result<Property> {
        self.gateway.get(&item_path(BASE, id)).await
    }

    /// Create from a JSON payload. Image upload is not handled here.
    pub async fn create(&self, property: &Property) -> Result<Property> {
        self.gateway.post(BASE, property).await
    }

    pub async fn update(&self, id: &str, property: &Property) -> Result<Property> {
        self.gateway.put(&item_path(BASE, id), property).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gateway.delete(&item_path(BASE, id)).await
    }
}
