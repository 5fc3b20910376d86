//! Legal documents and cases, `/api/juridico/*`.

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::services::item_path;
use crate::services::notifications::LEGAL_SENDER;
use reqwest::Method;
use serde::{Deserialize, Serialize};

const DOCUMENTS: &str = "/api/juridico/documentos";
const CASES: &str = "/api/juridico/processos";
const NOTICES: &str = "/api/juridico/notificacoes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub titulo: String,
    /// Contrato, Adendo, Notificação, Procuração, Distrato, Vistoria, Outros.
    pub tipo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    /// URL or path of the stored file.
    pub arquivo: String,
    pub tamanho: String,
    pub formato: String,
    pub autor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrato_relacionado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imovel_relacionado: Option<String>,
    pub status: String,
    pub data_criacao: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalCase {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub numero: String,
    pub tipo: String,
    pub contrato_id: String,
    pub status: String,
    pub prioridade: String,
    pub descricao: String,
    pub advogado_responsavel: String,
    pub data_abertura: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_prazo: Option<String>,
    #[serde(default)]
    pub documentos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
}

/// Payload for opening a case; the backend assigns id and opening date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLegalCase {
    pub numero: String,
    pub tipo: String,
    pub contrato_id: String,
    pub status: String,
    pub prioridade: String,
    pub descricao: String,
    pub advogado_responsavel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_prazo: Option<String>,
    pub documentos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
}

#[derive(Serialize)]
struct CaseNotice<'a> {
    tipo: &'a str,
    destinatario: &'a str,
    dados: &'a serde_json::Value,
    remetente: &'static str,
}

pub struct LegalService {
    gateway: ApiGateway,
}

impl LegalService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    pub async fn documents(&self) -> Result<Vec<LegalDocument>> {
        self.gateway.get(DOCUMENTS).await
    }

    pub async fn document(&self, id: &str) -> Result<LegalDocument> {
        self.gateway.get(&item_path(DOCUMENTS, id)).await
    }

    pub async fn update_document(&self, id: &str, changes: &serde_json::Value) -> Result<LegalDocument> {
        self.gateway.put(&item_path(DOCUMENTS, id), changes).await
    }

    pub async fn delete_document(&self, id: &str) -> Result<()> {
        self.gateway.delete(&item_path(DOCUMENTS, id)).await
    }

    pub async fn cases(&self) -> Result<Vec<LegalCase>> {
        self.gateway.get(CASES).await
    }

    pub async fn case(&self, id: &str) -> Result<LegalCase> {
        self.gateway.get(&item_path(CASES, id)).await
    }

    pub async fn create_case(&self, case: &NewLegalCase) -> Result<LegalCase> {
        self.gateway.post(CASES, case).await
    }

    /// Partial update; only the fields present in `changes` are sent.
    pub async fn update_case(&self, id: &str, changes: &serde_json::Value) -> Result<LegalCase> {
        self.gateway.put(&item_path(CASES, id), changes).await
    }

    pub async fn delete_case(&self, id: &str) -> Result<()> {
        self.gateway.delete(&item_path(CASES, id)).await
    }

    /// Automatic notice tied to a legal process.
    pub async fn send_notice(&self, kind: &str, recipient: &str, data: &serde_json::Value) -> Result<()> {
        let body = CaseNotice {
            tipo: kind,
            destinatario: recipient,
            dados: data,
            remetente: LEGAL_SENDER,
        };
        self.gateway.submit(Method::POST, NOTICES, &body).await
    }
}
