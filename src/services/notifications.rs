//! In-app notifications, `/api/notifications`.

use crate::error::Result;
use crate::gateway::ApiGateway;
use crate::services::item_path;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

const BASE: &str = "/api/notifications";

const BILLING_SENDER: &str = "financeiro@imobiliariafirenze.com.br";
const REGISTRY_SENDER: &str = "cadastro@imobiliariafirenze.com.br";
pub(crate) const LEGAL_SENDER: &str = "doc@imobiliariafirenze.com.br";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub titulo: String,
    pub mensagem: String,
    pub tipo: NotificationKind,
    pub destinatario: String,
    pub remetente: String,
    pub lida: bool,
    pub urgente: bool,
    pub data_envio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_leitura: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Payload for creating a notification; the backend assigns id and send date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub titulo: String,
    pub mensagem: String,
    pub tipo: NotificationKind,
    pub destinatario: String,
    pub remetente: String,
    pub lida: bool,
    pub urgente: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Serialize)]
struct BulkBilling<'a> {
    contratos: &'a [String],
    remetente: &'static str,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DueReminders {
    dias_antecedencia: u32,
    remetente: &'static str,
}

#[derive(Serialize)]
struct LegalNotice<'a> {
    tipo: &'a str,
    destinatario: &'a str,
    dados: &'a serde_json::Value,
    remetente: &'static str,
    timestamp: DateTime<Utc>,
}

pub struct NotificationService {
    gateway: ApiGateway,
}

impl NotificationService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// All notifications, or only those addressed to `user_id`.
    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Notification>> {
        match user_id {
            Some(id) => self.gateway.get_with_query(BASE, &[("userId", id)]).await,
            None => self.gateway.get(BASE).await,
        }
    }

    pub async fn create(&self, notification: &NewNotification) -> Result<Notification> {
        self.gateway.post(BASE, notification).await
    }

    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.gateway
            .execute(Method::PATCH, &format!("{}/read", item_path(BASE, id)))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.gateway.delete(&item_path(BASE, id)).await
    }

    /// Send rent billing for each listed contract in one batch.
    pub async fn send_bulk_billing(&self, contracts: &[String]) -> Result<()> {
        let body = BulkBilling {
            contratos: contracts,
            remetente: BILLING_SENDER,
            timestamp: Utc::now(),
        };
        self.gateway
            .submit(Method::POST, &format!("{BASE}/cobrancas-lote"), &body)
            .await
    }

    /// Schedule payment reminders `days_ahead` days before each due date.
    pub async fn create_due_reminders(&self, days_ahead: u32) -> Result<()> {
        let body = DueReminders {
            dias_antecedencia: days_ahead,
            remetente: REGISTRY_SENDER,
        };
        self.gateway
            .submit(Method::POST, &format!("{BASE}/lembretes-vencimento"), &body)
            .await
    }

    /// Legal notification delivered through the notification channel.
    pub async fn send_legal(&self, kind: &str, recipient: &str, data: &serde_json::Value) -> Result<()> {
        let body = LegalNotice {
            tipo: kind,
            destinatario: recipient,
            dados: data,
            remetente: LEGAL_SENDER,
            timestamp: Utc::now(),
        };
        self.gateway
            .submit(Method::POST, &format!("{BASE}/juridico"), &body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_filters_by_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .and(query_param("userId", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "_id": "n1",
                "titulo": "Boleto disponível",
                "mensagem": "Seu boleto de outubro está disponível.",
                "tipo": "info",
                "destinatario": "2",
                "remetente": "financeiro",
                "lida": false,
                "urgente": false,
                "dataEnvio": "2026-10-01T12:00:00Z"
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let service = NotificationService::new(test_support::gateway(&server.uri()));
        let list = service.list(Some("2")).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].tipo, NotificationKind::Info);
        assert!(!list[0].lida);
    }

    #[tokio::test]
    async fn mark_read_ignores_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/notifications/n1/read"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = NotificationService::new(test_support::gateway(&server.uri()));
        service.mark_read("n1").await.unwrap();
    }

    #[tokio::test]
    async fn user_filter_is_a_single_encoded_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/notifications"))
            .and(query_param("userId", "a&lida=true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let service = NotificationService::new(test_support::gateway(&server.uri()));
        assert!(service.list(Some("a&lida=true")).await.unwrap().is_empty());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query_pairs().count(), 1);
    }

    #[tokio::test]
    async fn ids_are_encoded_as_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/notifications/n1%2Fread"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = NotificationService::new(test_support::gateway(&server.uri()));
        service.delete("n1/read").await.unwrap();
    }

    #[tokio::test]
    async fn bulk_billing_posts_contracts_with_timestamp() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/notifications/cobrancas-lote"))
            .and(body_partial_json(json!({
                "contratos": ["k1", "k2"],
                "remetente": "financeiro@imobiliariafirenze.com.br"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"enviadas": 2})))
            .expect(1)
            .mount(&server)
            .await;

        let service = NotificationService::new(test_support::gateway(&server.uri()));
        service
            .send_bulk_billing(&["k1".to_string(), "k2".to_string()])
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let stamp = body["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");
    }

    #[tokio::test]
    async fn due_reminders_send_lead_days() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/notifications/lembretes-vencimento"))
            .and(body_json(json!({
                "diasAntecedencia": 7,
                "remetente": "cadastro@imobiliariafirenze.com.br"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let service = NotificationService::new(test_support::gateway(&server.uri()));
        service.create_due_reminders(7).await.unwrap();
    }

    #[tokio::test]
    async fn legal_notification_carries_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/notifications/juridico"))
            .and(body_partial_json(json!({
                "tipo": "despejo",
                "destinatario": "2",
                "dados": {"contrato": "k9"},
                "remetente": "doc@imobiliariafirenze.com.br"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let service = NotificationService::new(test_support::gateway(&server.uri()));
        service
            .send_legal("despejo", "2", &json!({"contrato": "k9"}))
            .await
            .unwrap();
    }
}
