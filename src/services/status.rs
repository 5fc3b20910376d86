//! Server health, `GET /api/status`.

use crate::error::Result;
use crate::gateway::ApiGateway;

pub struct StatusService {
    gateway: ApiGateway,
}

impl StatusService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Raw status document reported by the backend.
    pub async fn check(&self) -> Result<serde_json::Value> {
        self.gateway.get("/api/status").await
    }
}
