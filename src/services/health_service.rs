use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::services::api_client::ApiClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

#[derive(Clone)]
pub struct HealthService {
    api: ApiClient,
}

impl HealthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn check(&self) -> Result<HealthStatus> {
        self.api.get_json("/health").await
    }
}
