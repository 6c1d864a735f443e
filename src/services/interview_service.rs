use reqwest::Method;
use tracing::{info, instrument};

use crate::dto::interview_dto::{InterviewPayload, InterviewQuery};
use crate::error::Result;
use crate::models::interview::Interview;
use crate::services::api_client::ApiClient;

/// Transport only. Range and overlap checks belong to the caller, which
/// holds the current interview list.
#[derive(Clone)]
pub struct InterviewService {
    api: ApiClient,
}

impl InterviewService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: Option<InterviewQuery>) -> Result<Vec<Interview>> {
        match query {
            Some(query) => self.api.get_json_with_query("/api/interviews", &query).await,
            None => self.api.get_json("/api/interviews").await,
        }
    }

    #[instrument(skip(self, payload), fields(title = %payload.interview_title))]
    pub async fn create(&self, payload: &InterviewPayload) -> Result<Interview> {
        let created: Interview = self
            .api
            .send_json(Method::POST, "/api/interviews", payload)
            .await?;
        info!(id = %created.id, "interview scheduled");
        Ok(created)
    }

    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: &str, payload: &InterviewPayload) -> Result<Interview> {
        let updated: Interview = self
            .api
            .send_json(Method::PUT, &format!("/api/interviews/{}", id), payload)
            .await?;
        info!(id = %updated.id, "interview rescheduled");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/api/interviews/{}", id)).await?;
        info!("interview deleted");
        Ok(())
    }
}
