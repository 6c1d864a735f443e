use bytes::Bytes;
use reqwest::Method;
use tracing::{info, instrument};

use crate::dto::application_dto::ApplicationForm;
use crate::error::Result;
use crate::models::application::Application;
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct ApplicationService {
    api: ApiClient,
}

impl ApplicationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Application>> {
        self.api.get_json("/api/applications").await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Application> {
        self.api.get_json(&format!("/api/applications/{}", id)).await
    }

    /// Validates the form locally, then posts it as multipart.
    #[instrument(skip(self, form), fields(job_title = %form.job_title))]
    pub async fn create(&self, form: ApplicationForm) -> Result<Application> {
        let date = form.check()?;
        let created: Application = self
            .api
            .send_multipart(Method::POST, "/api/applications", form.into_multipart(date)?)
            .await?;
        info!(id = %created.id, "application created");
        Ok(created)
    }

    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &str, form: ApplicationForm) -> Result<Application> {
        let date = form.check()?;
        let updated: Application = self
            .api
            .send_multipart(
                Method::PUT,
                &format!("/api/applications/{}", id),
                form.into_multipart(date)?,
            )
            .await?;
        info!(id = %updated.id, "application updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/api/applications/{}", id)).await?;
        info!("application deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn download_cv(&self, id: &str) -> Result<Bytes> {
        self.api.get_bytes(&format!("/api/applications/{}/cv", id)).await
    }
}
