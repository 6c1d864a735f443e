use reqwest::multipart::Form;
use reqwest::Method;
use tracing::{info, instrument};

use crate::dto::ai_dto::{AiCredentials, AiPayload};
use crate::dto::upload_dto::FileUpload;
use crate::error::Result;
use crate::models::ai::{AiResult, AiTool};
use crate::models::profile::Profile;
use crate::services::api_client::ApiClient;
use crate::utils::validation;

/// Client for the backend's AI helpers. The provider key travels with each
/// request; the backend does the model calls.
#[derive(Clone)]
pub struct AiService {
    api: ApiClient,
}

impl AiService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn base_form(credentials: &AiCredentials) -> Result<Form> {
        validation::validate(credentials)?;
        validation::require_text("api_key", &credentials.api_key)?;
        Ok(Form::new()
            .text("ai_provider", credentials.provider.as_str())
            .text("api_key", credentials.api_key.trim().to_string()))
    }

    #[instrument(skip_all, fields(tool = P::TOOL.path(), provider = %credentials.provider))]
    pub async fn run<P: AiPayload>(&self, credentials: &AiCredentials, payload: &P) -> Result<AiResult> {
        let mut form = Self::base_form(credentials)?;
        for (name, value) in payload.fields()? {
            form = form.text(name, value);
        }
        let result: AiResult = self
            .api
            .send_multipart(Method::POST, P::TOOL.path(), form)
            .await?;
        info!("AI result received");
        Ok(result)
    }

    /// Extracts a profile from a resume. The backend merges and saves it,
    /// then returns the stored profile.
    #[instrument(skip_all, fields(file_name = %resume.file_name, provider = %credentials.provider))]
    pub async fn fill_profile_from_resume(
        &self,
        credentials: &AiCredentials,
        resume: FileUpload,
    ) -> Result<Profile> {
        let form = Self::base_form(credentials)?.part("resume_file", resume.into_part()?);
        let profile: Profile = self
            .api
            .send_multipart(Method::POST, AiTool::FillProfileFromResume.path(), form)
            .await?;
        info!("profile filled from resume");
        Ok(profile)
    }
}
