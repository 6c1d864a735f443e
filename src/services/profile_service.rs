use reqwest::multipart::Form;
use reqwest::Method;
use tracing::{info, instrument};

use crate::dto::profile_dto::ProfileForm;
use crate::dto::upload_dto::FileUpload;
use crate::error::Result;
use crate::models::profile::Profile;
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Profile> {
        self.api.get_json("/api/profile").await
    }

    #[instrument(skip(self, profile))]
    pub async fn save(&self, profile: &Profile) -> Result<Profile> {
        ProfileForm::check(profile)?;
        let saved: Profile = self
            .api
            .send_json(Method::POST, "/api/profile", profile)
            .await?;
        info!("profile saved");
        Ok(saved)
    }

    /// Attaches a CV to the profile. The backend answers with the updated profile.
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn upload_cv(&self, file: FileUpload) -> Result<Profile> {
        let form = Form::new().part("cv_file", file.into_part()?);
        let saved: Profile = self
            .api
            .send_multipart(Method::POST, "/api/profile/upload-cv", form)
            .await?;
        info!(cv = ?saved.cv_profile_file, "profile CV uploaded");
        Ok(saved)
    }
}
