pub mod config;
pub mod controller;
pub mod dto;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod store;
pub mod utils;

use crate::config::Config;
use crate::controller::Controller;
use crate::dto::ai_dto::AiCredentials;
use crate::error::{Error, Result};
use crate::services::api_client::ApiClient;

pub struct AppState {
    pub controller: Controller,
    pub config: Config,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::new(&config.api_url, config.request_timeout)?;
        Ok(Self {
            controller: Controller::new(api),
            config: config.clone(),
        })
    }

    /// Provider and key for the AI endpoints; explicit values win over config.
    pub fn ai_credentials(
        &self,
        provider: Option<models::ai::AiProvider>,
        api_key: Option<String>,
    ) -> Result<AiCredentials> {
        let api_key = api_key
            .or_else(|| self.config.ai_api_key.clone())
            .ok_or_else(|| {
                Error::Validation(
                    "an AI API key is required (--api-key or JOBTRACK_AI_API_KEY)".to_string(),
                )
            })?;
        Ok(AiCredentials {
            provider: provider.unwrap_or(self.config.ai_provider),
            api_key,
        })
    }
}
