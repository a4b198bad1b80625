pub mod image_client;
pub mod text_client;

use crate::{
    config::GeminiConfig,
    error::{PanelGenError, Result},
};
use reqwest::Client;
use std::time::Duration;

pub use image_client::ImageClient;
pub use text_client::TextClient;

/// Shared HTTP handle plus the request pieces every call needs.
#[derive(Clone)]
pub struct ApiContext {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

impl ApiContext {
    pub(crate) fn endpoint(&self, model_id: &str, operation: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, model_id, operation)
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| PanelGenError::CredentialError("no API key configured".into()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| PanelGenError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        let api = ApiContext {
            http,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            api_key,
        };

        Ok(Self {
            text_client: TextClient::new(api.clone(), config.text_model().to_string()),
            image_client: ImageClient::new(api, config.image_model().to_string()),
        })
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}
