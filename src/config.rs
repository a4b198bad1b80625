use crate::error::{PanelGenError, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Name of the persisted credential file under the user config directory.
const API_KEY_FILE: &str = "api_key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: None,
            text_model: None,
            image_model: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY").ok();
        let base_url = env::var("GEMINI_BASE_URL").ok();
        let text_model = env::var("GEMINI_TEXT_MODEL").ok();
        let image_model = env::var("GEMINI_IMAGE_MODEL").ok();

        GeminiConfig {
            api_key,
            base_url,
            text_model,
            image_model,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = Some(model.into());
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn text_model(&self) -> &str {
        self.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn image_model(&self) -> &str {
        self.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| PanelGenError::ConfigError("could not determine config directory".into()))?
        .join("panelgen");

    fs::create_dir_all(&dir)
        .map_err(|e| PanelGenError::ConfigError(format!("failed to create config dir: {}", e)))?;

    Ok(dir)
}

pub fn api_key_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(API_KEY_FILE))
}

/// Load a previously saved API key, if any. Env takes precedence over the key file.
pub fn load_api_key() -> Option<String> {
    if let Ok(key) = env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            return Some(key);
        }
    }

    let path = api_key_path().ok()?;
    let key = fs::read_to_string(path).ok()?;
    let key = key.trim().to_string();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

pub fn save_api_key(key: &str) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(PanelGenError::CredentialError(
            "refusing to save an empty API key".into(),
        ));
    }

    let path = api_key_path()?;
    fs::write(&path, key)
        .map_err(|e| PanelGenError::CredentialError(format!("failed to save API key: {}", e)))?;

    log::debug!("API key saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = GeminiConfig::new()
            .with_api_key("k")
            .with_base_url("http://localhost:9000")
            .with_text_model("text-model")
            .with_image_model("image-model");

        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.base_url(), "http://localhost:9000");
        assert_eq!(config.text_model(), "text-model");
        assert_eq!(config.image_model(), "image-model");
    }

    #[test]
    fn defaults_point_at_gemini() {
        let config = GeminiConfig::new();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.text_model(), DEFAULT_TEXT_MODEL);
        assert_eq!(config.image_model(), DEFAULT_IMAGE_MODEL);
    }
}
