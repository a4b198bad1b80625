use crate::{
    error::{PanelGenError, Result},
    gemini::ApiContext,
    models::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
        TextGenerationRequest, TextGenerationResponse,
    },
};

#[derive(Clone)]
pub struct TextClient {
    api: ApiContext,
    default_model: String,
}

impl TextClient {
    pub(crate) fn new(api: ApiContext, default_model: String) -> Self {
        Self { api, default_model }
    }

    /// One non-streaming `generateContent` call. Returns the concatenated
    /// text of the response candidates; emptiness is the caller's concern.
    pub async fn generate(&self, request: TextGenerationRequest) -> Result<TextGenerationResponse> {
        let model_id = request.model_id.as_deref().unwrap_or(&self.default_model);

        let payload = GenerateContentRequest {
            contents: vec![Content::user_text(&request.prompt)],
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                response_modalities: None,
            }),
        };

        log::info!("Invoking text model: {}", model_id);
        log::debug!(
            "Text generation prompt: {} characters",
            request.prompt.len()
        );

        let response = self
            .api
            .http
            .post(self.api.endpoint(model_id, "generateContent"))
            .header("x-goog-api-key", &self.api.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PanelGenError::TransportError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Text generation failed: HTTP {} - {}", status, body);
            return Err(PanelGenError::TransportError(format!(
                "text model returned HTTP {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PanelGenError::ResponseError(e.to_string()))?;

        Ok(TextGenerationResponse {
            text: body.text(),
            model: model_id.to_string(),
        })
    }
}
