use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct TextGenerationRequest {
    pub prompt: String,
    pub max_tokens: Option<i32>,
    pub temperature: Option<f32>,
    pub model_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TextGenerationResponse {
    pub text: String,
    pub model: String,
}
