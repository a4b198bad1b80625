use crate::{
    error::{PanelGenError, Result},
    gemini::ApiContext,
    models::{
        Content, GenerateContentRequest, GenerationConfig, ImageGenerationRequest, StreamChunk,
    },
};
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use tokio_stream::wrappers::ReceiverStream;

#[derive(Clone)]
pub struct ImageClient {
    api: ApiContext,
    default_model: String,
}

impl ImageClient {
    pub(crate) fn new(api: ApiContext, default_model: String) -> Self {
        Self { api, default_model }
    }

    /// Issue one streaming image-generation request and expose the SSE
    /// response as a stream of decoded chunks.
    ///
    /// The request asks for both TEXT and IMAGE modalities; each decoded
    /// chunk may carry any mix of text and inline-image parts. The first
    /// transport or decode error terminates the stream.
    pub async fn generate_stream(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>> {
        let model_id = request.model_id.as_deref().unwrap_or(&self.default_model);

        let payload = GenerateContentRequest {
            contents: vec![Content::user_text(&request.prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                ..Default::default()
            }),
        };

        let url = format!(
            "{}?alt=sse",
            self.api.endpoint(model_id, "streamGenerateContent")
        );

        log::info!("Invoking streaming image model: {}", model_id);

        let response = self
            .api
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PanelGenError::TransportError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Image generation failed: HTTP {} - {}", status, body);
            return Err(PanelGenError::TransportError(format!(
                "image model returned HTTP {}: {}",
                status, body
            )));
        }

        // Bridge the SSE byte stream to a chunk stream through a channel,
        // buffering bytes until each complete line is available.
        let (tx, rx) = tokio::sync::mpsc::channel(100);
        let mut byte_stream = response.bytes_stream();

        tokio::spawn(async move {
            let mut buffer: Vec<u8> = Vec::new();

            'outer: loop {
                match byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        buffer.extend_from_slice(&bytes);

                        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
                            let mut rest = buffer.split_off(pos + 1);
                            std::mem::swap(&mut buffer, &mut rest);
                            let line = String::from_utf8_lossy(&rest).into_owned();

                            if let Some(result) = Self::parse_sse_line(&line) {
                                let failed = result.is_err();
                                if tx.send(result).await.is_err() || failed {
                                    break 'outer;
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        let _ = tx
                            .send(Err(PanelGenError::TransportError(e.to_string())))
                            .await;
                        break;
                    }
                    None => {
                        // Final line may arrive without a trailing newline.
                        let line = String::from_utf8_lossy(&buffer).into_owned();
                        if let Some(result) = Self::parse_sse_line(&line) {
                            let _ = tx.send(result).await;
                        }
                        break;
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    /// Decode one SSE line. Returns `None` for blank lines, comments, and
    /// non-data fields; `Some(Err(..))` for an unparseable data payload.
    fn parse_sse_line(line: &str) -> Option<Result<StreamChunk>> {
        let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
        if line.is_empty() || line.starts_with(':') {
            return None;
        }

        let payload = line.strip_prefix("data:")?.trim_start();
        if payload.is_empty() || payload == "[DONE]" {
            return None;
        }

        Some(
            serde_json::from_str::<StreamChunk>(payload)
                .map_err(|e| PanelGenError::ResponseError(format!("malformed chunk: {}", e))),
        )
    }
}
