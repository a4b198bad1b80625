use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::StreamExt;
use panelgen::{
    GeminiClient, GeminiConfig, ImageGenerationRequest, NullSink, PanelGenError, PanelRenderer,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE_MODEL: &str = "panel-model";

fn test_client(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig::new()
        .with_api_key("test-key")
        .with_base_url(server.uri())
        .with_text_model("script-model")
        .with_image_model(IMAGE_MODEL);

    GeminiClient::new(config).unwrap()
}

fn image_path() -> String {
    format!("/v1beta/models/{}:streamGenerateContent", IMAGE_MODEL)
}

fn inline_image(bytes: &[u8]) -> serde_json::Value {
    json!({"inlineData": {"mimeType": "image/png", "data": STANDARD.encode(bytes)}})
}

#[tokio::test]
async fn stream_decodes_chunks_in_order() {
    let server = MockServer::start().await;

    let body = format!(
        "data: {}\n\ndata: {}\n\n",
        json!({"candidates": [{"content": {"parts": [{"text": "first"}]}}]}),
        json!({"candidates": [{"content": {"parts": [inline_image(b"png-bytes")]}}]}),
    );

    Mock::given(method("POST"))
        .and(path(image_path()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/event-stream"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut stream = client
        .image()
        .generate_stream(ImageGenerationRequest {
            prompt: "a fox".to_string(),
            model_id: None,
        })
        .await
        .unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.text(), "first");

    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(second.text(), "");
    assert_eq!(second.parts().count(), 1);

    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn malformed_chunk_terminates_the_stream() {
    let server = MockServer::start().await;

    let body = format!(
        "data: {}\n\ndata: {{broken\n\ndata: {}\n\n",
        json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}),
        json!({"candidates": [{"content": {"parts": [{"text": "never delivered"}]}}]}),
    );

    Mock::given(method("POST"))
        .and(path(image_path()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/event-stream"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut stream = client
        .image()
        .generate_stream(ImageGenerationRequest {
            prompt: "a fox".to_string(),
            model_id: None,
        })
        .await
        .unwrap();

    assert!(stream.next().await.unwrap().is_ok());

    let error = stream.next().await.unwrap();
    assert!(matches!(error, Err(PanelGenError::ResponseError(_))));

    // The error is terminal; the valid chunk after it is never surfaced.
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn http_error_surfaces_before_any_chunk() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(image_path()))
        .respond_with(ResponseTemplate::new(403).set_body_string("key rejected"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let result = client
        .image()
        .generate_stream(ImageGenerationRequest {
            prompt: "a fox".to_string(),
            model_id: None,
        })
        .await;

    match result {
        Err(PanelGenError::TransportError(detail)) => {
            assert!(detail.contains("403"));
            assert!(detail.contains("key rejected"));
        }
        other => panic!("expected a transport error, got {:?}", other.map(|_| ())),
    }
}

/// One SSE chunk interleaving [text, image, text, image] yields two
/// slides for a single panel.
#[tokio::test]
async fn interleaved_chunk_yields_two_slides() {
    let server = MockServer::start().await;

    let script = json!({
        "characterDescription": "A red fox wearing a blue scarf",
        "panels": [{"text": "The fox wakes up."}]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/v1beta/models/script-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": script}]}}]
        })))
        .mount(&server)
        .await;

    let interleaved = json!({"candidates": [{"content": {"parts": [
        {"text": "A"},
        inline_image(b"img-1"),
        {"text": "B"},
        inline_image(b"img-2"),
    ]}}]});

    Mock::given(method("POST"))
        .and(path(image_path()))
        .and(body_string_contains("The fox wakes up."))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(format!("data: {}\n\n", interleaved).into_bytes(), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut renderer = PanelRenderer::new(test_client(&server));
    let report = renderer.generate("A fox story.", &mut NullSink).await;

    assert!(report.is_done(), "unexpected outcome: {:?}", report.outcome);
    assert_eq!(report.slides.len(), 2);
    assert_eq!(report.slides[0].text, "A");
    assert_eq!(report.slides[0].image.bytes, b"img-1");
    assert_eq!(report.slides[1].text, "B");
    assert_eq!(report.slides[1].image.bytes, b"img-2");
}

/// Leftover text with no image partner is dropped, but the panel still
/// fails only if it produced zero slides.
#[tokio::test]
async fn trailing_unpaired_text_is_discarded() {
    let server = MockServer::start().await;

    let script = json!({
        "characterDescription": "A red fox wearing a blue scarf",
        "panels": [{"text": "The fox wakes up."}]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/v1beta/models/script-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": script}]}}]
        })))
        .mount(&server)
        .await;

    let body = format!(
        "data: {}\n\ndata: {}\n\n",
        json!({"candidates": [{"content": {"parts": [{"text": "Caption"}, inline_image(b"img-1")]}}]}),
        json!({"candidates": [{"content": {"parts": [{"text": "orphan epilogue"}]}}]}),
    );

    Mock::given(method("POST"))
        .and(path(image_path()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/event-stream"))
        .mount(&server)
        .await;

    let mut renderer = PanelRenderer::new(test_client(&server));
    let report = renderer.generate("A fox story.", &mut NullSink).await;

    assert!(report.is_done(), "unexpected outcome: {:?}", report.outcome);
    assert_eq!(report.slides.len(), 1);
    assert_eq!(report.slides[0].text, "Caption");
}
