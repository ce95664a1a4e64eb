#![cfg(feature = "deepai")]

use genstudio::image::placeholder_for;
use genstudio::{
    AspectRatio, DeepAiProvider, GenStudioError, GenerationRequest, ImageFormat, ImageProviderExt,
    StyleTag, Studio,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_BYTES: [u8; 16] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R',
];

fn provider_for(server: &MockServer) -> DeepAiProvider {
    DeepAiProvider::builder()
        .api_key("deep-key")
        .base_url(format!("{}/api/text2img", server.uri()))
        .build()
}

#[tokio::test]
async fn output_url_is_returned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/text2img"))
        .and(header("api-key", "deep-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "job-1",
            "output_url": "https://api.deepai.test/job-1/output.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new("a red bicycle").with_style(StyleTag::Anime);
    let image = provider_for(&server).generate_image(&request).await.unwrap();
    assert_eq!(image.url, "https://api.deepai.test/job-1/output.png");
}

#[tokio::test]
async fn http_error_falls_back_to_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/text2img"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"status": "unauthorized"})))
        .mount(&server)
        .await;

    let request = GenerationRequest::new("a red bicycle").with_style(StyleTag::Anime);
    let image = provider_for(&server).generate_image(&request).await.unwrap();
    assert_eq!(image.url, placeholder_for(StyleTag::Anime));
}

#[tokio::test]
async fn bare_429_falls_back_to_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/text2img"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new("a red bicycle").with_style(StyleTag::ThreeD);
    let image = provider_for(&server).generate_image(&request).await.unwrap();
    assert_eq!(image.url, placeholder_for(StyleTag::ThreeD));
}

#[tokio::test]
async fn raw_prompt_is_sent_as_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/text2img"))
        .and(body_string_contains("a red bicycle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output_url": "https://api.deepai.test/job-2/output.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new("a red bicycle").with_style(StyleTag::Anime);
    provider_for(&server).generate_image(&request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body);
    assert!(!body.contains("manga art"));
    server.verify().await;
}

#[tokio::test]
async fn missing_key_is_a_config_error() {
    let provider = DeepAiProvider::builder().api_key("").build();
    let err = provider
        .generate_image(&GenerationRequest::new("a red bicycle"))
        .await
        .unwrap_err();
    assert!(matches!(err, GenStudioError::Config(_)));
}

#[tokio::test]
async fn generated_image_can_be_downloaded_and_saved() {
    let server = MockServer::start().await;
    let image_url = format!("{}/files/bike.png", server.uri());

    Mock::given(method("POST"))
        .and(path("/api/text2img"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output_url": image_url})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/bike.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES.to_vec()))
        .mount(&server)
        .await;

    let mut studio = Studio::new(provider_for(&server));
    let image = studio
        .submit("a red bicycle", StyleTag::Realistic, AspectRatio::Square)
        .await
        .unwrap()
        .clone();

    let downloaded = studio.download(&image).await.unwrap();
    assert_eq!(downloaded.format, ImageFormat::Png);
    assert_eq!(downloaded.size(), PNG_BYTES.len());

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(downloaded.file_name(&image.id));
    downloaded.save(&file).unwrap();
    assert_eq!(std::fs::read(&file).unwrap(), PNG_BYTES);
    assert!(file.to_string_lossy().ends_with(".png"));
}

#[tokio::test]
async fn failed_download_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let studio = Studio::new(provider_for(&server));
    let request = GenerationRequest::new("x");
    let image = genstudio::GeneratedImage::new(
        &request,
        format!("{}/missing.png", server.uri()),
        genstudio::ImageProviderKind::DeepAI,
        genstudio::ImageSource::Provider,
    );

    let err = studio.download(&image).await.unwrap_err();
    assert!(matches!(err, GenStudioError::Api { status: 404, .. }));
}
