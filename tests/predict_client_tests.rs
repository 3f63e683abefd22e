//! Mock HTTP tests for HttpPredictionClient.
//!
//! These tests cover:
//! - Request shape (path, method, multipart field, file name, MIME type)
//! - Label extraction
//! - Error mapping for bad statuses, bad bodies and unreachable servers

use snapshot_classifier::camera::{PixelFormat, RawCapture};
use snapshot_classifier::config::Config;
use snapshot_classifier::predict::{
    HttpPredictionClient, PredictionCause, PredictionClient, PREDICT_PATH,
};
use snapshot_classifier::preprocess::{
    EncodedPayload, ImagePreprocessor, PayloadFormat, PreprocessSettings,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload_with(format: PayloadFormat) -> EncodedPayload {
    let raw = RawCapture::new(
        (0..64 * 48 * 3).map(|i| (i % 251) as u8).collect(),
        64,
        48,
        PixelFormat::Rgb,
    );
    let preprocessor = ImagePreprocessor::with_settings(PreprocessSettings {
        format,
        ..PreprocessSettings::default()
    });
    preprocessor.process(&raw).unwrap().1
}

fn jpeg_payload() -> EncodedPayload {
    payload_with(PayloadFormat::Jpeg)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

async fn server_answering(template: ResponseTemplate) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(template)
        .expect(1)
        .mount(&mock_server)
        .await;
    mock_server
}

// === Client Creation Tests ===

#[test]
fn test_client_from_config() {
    let config = Config::with_base_url("http://classifier:8000").unwrap();
    let client = HttpPredictionClient::new(&config).unwrap();
    assert_eq!(client.base_url(), "http://classifier:8000");
    assert_eq!(client.predict_url(), "http://classifier:8000/predict");
}

// === Request Shape Tests ===

#[tokio::test]
async fn test_submit_posts_multipart_file_part() {
    let mock_server = server_answering(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"predicted_class": "Feliz"})),
    )
    .await;

    let payload = jpeg_payload();
    let expected_bytes = payload.as_bytes().to_vec();

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    client.submit(payload).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(
        content_type.starts_with("multipart/form-data; boundary="),
        "content type was {}",
        content_type
    );
    assert!(request.headers.get("authorization").is_none());

    assert!(contains(&request.body, b"name=\"file\""));
    assert!(contains(&request.body, b"filename=\"capture.jpg\""));
    assert!(contains(&request.body, b"Content-Type: image/jpeg"));
    assert!(contains(&request.body, &expected_bytes));
}

#[tokio::test]
async fn test_png_payload_is_sent_as_png() {
    let mock_server = server_answering(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"predicted_class": "Neutral"})),
    )
    .await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    client.submit(payload_with(PayloadFormat::Png)).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(contains(&requests[0].body, b"filename=\"capture.png\""));
    assert!(contains(&requests[0].body, b"Content-Type: image/png"));
}

// === Success Tests ===

#[tokio::test]
async fn test_label_is_returned_verbatim() {
    let mock_server = server_answering(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({"predicted_class": "  Feliz 😀 ", "confidence": 0.93}),
    ))
    .await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    let result = client.submit(jpeg_payload()).await.unwrap();
    assert_eq!(result.label(), "  Feliz 😀 ");
}

#[tokio::test]
async fn test_any_2xx_status_is_success() {
    let mock_server = server_answering(
        ResponseTemplate::new(201).set_body_json(serde_json::json!({"predicted_class": "Triste"})),
    )
    .await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    let result = client.submit(jpeg_payload()).await.unwrap();
    assert_eq!(result.label(), "Triste");
}

// === Error Tests ===

#[tokio::test]
async fn test_server_error_is_prediction_failed() {
    let mock_server =
        server_answering(ResponseTemplate::new(500).set_body_string("model crashed")).await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.submit(jpeg_payload()).await.unwrap_err();

    assert_eq!(err.status, Some(500));
    match err.cause {
        PredictionCause::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("Expected Status cause, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_is_prediction_failed() {
    let mock_server = server_answering(ResponseTemplate::new(422)).await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.submit(jpeg_payload()).await.unwrap_err();
    assert_eq!(err.status, Some(422));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mock_server =
        server_answering(ResponseTemplate::new(200).set_body_string("<html>ok</html>")).await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.submit(jpeg_payload()).await.unwrap_err();

    assert_eq!(err.status, Some(200));
    assert!(matches!(err.cause, PredictionCause::Malformed(_)));
}

#[tokio::test]
async fn test_missing_label_field() {
    let mock_server = server_answering(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"mood": "Feliz"})),
    )
    .await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.submit(jpeg_payload()).await.unwrap_err();
    assert!(matches!(err.cause, PredictionCause::MissingLabel));
}

#[tokio::test]
async fn test_empty_label_is_rejected() {
    let mock_server = server_answering(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"predicted_class": ""})),
    )
    .await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.submit(jpeg_payload()).await.unwrap_err();
    assert!(matches!(err.cause, PredictionCause::MissingLabel));
}

#[tokio::test]
async fn test_non_string_label_is_malformed() {
    let mock_server = server_answering(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"predicted_class": 2})),
    )
    .await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    let err = client.submit(jpeg_payload()).await.unwrap_err();
    assert!(matches!(err.cause, PredictionCause::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Grab a free port, then close it again
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let client = HttpPredictionClient::with_base_url(uri).unwrap();
    let err = client.submit(jpeg_payload()).await.unwrap_err();

    assert_eq!(err.status, None);
    assert!(matches!(err.cause, PredictionCause::Network(_)));
}

#[tokio::test]
async fn test_no_retry_on_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PREDICT_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpPredictionClient::with_base_url(mock_server.uri()).unwrap();
    assert!(client.submit(jpeg_payload()).await.is_err());
    // expect(1) is verified when the server drops
}
